//! Result collector: drains outcomes and renders result lines to the output sink.

use crossbeam_channel::Receiver;
use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::types::{Mode, Outcome, OutputOrder, ResultItem};

/// Render one result line (no newline).
///
/// - hash, named: `<algorithm> <digest-hex> <name>` (also the manifest format)
/// - hash, stdin: `<digest-hex>`
/// - verify: `<name> <true|false>`
pub fn render_result(item: &ResultItem, mode: Mode) -> String {
    match (mode, &item.identity) {
        (Mode::Verify, identity) => format!(
            "{} {}",
            identity.as_deref().unwrap_or("-"),
            item.matched.unwrap_or(false)
        ),
        (Mode::Hash, Some(name)) => {
            format!("{} {} {}", item.algorithm, item.digest_hex(), name)
        }
        (Mode::Hash, None) => item.digest_hex(),
    }
}

/// Counts from a drained result stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub written: usize,
    pub mismatches: usize,
}

/// Writes outcomes as they arrive, or buffers them until contiguous for [`OutputOrder::Input`].
pub struct Collector<W: Write> {
    out: W,
    mode: Mode,
    order: OutputOrder,
    /// Input order only: arrivals ahead of `next`. `None` marks an index that produced no result.
    pending: BTreeMap<usize, Option<ResultItem>>,
    next: usize,
    stats: CollectStats,
}

impl<W: Write> Collector<W> {
    pub fn new(out: W, mode: Mode, order: OutputOrder) -> Self {
        Self {
            out,
            mode,
            order,
            pending: BTreeMap::new(),
            next: 0,
            stats: CollectStats::default(),
        }
    }

    pub fn accept(&mut self, outcome: Outcome) -> io::Result<()> {
        match self.order {
            OutputOrder::Arrival => match outcome {
                Outcome::Digested(item) => self.emit(&item),
                Outcome::Dropped(_) => Ok(()),
            },
            OutputOrder::Input => {
                let (index, item) = match outcome {
                    Outcome::Digested(item) => (item.index, Some(item)),
                    Outcome::Dropped(index) => (index, None),
                };
                self.pending.insert(index, item);
                self.flush_contiguous()
            }
        }
    }

    fn flush_contiguous(&mut self) -> io::Result<()> {
        while let Some(slot) = self.pending.remove(&self.next) {
            self.next += 1;
            if let Some(item) = slot {
                self.emit(&item)?;
            }
        }
        Ok(())
    }

    fn emit(&mut self, item: &ResultItem) -> io::Result<()> {
        writeln!(self.out, "{}", render_result(item, self.mode))?;
        self.stats.written += 1;
        if item.matched == Some(false) {
            self.stats.mismatches += 1;
        }
        Ok(())
    }

    /// Write anything still buffered (in index order), flush the sink, and return the counts.
    pub fn finish(mut self) -> io::Result<CollectStats> {
        let rest = std::mem::take(&mut self.pending);
        for item in rest.into_values().flatten() {
            self.emit(&item)?;
        }
        self.out.flush()?;
        Ok(self.stats)
    }
}

/// Drain `result_rx` until every worker has exited. On a write error the receiver is dropped so
/// workers stop instead of blocking on a full queue.
pub fn collect_results<W: Write>(
    result_rx: Receiver<Outcome>,
    out: W,
    mode: Mode,
    order: OutputOrder,
) -> io::Result<CollectStats> {
    let mut collector = Collector::new(out, mode, order);
    while let Ok(outcome) = result_rx.recv() {
        collector.accept(outcome)?;
    }
    collector.finish()
}
