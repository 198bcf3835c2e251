//! Opener stage: turns [`Inputs`] into open [`WorkItem`]s on the intake queue.

use crossbeam_channel::Sender;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crate::engine::manifest::load_manifest;
use crate::error::HashpipeError;
use crate::types::{Expected, Inputs, Mode, WorkItem};

use super::context::SharedFailures;
use super::error_handler::record_failure;

/// Shared state the opener thread needs besides its sender.
pub struct OpenerContext {
    pub failures: SharedFailures,
    pub cancel: Arc<AtomicBool>,
}

/// One thing to open, before opening.
pub enum Source {
    Stdin,
    Reader(Box<dyn Read + Send>),
    Path {
        identity: String,
        path: PathBuf,
        expected: Option<Expected>,
    },
}

/// Map the positional arguments for `mode` to [`Inputs`]. Verify mode reads and parses the
/// manifest here, so a missing or malformed manifest fails before any worker starts.
pub fn resolve_inputs(mode: Mode, args: &[PathBuf]) -> Result<Inputs, HashpipeError> {
    match mode {
        Mode::Hash if args.is_empty() => Ok(Inputs::Stdin),
        Mode::Hash => Ok(Inputs::Files(args.to_vec())),
        Mode::Verify => match args {
            [manifest] => Ok(Inputs::Manifest(load_manifest(manifest)?)),
            _ => Err(HashpipeError::Usage(format!(
                "-c takes exactly one FILE containing previous output of this program, got {}",
                args.len()
            ))),
        },
    }
}

/// Enumerate sources in input order.
pub fn sources(inputs: Inputs) -> Box<dyn Iterator<Item = Source> + Send> {
    match inputs {
        Inputs::Stdin => Box::new(std::iter::once(Source::Stdin)),
        Inputs::Reader(r) => Box::new(std::iter::once(Source::Reader(r))),
        Inputs::Files(files) => Box::new(files.into_iter().map(|path| Source::Path {
            identity: path.to_string_lossy().into_owned(),
            path,
            expected: None,
        })),
        Inputs::Manifest(records) => Box::new(records.into_iter().map(|r| Source::Path {
            path: PathBuf::from(&r.path),
            identity: r.path,
            expected: Some(Expected {
                algorithm: r.algorithm,
                digest_hex: r.digest_hex,
            }),
        })),
    }
}

/// (identity, stream, expected) for an opened source.
type Opened = (Option<String>, Box<dyn Read + Send>, Option<Expected>);

/// Open one source. `None` when the open failed; the failure is already recorded.
fn open_source(source: Source, failures: &SharedFailures) -> Option<Opened> {
    match source {
        Source::Stdin => {
            let stdin: Box<dyn Read + Send> = Box::new(std::io::stdin());
            Some((None, stdin, None))
        }
        Source::Reader(r) => Some((None, r, None)),
        Source::Path {
            identity,
            path,
            expected,
        } => match File::open(&path) {
            Ok(file) => {
                let stream: Box<dyn Read + Send> = Box::new(file);
                Some((Some(identity), stream, expected))
            }
            Err(e) => {
                record_failure(failures, &identity, e);
                None
            }
        },
    }
}

pub fn spawn_opener_thread(
    intake_tx: Sender<WorkItem>,
    inputs: Inputs,
    ctx: OpenerContext,
) -> JoinHandle<usize> {
    thread::spawn(move || run_open_loop(intake_tx, sources(inputs), &ctx))
}

/// Open each source in order and send it on `intake_tx`. Open failures are recorded and skipped.
/// Stops early when cancelled or when every receiver is gone. Drops `intake_tx` when done, which
/// closes the intake queue. Returns the count of items sent.
pub fn run_open_loop<I>(intake_tx: Sender<WorkItem>, iter: I, ctx: &OpenerContext) -> usize
where
    I: Iterator<Item = Source>,
{
    let mut count = 0_usize;
    for source in iter {
        if ctx.cancel.load(Ordering::Relaxed) {
            debug!("opener: cancelled after {} items", count);
            break;
        }
        let Some((identity, stream, expected)) = open_source(source, &ctx.failures) else {
            continue;
        };
        let item = WorkItem {
            index: count,
            identity,
            stream,
            expected,
        };
        if intake_tx.send(item).is_err() {
            break;
        }
        count += 1;
    }
    debug!("opener: intake closed, {} items queued", count);
    drop(intake_tx);
    count
}
