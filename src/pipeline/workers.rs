//! Digest workers: pull opened inputs off the intake queue, digest them, push outcomes.

use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crate::engine::hashing::{Accumulator, Algorithm, digest_stream, hex_equals};
use crate::types::{Mode, Outcome, PipelineConfig, ResultItem, WorkItem};

use super::context::SharedFailures;
use super::error_handler::record_failure;

/// What each worker needs from the run config plus shared state.
#[derive(Clone)]
pub struct WorkerContext {
    pub mode: Mode,
    pub algorithm: Algorithm,
    pub chunk_size: usize,
    pub failures: SharedFailures,
    pub cancel: Arc<AtomicBool>,
}

impl WorkerContext {
    pub fn new(
        config: &PipelineConfig,
        failures: SharedFailures,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            mode: config.mode,
            algorithm: config.algorithm,
            chunk_size: config.chunk_size,
            failures,
            cancel,
        }
    }
}

/// Accumulator kept by one worker between items, tagged with its algorithm.
pub type CachedAccumulator = Option<(Algorithm, Box<dyn Accumulator>)>;

/// Reuse the cached accumulator when the algorithm matches (after reset), otherwise replace it.
fn accumulator_for(cached: &mut CachedAccumulator, algorithm: Algorithm) -> &mut dyn Accumulator {
    let acc = match cached.take() {
        Some((cached_alg, mut acc)) if cached_alg == algorithm => {
            acc.reset();
            acc
        }
        _ => algorithm.accumulator(),
    };
    let (_, acc) = cached.insert((algorithm, acc));
    acc.as_mut()
}

/// Digest one item. The stream is dropped (closed) before this returns, on every path.
pub fn process_item(
    item: WorkItem,
    ctx: &WorkerContext,
    cached: &mut CachedAccumulator,
) -> Outcome {
    let WorkItem {
        index,
        identity,
        mut stream,
        expected,
    } = item;
    let label = identity.as_deref().unwrap_or("-");

    let algorithm = match (&ctx.mode, &expected) {
        (Mode::Verify, Some(exp)) => exp.algorithm.parse::<Algorithm>(),
        _ => Ok(ctx.algorithm),
    };
    let algorithm = match algorithm {
        Ok(a) => a,
        Err(e) => {
            drop(stream);
            record_failure(&ctx.failures, label, e);
            return Outcome::Dropped(index);
        }
    };

    let acc = accumulator_for(cached, algorithm);
    let read = digest_stream(&mut stream, acc, ctx.chunk_size);
    drop(stream);

    match read {
        Ok(bytes) => {
            let digest = acc.sum();
            debug!(
                "{}: {} bytes, {} {}",
                label,
                bytes,
                algorithm,
                hex::encode(&digest)
            );
            let matched = expected.map(|exp| hex_equals(&digest, &exp.digest_hex));
            Outcome::Digested(ResultItem {
                index,
                identity,
                algorithm,
                digest,
                matched,
            })
        }
        Err(e) => {
            record_failure(&ctx.failures, label, format!("read failed: {e}"));
            Outcome::Dropped(index)
        }
    }
}

/// Single worker: receive until the intake queue is closed and drained.
/// After cancellation, remaining items are closed unread, recorded as cancelled and reported as dropped.
fn digest_worker_loop(
    intake_rx: Receiver<WorkItem>,
    result_tx: Sender<Outcome>,
    ctx: WorkerContext,
) {
    let mut cached: CachedAccumulator = None;
    while let Ok(item) = intake_rx.recv() {
        let outcome = if ctx.cancel.load(Ordering::Relaxed) {
            record_failure(&ctx.failures, item.label(), "cancelled");
            Outcome::Dropped(item.index)
        } else {
            process_item(item, &ctx, &mut cached)
        };
        if result_tx.send(outcome).is_err() {
            break;
        }
    }
    drop(result_tx);
}

/// Spawn `num_workers` digest workers. Caller must drop its own `result_tx` after this so the result
/// queue closes once the last worker exits.
pub fn spawn_digest_workers(
    intake_rx: Receiver<WorkItem>,
    result_tx: &Sender<Outcome>,
    ctx: &WorkerContext,
    num_workers: usize,
) -> Vec<JoinHandle<()>> {
    (0..num_workers)
        .map(|_| {
            let intake_rx = intake_rx.clone();
            let result_tx = result_tx.clone();
            let ctx = ctx.clone();
            thread::spawn(move || digest_worker_loop(intake_rx, result_tx, ctx))
        })
        .collect()
}
