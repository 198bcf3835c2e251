use anyhow::Result;
use log::debug;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use crate::pipeline;
use crate::pipeline::opener::OpenerContext;
use crate::pipeline::workers::WorkerContext;
use crate::types::{Inputs, PipelineConfig, RunSummary};

/// Start opener + workers. Returns the result receiver and handles; caller drains `result_rx`
/// and must then join `opener_handle` and `worker_handles`.
pub fn run_pipeline(
    inputs: Inputs,
    config: &PipelineConfig,
    cancel: Arc<AtomicBool>,
) -> pipeline::PipelineHandles {
    let tuning = pipeline::pipeline_tuning(config);
    debug!(
        "{} workers, channel capacity {}, chunk {} bytes",
        tuning.num_workers, tuning.channel_cap, config.chunk_size
    );

    let channels = pipeline::create_pipeline_channels(&tuning);

    let opener_handle = pipeline::spawn_opener_thread(
        channels.intake_tx,
        inputs,
        OpenerContext {
            failures: Arc::clone(&channels.failures),
            cancel: Arc::clone(&cancel),
        },
    );

    let worker_ctx = WorkerContext::new(
        config,
        Arc::clone(&channels.failures),
        Arc::clone(&cancel),
    );
    let worker_handles = pipeline::spawn_digest_workers(
        channels.intake_rx,
        &channels.result_tx,
        &worker_ctx,
        tuning.num_workers,
    );

    // Dropping the last sender we hold lets the result queue close when the workers finish.
    drop(channels.result_tx);

    pipeline::PipelineHandles {
        result_rx: channels.result_rx,
        opener_handle,
        worker_handles,
        failures: channels.failures,
        cancel,
    }
}

/// Join opener and worker threads (after the result stream is drained). Returns the opener's item count.
pub fn shutdown_pipeline_handles(
    opener_handle: JoinHandle<usize>,
    worker_handles: Vec<JoinHandle<()>>,
) -> Result<usize> {
    let opened = opener_handle
        .join()
        .map_err(|_| anyhow::anyhow!("opener thread panicked"))?;
    for h in worker_handles {
        h.join()
            .map_err(|_| anyhow::anyhow!("digest worker panicked"))?;
    }
    Ok(opened)
}

/// Main orchestrator: digest every input and write result lines to `out`.
/// Opener → intake channel → workers → result channel → collector (this thread).
pub fn hash_inputs<W: Write>(
    inputs: Inputs,
    config: &PipelineConfig,
    cancel: Arc<AtomicBool>,
    out: W,
) -> Result<RunSummary> {
    let pipeline::PipelineHandles {
        result_rx,
        opener_handle,
        worker_handles,
        failures,
        cancel,
    } = run_pipeline(inputs, config, cancel);

    let collected = pipeline::collect_results(result_rx, out, config.mode, config.order);
    // Join before reporting a write error: the receiver is gone by now, so every stage unwinds.
    let opened = shutdown_pipeline_handles(opener_handle, worker_handles)?;
    let stats = collected?;
    debug!(
        "main: result channel closed, {} of {} opened inputs written",
        stats.written, opened
    );

    Ok(RunSummary {
        results: stats.written,
        failures: pipeline::take_failures(&failures),
        mismatches: stats.mismatches,
        cancelled: cancel.load(Ordering::Relaxed),
    })
}
