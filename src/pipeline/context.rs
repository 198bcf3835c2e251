//! Pipeline context and tuning: channels, shared failure list and cancel flag.

use crossbeam_channel::{Receiver, Sender, bounded};
use log::{debug, warn};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::error::Failure;
use crate::types::{Outcome, PipelineConfig, WorkItem};
use crate::utils::config::ChannelConsts;
use crate::utils::fd_limit::max_open_handles;

/// Failures recorded by any stage. Locked per push so diagnostics never interleave.
pub type SharedFailures = Arc<Mutex<Vec<Failure>>>;

/// Worker count and channel capacity for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineTuning {
    pub num_workers: usize,
    /// Capacity of both the intake and result channels.
    pub channel_cap: usize,
}

/// Derive tuning from config. Each queued intake item and each busy worker holds an open
/// handle, so the intake capacity is cut back when workers + capacity would exceed the FD budget.
pub fn pipeline_tuning(config: &PipelineConfig) -> PipelineTuning {
    let num_workers = config.concurrency.max(1);
    let wanted = (num_workers * ChannelConsts::SLOTS_PER_WORKER).max(ChannelConsts::MIN_CAP);
    let channel_cap = match max_open_handles() {
        Some(budget) if num_workers + wanted > budget => {
            let capped = budget.saturating_sub(num_workers).max(ChannelConsts::MIN_CAP);
            if num_workers >= budget {
                warn!(
                    "{} workers may exceed the open file limit (~{} handles available)",
                    num_workers, budget
                );
            }
            debug!("Capping channel capacity {} -> {} (FD limit)", wanted, capped);
            capped
        }
        _ => wanted,
    };
    PipelineTuning {
        num_workers,
        channel_cap,
    }
}

/// Handles returned by [`run_pipeline`](crate::pipeline::run_pipeline): receive outcomes and join when done.
pub struct PipelineHandles {
    pub result_rx: Receiver<Outcome>,
    /// Returns the number of items the opener put on the intake queue.
    pub opener_handle: JoinHandle<usize>,
    pub worker_handles: Vec<JoinHandle<()>>,
    pub failures: SharedFailures,
    pub cancel: Arc<AtomicBool>,
}

/// Channels and shared state. The opener gets `intake_tx`; workers get `intake_rx` and `result_tx`.
pub struct PipelineChannels {
    pub intake_tx: Sender<WorkItem>,
    pub intake_rx: Receiver<WorkItem>,
    pub result_tx: Sender<Outcome>,
    pub result_rx: Receiver<Outcome>,
    pub failures: SharedFailures,
}

pub fn create_pipeline_channels(tuning: &PipelineTuning) -> PipelineChannels {
    let (intake_tx, intake_rx) = bounded::<WorkItem>(tuning.channel_cap);
    let (result_tx, result_rx) = bounded::<Outcome>(tuning.channel_cap);
    PipelineChannels {
        intake_tx,
        intake_rx,
        result_tx,
        result_rx,
        failures: Arc::new(Mutex::new(Vec::new())),
    }
}
