//! Pipeline components: opener, digest workers, collector, and the orchestrator wiring them.

pub mod collector;
pub mod context;
pub mod error_handler;
pub mod opener;
pub mod orchestrator;
pub mod workers;

pub use collector::{CollectStats, Collector, collect_results, render_result};
pub use context::{
    PipelineChannels, PipelineHandles, PipelineTuning, SharedFailures, create_pipeline_channels,
    pipeline_tuning,
};
pub use error_handler::{check_for_failed_items, record_failure, take_failures};
pub use opener::{
    OpenerContext, Source, resolve_inputs, run_open_loop, sources, spawn_opener_thread,
};
pub use orchestrator::{hash_inputs, run_pipeline, shutdown_pipeline_handles};
pub use workers::{WorkerContext, process_item, spawn_digest_workers};
