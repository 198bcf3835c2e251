//! Hashpipe: concurrent CRC32/MD5/SHA digests over many inputs, with manifest verification

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use engine::hashing::Algorithm;
pub use error::{Failure, HashpipeError};
pub use types::*;

use log::debug;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Result alias used by public hashpipe API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: digest `inputs` under `config`, writing one line per result to `out`.
///
/// - Hash mode: `<algorithm> <hex> <name>` per named input, `<hex>` for an anonymous stream.
/// - Verify mode (`Inputs::Manifest`): `<name> <true|false>`.
///
/// Inputs that cannot be opened or read are skipped and listed in [`RunSummary::failures`].
/// Setting `cancel` stops the opener; items already queued are closed without being hashed.
///
/// ```ignore
/// let config = hashpipe::PipelineConfig::new(hashpipe::Algorithm::Sha256, 4, 64 * 1024, hashpipe::Mode::Hash);
/// let inputs = hashpipe::Inputs::Files(vec!["a.txt".into()]);
/// let summary = hashpipe::hash_inputs(inputs, &config, Default::default(), std::io::stdout())?;
/// ```
pub fn hash_inputs<W: Write>(
    inputs: Inputs,
    config: &PipelineConfig,
    cancel: Arc<AtomicBool>,
    out: W,
) -> Result<RunSummary> {
    debug!(
        "{} CONFIG:{:#?} INPUTS:{:?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        config,
        inputs
    );
    pipeline::hash_inputs(inputs, config, cancel, out)
}
