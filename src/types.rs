//! Public and internal types for the hashpipe API and pipeline.

use std::fmt;
use std::io::Read;
use std::path::PathBuf;

use crate::engine::hashing::Algorithm;
use crate::engine::manifest::ManifestRecord;
use crate::error::Failure;
use crate::utils::config::HashingConsts;

/// Hash fresh digests, or verify digests recorded in a manifest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Hash,
    Verify,
}

/// Order in which the collector writes result lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputOrder {
    /// Completion order. Race-determined when more than one worker runs.
    #[default]
    Arrival,
    /// Opener order; out-of-order completions are buffered until contiguous.
    Input,
}

/// Immutable settings for one run. Built once and handed by reference to every stage.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Algorithm for hash mode. Verify mode takes the algorithm from each manifest record.
    pub algorithm: Algorithm,
    /// Number of digesting workers (always ≥ 1).
    pub concurrency: usize,
    /// Read size when streaming an input through its accumulator (always ≥ 1).
    pub chunk_size: usize,
    pub mode: Mode,
    pub order: OutputOrder,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Sha256,
            concurrency: 1,
            chunk_size: HashingConsts::READ_CHUNK_SIZE,
            mode: Mode::Hash,
            order: OutputOrder::Arrival,
        }
    }
}

impl PipelineConfig {
    /// Build a config, coercing a non-positive `concurrency` or `chunk_size` to the minimum.
    pub fn new(algorithm: Algorithm, concurrency: i64, chunk_size: usize, mode: Mode) -> Self {
        Self {
            algorithm,
            concurrency: coerce_concurrency(concurrency),
            chunk_size: chunk_size.max(1),
            mode,
            order: OutputOrder::Arrival,
        }
    }

    pub fn with_order(mut self, order: OutputOrder) -> Self {
        self.order = order;
        self
    }
}

/// `n ≤ 0` becomes 1.
pub fn coerce_concurrency(n: i64) -> usize {
    if n <= 0 { 1 } else { n as usize }
}

/// What the opener should enumerate.
pub enum Inputs {
    /// Standard input as the single anonymous stream.
    Stdin,
    /// Any reader standing in for standard input (identity absent).
    Reader(Box<dyn Read + Send>),
    /// Named files, opened in order.
    Files(Vec<PathBuf>),
    /// Parsed manifest records (verify mode).
    Manifest(Vec<ManifestRecord>),
}

impl fmt::Debug for Inputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inputs::Stdin => f.write_str("Stdin"),
            Inputs::Reader(_) => f.write_str("Reader(..)"),
            Inputs::Files(files) => f.debug_tuple("Files").field(files).finish(),
            Inputs::Manifest(records) => f.debug_tuple("Manifest").field(records).finish(),
        }
    }
}

/// Digest the manifest claims for an input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expected {
    /// Algorithm name exactly as written in the manifest; resolved by the worker.
    pub algorithm: String,
    pub digest_hex: String,
}

/// One opened input waiting for a worker. The worker that dequeues it owns and closes `stream`.
pub struct WorkItem {
    /// Position in opener enumeration order, counted over emitted items only.
    pub index: usize,
    /// Input name; `None` for standard input.
    pub identity: Option<String>,
    pub stream: Box<dyn Read + Send>,
    /// Verify mode only.
    pub expected: Option<Expected>,
}

impl WorkItem {
    /// Name used in diagnostics (`-` for standard input).
    pub fn label(&self) -> &str {
        self.identity.as_deref().unwrap_or("-")
    }
}

/// One computed digest, immutable once sent to the collector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultItem {
    pub index: usize,
    pub identity: Option<String>,
    pub algorithm: Algorithm,
    pub digest: Vec<u8>,
    /// Verify mode: whether `digest` equals the expected digest.
    pub matched: Option<bool>,
}

impl ResultItem {
    /// Lowercase hex of the digest.
    pub fn digest_hex(&self) -> String {
        hex::encode(&self.digest)
    }
}

/// Message on the result queue. `Dropped` carries the index of an item that produced no result,
/// so input-order output can move past it.
#[derive(Debug)]
pub enum Outcome {
    Digested(ResultItem),
    Dropped(usize),
}

/// What a finished run reports back.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Result lines written.
    pub results: usize,
    /// Inputs skipped, in the order they were reported.
    pub failures: Vec<Failure>,
    /// Verify mode: results whose digest did not match.
    pub mismatches: usize,
    pub cancelled: bool,
}

/// Full options (CLI). Folded from `.hashpipe.toml` then CLI flags, then turned into a [`PipelineConfig`].
#[derive(Clone, Debug)]
pub struct Opts {
    pub algorithm: Algorithm,
    pub jobs: i64,
    pub chunk_size: usize,
    pub keep_order: bool,
    /// Exit non-zero when any input failed.
    pub strict: bool,
    pub verbose: bool,
    pub check: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Sha256,
            jobs: crate::utils::config::default_jobs() as i64,
            chunk_size: HashingConsts::READ_CHUNK_SIZE,
            keep_order: false,
            strict: false,
            verbose: false,
            check: false,
        }
    }
}

impl From<&Opts> for PipelineConfig {
    fn from(o: &Opts) -> Self {
        let mode = if o.check { Mode::Verify } else { Mode::Hash };
        let order = if o.keep_order {
            OutputOrder::Input
        } else {
            OutputOrder::Arrival
        };
        PipelineConfig::new(o.algorithm, o.jobs, o.chunk_size, mode).with_order(order)
    }
}
