//! Typed errors for configuration, manifest and run-level failures.

use std::path::PathBuf;
use thiserror::Error;

/// Run-level error. Anything here aborts the run; per-item problems are [`Failure`]s instead.
#[derive(Error, Debug)]
pub enum HashpipeError {
    /// Bad flag combination or argument count.
    #[error("usage: {0}")]
    Usage(String),

    #[error("unsupported hash algorithm: {0} (valid: crc32, md5, sha1, sha224, sha256, sha384, sha512)")]
    UnsupportedAlgorithm(String),

    /// Settings file present but unparsable.
    #[error("invalid settings in '{path}': {message}")]
    Config { path: PathBuf, message: String },

    #[error("cannot read manifest '{path}': {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Line is not `<algorithm> <digest-hex> <path>`. `line` is 1-based.
    #[error("malformed manifest line {line}: {content:?} (expected '<algorithm> <digest> <path>')")]
    ManifestParse { line: usize, content: String },

    #[error("cancelled by user; {0} results were written before stopping")]
    Cancelled(usize),

    #[error("{0} input(s) could not be processed")]
    ItemsFailed(usize),
}

/// One input that was skipped: open failure, read failure, or unknown algorithm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    /// File name, or `-` for standard input.
    pub identity: String,
    pub reason: String,
}
