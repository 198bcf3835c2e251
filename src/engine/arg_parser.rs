use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::engine::hashing::Algorithm;

/// `--version` text: name, version and copyright.
pub const VERSION_LINE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " Copyright (c) the ",
    env!("CARGO_PKG_NAME"),
    " authors."
);

/// Concurrent file digester with manifest verification.
#[derive(Clone, Debug, Parser)]
#[command(name = "hashpipe", version = VERSION_LINE, disable_help_flag = true)]
#[command(about = "Compute CRC32/MD5/SHA digests of FILEs (or standard input) concurrently; use -c to verify a manifest.")]
pub struct Cli {
    /// Files to hash, or with -c the single manifest to verify. No files: read standard input.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Digest algorithm: crc32, md5, sha1, sha224, sha256, sha384, sha512. Default: sha256.
    #[arg(short = 'h', long = "hash", value_name = "ALGO", value_parser = parse_algorithm)]
    pub hash: Option<Algorithm>,

    /// Maximum number of files processed concurrently. Values ≤ 0 mean 1. Default: 2 × CPUs.
    #[arg(short = 'j', long = "jobs", value_name = "N", allow_negative_numbers = true)]
    pub jobs: Option<i64>,

    /// Read digests from FILE (previous output of this program) and verify them.
    #[arg(short = 'c', long = "check")]
    pub check: bool,

    /// Write results in input order instead of completion order.
    /// An explicit value needs `=` (`--keep-order=false`) so FILEs after the flag stay positional.
    #[arg(short = 'k', long = "keep-order", num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub keep_order: Option<bool>,

    /// Exit non-zero if any input could not be opened, read or hashed.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub strict: Option<bool>,

    /// Read size in bytes when streaming inputs.
    #[arg(short = 'b', long = "chunk-size", value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Print help.
    #[arg(long = "help", action = ArgAction::Help)]
    pub help: Option<bool>,
}

fn parse_algorithm(s: &str) -> Result<Algorithm, String> {
    s.parse::<Algorithm>().map_err(|e| e.to_string())
}
