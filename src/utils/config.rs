//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Optional settings file looked up in the working directory.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Worker threads ----

/// Default `-j`: twice the available threads (from rayon), since workers mostly wait on I/O.
pub fn default_jobs() -> usize {
    (rayon::current_num_threads() * WorkerConsts::JOBS_PER_THREAD).max(1)
}

pub struct WorkerConsts;

impl WorkerConsts {
    pub const JOBS_PER_THREAD: usize = 2;
}

// ---- Hashing ----

/// Hashing I/O buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// Chunk size for streaming reads (bytes). 64 KB.
    pub const READ_CHUNK_SIZE: usize = 64 * 1024;
}

// ---- Channels ----

/// Intake and result channel capacity, relative to the worker count.
pub struct ChannelConsts;

impl ChannelConsts {
    /// Capacity = workers × this.
    pub const SLOTS_PER_WORKER: usize = 2;
    pub const MIN_CAP: usize = 1;
}
