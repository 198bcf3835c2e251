//! CLI command handler: hash FILEs (or stdin) by default; -c verifies a manifest.

use anyhow::{Context, Result};
use log::warn;
use std::io::{self, BufWriter};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::arg_parser::Cli;
use crate::error::HashpipeError;
use crate::hash_inputs;
use crate::pipeline::{check_for_failed_items, resolve_inputs};
use crate::types::{Opts, PipelineConfig};
use crate::utils::hashpipe_toml::{apply_file_to_opts, load_hashpipe_toml};
use crate::utils::setup_logging;

/// Defaults, then `.hashpipe.toml` in the working directory, then CLI flags.
fn setup_opts(cli: &Cli) -> Result<Opts> {
    let mut opts = Opts::default();
    let cwd = std::env::current_dir().context("resolve working directory")?;
    if let Some(file) = load_hashpipe_toml(&cwd)? {
        apply_file_to_opts(&file, &mut opts)?;
    }
    if let Some(algorithm) = cli.hash {
        opts.algorithm = algorithm;
    }
    if let Some(jobs) = cli.jobs {
        opts.jobs = jobs;
    }
    if let Some(chunk_size) = cli.chunk_size {
        opts.chunk_size = chunk_size;
    }
    if let Some(keep_order) = cli.keep_order {
        opts.keep_order = keep_order;
    }
    if let Some(strict) = cli.strict {
        opts.strict = strict;
    }
    if let Some(verbose) = cli.verbose {
        opts.verbose = verbose;
    }
    opts.check = cli.check;
    Ok(opts)
}

/// Run hash or verify mode. Usage, configuration and manifest errors return before any input is
/// opened; per-input failures only affect the exit status with --strict.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli)?;
    setup_logging(opts.verbose);
    let config = PipelineConfig::from(&opts);

    let inputs = resolve_inputs(config.mode, &cli.files)?;

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_handler = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        cancel_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;

    let stdout = io::stdout();
    let summary = hash_inputs(
        inputs,
        &config,
        Arc::clone(&cancel),
        BufWriter::new(stdout.lock()),
    )?;

    if summary.mismatches > 0 {
        warn!("{} digest(s) did not match", summary.mismatches);
    }
    if summary.cancelled {
        return Err(HashpipeError::Cancelled(summary.results).into());
    }
    check_for_failed_items(opts.strict, opts.verbose, &summary.failures)
}
