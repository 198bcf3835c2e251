//! Hashpipe CLI: digest files or stdin concurrently; use -c to verify a manifest.

use anyhow::Result;
use clap::Parser;
use hashpipe::engine::arg_parser::Cli;
use hashpipe::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
