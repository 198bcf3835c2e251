use anyhow::Result;
use std::fmt::Display;
use std::sync::PoisonError;

use crate::error::{Failure, HashpipeError};
use crate::pipeline::context::SharedFailures;

/// Report one skipped input on the diagnostic channel and remember it for the summary.
pub fn record_failure(failures: &SharedFailures, identity: &str, reason: impl Display) {
    let reason = reason.to_string();
    log::warn!("{}: {}", identity, reason);
    failures
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(Failure {
            identity: identity.to_string(),
            reason,
        });
}

/// Take the recorded failures, leaving the list empty.
pub fn take_failures(failures: &SharedFailures) -> Vec<Failure> {
    std::mem::take(&mut *failures.lock().unwrap_or_else(PoisonError::into_inner))
}

/// After a run: summarize skipped inputs; in strict mode any failure is an error.
pub fn check_for_failed_items(strict: bool, verbose: bool, failures: &[Failure]) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    if strict {
        return Err(HashpipeError::ItemsFailed(failures.len()).into());
    }
    log::info!("Skipped {} input(s)", failures.len());
    if verbose {
        for f in failures {
            log::debug!("  skipped: {} ({})", f.identity, f.reason);
        }
    }
    Ok(())
}
