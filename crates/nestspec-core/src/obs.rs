//! Structured observability hooks for suite evaluation and spec runs.
//!
//! This module provides:
//! - A run-scoped tracing span via the `RunSpan` RAII guard
//! - Emission functions for key lifecycle events: suite evaluation, spec
//!   start/finish, hook failures and run completion
//!
//! Evaluation events are emitted at `debug!`, run events at `info!`, and
//! failures at `warn!`.

use tracing::{debug, info, warn};

use crate::error::SuiteError;

/// RAII guard that enters a run-scoped tracing span for the duration of a run.
///
/// # Example
///
/// ```ignore
/// let _span = RunSpan::enter("run-12345");
/// // every event emitted while the guard lives carries run_id = "run-12345"
/// ```
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    /// Create and enter a span tagged with the run_id.
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("nestspec.run", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: one declaration body was evaluated.
pub fn emit_suite_evaluated(path: &[String], children: usize) {
    debug!(
        event = "suite.evaluated",
        path = %path.join(" > "),
        children = children,
    );
}

/// Emit event: the whole tree was realized.
pub fn emit_evaluation_finished(suites: usize, specs: usize, duration_ms: u64) {
    debug!(
        event = "evaluation.finished",
        suites = suites,
        specs = specs,
        duration_ms = duration_ms,
    );
}

/// Emit event: evaluation aborted (warning level).
pub fn emit_evaluation_failed(error: &SuiteError) {
    warn!(event = "evaluation.failed", path = %error.path().join(" > "), error = %error);
}

/// Emit event: a spec is about to execute.
pub fn emit_spec_started(full_description: &str) {
    debug!(event = "spec.started", spec = %full_description);
}

/// Emit event: a spec finished with the given status.
pub fn emit_spec_finished(full_description: &str, status: &str, duration_ms: u64) {
    info!(
        event = "spec.finished",
        spec = %full_description,
        status = %status,
        duration_ms = duration_ms,
    );
}

/// Emit event: a lifecycle hook failed (warning level).
pub fn emit_hook_failed(suite_path: &[String], phase: &str, error: &dyn std::fmt::Display) {
    warn!(
        event = "hook.failed",
        suite = %suite_path.join(" > "),
        phase = %phase,
        error = %error,
    );
}

/// Emit event: run finished with totals.
pub fn emit_run_finished(passed: usize, failed: usize, skipped: usize, duration_ms: u64) {
    info!(
        event = "run.finished",
        passed = passed,
        failed = failed,
        skipped = skipped,
        duration_ms = duration_ms,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitters_do_not_panic_without_subscriber() {
        emit_suite_evaluated(&["A".to_string()], 2);
        emit_evaluation_finished(2, 3, 1);
        emit_spec_started("A, a1");
        emit_spec_finished("A, a1", "passed", 0);
        emit_hook_failed(&[], "before", &"boom");
        emit_run_finished(1, 0, 0, 5);
    }

    #[test]
    fn test_run_span_create() {
        let _span = RunSpan::enter("test-run-id");
    }
}
