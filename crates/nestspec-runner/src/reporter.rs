//! Reporting sink and run report artifact.
//!
//! [`Reporter`] is what the runner calls once per spec. [`RunReport`] is the
//! bundled implementation: a machine-readable record of the run that can be
//! written as JSON or rendered as a Markdown summary.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::outcome::{SpecInfo, SpecOutcome, SpecResult};

/// Receives spec outcomes as the runner produces them.
pub trait Reporter {
    /// Called before any hook of an executable spec runs.
    fn spec_started(&mut self, _spec: &SpecInfo) {}

    /// Called exactly once per selected spec, after every hook attributed to
    /// it has run.
    fn spec_finished(&mut self, result: &SpecResult);
}

/// Collects results in memory, discarding nothing.
impl Reporter for Vec<SpecResult> {
    fn spec_finished(&mut self, result: &SpecResult) {
        self.push(result.clone());
    }
}

// ── run report ───────────────────────────────────────────────────────────

/// Aggregate results of one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub run_id: Uuid,
    pub run_at: DateTime<Utc>,
    /// Fingerprint of the suite tree that was run.
    pub tree_fingerprint: String,
    pub results: Vec<SpecResult>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunReport {
    pub fn new(tree_fingerprint: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            run_at: Utc::now(),
            tree_fingerprint: tree_fingerprint.into(),
            results: Vec::new(),
            total: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
        }
    }

    /// True when no spec failed.
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// Fraction of executed specs that passed; skipped specs are excluded.
    pub fn pass_rate(&self) -> f32 {
        let executed = self.passed + self.failed;
        if executed == 0 {
            0.0
        } else {
            self.passed as f32 / executed as f32
        }
    }

    /// Persist the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "wrote run report");
        Ok(())
    }

    /// Render a human-readable Markdown summary.
    pub fn render_markdown(&self) -> String {
        let mut md = format!("# Spec Run {}\n", self.run_id);
        md.push_str(&format!(
            "\n{} total, {} passed, {} failed, {} skipped\n",
            self.total, self.passed, self.failed, self.skipped
        ));

        md.push_str("\n## Specs\n\n");
        if self.results.is_empty() {
            md.push_str("no specs\n");
        }
        for result in &self.results {
            let marker = match result.outcome {
                SpecOutcome::Passed => "PASS",
                SpecOutcome::Failed { .. } => "FAIL",
                SpecOutcome::Skipped => "SKIP",
            };
            md.push_str(&format!(
                "- **{}** `{}`\n",
                marker, result.spec.full_description
            ));
            for failure in result.outcome.failures() {
                md.push_str(&format!("  - {}\n", failure.message));
            }
        }
        md
    }
}

impl Reporter for RunReport {
    fn spec_finished(&mut self, result: &SpecResult) {
        self.total += 1;
        match result.outcome {
            SpecOutcome::Passed => self.passed += 1,
            SpecOutcome::Failed { .. } => self.failed += 1,
            SpecOutcome::Skipped => self.skipped += 1,
        }
        self.results.push(result.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Failure;

    fn result(name: &str, outcome: SpecOutcome) -> SpecResult {
        SpecResult {
            spec: SpecInfo {
                path: vec!["Suite".to_string(), name.to_string()],
                full_description: format!("Suite, {name}"),
                pending: outcome == SpecOutcome::Skipped,
            },
            outcome,
            duration_ms: 1,
        }
    }

    #[test]
    fn test_counts_follow_outcomes() {
        let mut report = RunReport::new("abc");
        report.spec_finished(&result("a", SpecOutcome::Passed));
        report.spec_finished(&result(
            "b",
            SpecOutcome::Failed {
                failures: vec![Failure::spec(&anyhow::anyhow!("mismatch"))],
            },
        ));
        report.spec_finished(&result("c", SpecOutcome::Skipped));

        assert_eq!(report.total, 3);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 1);
        assert!(!report.success());
        assert_eq!(report.pass_rate(), 0.5);
    }

    #[test]
    fn test_empty_report() {
        let report = RunReport::new("abc");
        assert!(report.success());
        assert_eq!(report.pass_rate(), 0.0);
        assert!(report.render_markdown().contains("no specs"));
    }

    #[test]
    fn test_markdown_lists_failures() {
        let mut report = RunReport::new("abc");
        report.spec_finished(&result(
            "broken",
            SpecOutcome::Failed {
                failures: vec![Failure::spec(&anyhow::anyhow!("expected 4, got 5"))],
            },
        ));
        let md = report.render_markdown();
        assert!(md.contains("- **FAIL** `Suite, broken`"));
        assert!(md.contains("  - expected 4, got 5"));
        assert!(md.contains("1 total, 0 passed, 1 failed, 0 skipped"));
    }

    #[test]
    fn test_vec_reporter_collects() {
        let mut results: Vec<SpecResult> = Vec::new();
        results.spec_finished(&result("a", SpecOutcome::Passed));
        assert_eq!(results.len(), 1);
    }
}
