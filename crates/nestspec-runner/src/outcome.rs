//! Spec outcomes and per-spec metadata handed to reporters.

use nestspec_core::{HookPhase, SpecId, SuiteTree};
use serde::{Deserialize, Serialize};

/// Where a failure came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureKind {
    /// The spec body returned an error or panicked.
    Spec,

    /// A lifecycle hook failed while running for this spec.
    Hook {
        phase: HookPhase,
        suite: Vec<String>,
    },

    /// The spec never ran because a `before` hook of an enclosing suite
    /// failed earlier in the run.
    SetupAborted { suite: Vec<String> },
}

/// A single failure attributed to a spec.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn spec(error: &anyhow::Error) -> Self {
        Self {
            kind: FailureKind::Spec,
            message: format!("{error:#}"),
        }
    }

    pub fn hook(phase: HookPhase, suite: Vec<String>, error: &anyhow::Error) -> Self {
        Self {
            kind: FailureKind::Hook { phase, suite },
            message: format!("{error:#}"),
        }
    }

    pub fn setup_aborted(suite: Vec<String>) -> Self {
        let message = format!("before hook of suite '{}' failed", suite.join(", "));
        Self {
            kind: FailureKind::SetupAborted { suite },
            message,
        }
    }
}

/// Final outcome of one spec.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SpecOutcome {
    Passed,
    Failed { failures: Vec<Failure> },
    Skipped,
}

impl SpecOutcome {
    pub fn from_failures(failures: Vec<Failure>) -> Self {
        if failures.is_empty() {
            SpecOutcome::Passed
        } else {
            SpecOutcome::Failed { failures }
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            SpecOutcome::Passed => "passed",
            SpecOutcome::Failed { .. } => "failed",
            SpecOutcome::Skipped => "skipped",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SpecOutcome::Failed { .. })
    }

    pub fn failures(&self) -> &[Failure] {
        match self {
            SpecOutcome::Failed { failures } => failures,
            _ => &[],
        }
    }
}

/// Metadata identifying a spec to reporters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpecInfo {
    /// Suite descriptions from the outermost down, followed by the spec's.
    pub path: Vec<String>,
    pub full_description: String,
    pub pending: bool,
}

impl SpecInfo {
    pub fn from_tree(tree: &SuiteTree, spec: SpecId) -> Self {
        Self {
            path: tree.description_path(spec),
            full_description: tree.full_description(spec),
            pending: tree.spec(spec).is_pending(),
        }
    }
}

/// A finished spec as delivered to [`crate::Reporter::spec_finished`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpecResult {
    pub spec: SpecInfo,
    pub outcome: SpecOutcome,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_failures() {
        assert_eq!(SpecOutcome::from_failures(Vec::new()), SpecOutcome::Passed);
        let outcome = SpecOutcome::from_failures(vec![Failure::spec(&anyhow::anyhow!("bad"))]);
        assert!(outcome.is_failed());
        assert_eq!(outcome.failures()[0].message, "bad");
        assert_eq!(outcome.status(), "failed");
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = SpecOutcome::Failed {
            failures: vec![Failure::hook(
                HookPhase::BeforeEach,
                vec!["A".to_string()],
                &anyhow::anyhow!("db down"),
            )],
        };
        let v = serde_json::to_value(&outcome).expect("to_value");
        assert_eq!(v["status"], "failed");
        assert_eq!(v["failures"][0]["kind"]["type"], "hook");
        assert_eq!(v["failures"][0]["kind"]["phase"], "before_each");
        assert_eq!(v["failures"][0]["message"], "db down");
    }

    #[test]
    fn test_setup_aborted_message_names_suite() {
        let failure = Failure::setup_aborted(vec!["A".to_string(), "B".to_string()]);
        assert!(failure.message.contains("'A, B'"));
    }
}
