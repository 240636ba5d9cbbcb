//! Integration tests for run reports and error surfacing.

use nestspec_core::{DeclarationKind, SuiteError};
use nestspec_runner::{run_declarations, RunnerConfig, RunnerError};
use tracing_test::traced_test;

#[test]
fn test_run_declarations_writes_json_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("report.json");
    let config = RunnerConfig::default().with_report_path(&path);

    let report = run_declarations(
        |s| {
            s.describe("calculator", |s| {
                s.it("adds", || assert_eq!(1 + 1, 2));
                s.it("rejects", || -> anyhow::Result<()> {
                    anyhow::bail!("division by zero")
                });
                s.xit("multiplies");
            });
        },
        config,
    )
    .expect("run");

    assert_eq!(report.total, 3);
    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.skipped, 1);

    let raw = std::fs::read_to_string(&path).expect("read report");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("parse report");
    assert_eq!(json["run_id"], report.run_id.to_string());
    assert_eq!(json["tree_fingerprint"], report.tree_fingerprint);
    assert_eq!(json["total"], 3);
    assert_eq!(json["results"][0]["spec"]["full_description"], "calculator, adds");
    assert_eq!(json["results"][0]["outcome"]["status"], "passed");
    assert_eq!(json["results"][1]["outcome"]["status"], "failed");
    assert_eq!(
        json["results"][1]["outcome"]["failures"][0]["message"],
        "division by zero"
    );
    assert_eq!(json["results"][2]["outcome"]["status"], "skipped");
    assert_eq!(json["results"][2]["spec"]["pending"], true);
}

#[test]
fn test_report_is_only_written_when_path_is_set() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("report.json");
    let with_path = RunnerConfig::default().with_report_path(&path);
    let without_path = RunnerConfig {
        report_path: None,
        ..with_path.clone()
    };

    let report = run_declarations(|s| { s.it("ok", || ()); }, without_path).expect("run");
    assert!(report.success());
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).expect("read_dir").count(), 0);

    run_declarations(|s| { s.it("ok", || ()); }, with_path).expect("run");
    assert!(path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).expect("read_dir").count(), 1);
}

#[test]
fn test_same_declarations_share_fingerprint() {
    fn declarations(s: &mut nestspec_core::SuiteBuilder) {
        s.describe("A", |s| {
            s.it("a1", || ());
        });
    }
    let first = run_declarations(declarations, RunnerConfig::default()).expect("first");
    let second = run_declarations(declarations, RunnerConfig::default()).expect("second");
    assert_eq!(first.tree_fingerprint, second.tree_fingerprint);
    assert_ne!(first.run_id, second.run_id);
}

#[test]
fn test_duplicate_declaration_surfaces_as_suite_error() {
    let err = run_declarations(
        |s| {
            s.describe("A", |s| {
                s.it("same", || ());
                s.it("same", || ());
            });
        },
        RunnerConfig::default(),
    )
    .unwrap_err();

    match err {
        RunnerError::Suite(SuiteError::DuplicateDeclaration {
            kind,
            description,
            path,
        }) => {
            assert_eq!(kind, DeclarationKind::Spec);
            assert_eq!(description, "same");
            assert_eq!(path, vec!["A".to_string()]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_failing_declaration_body_aborts_run() {
    let err = run_declarations(
        |s| {
            s.describe("loader", |_| -> anyhow::Result<()> {
                anyhow::bail!("fixture missing")
            });
        },
        RunnerConfig::default(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        RunnerError::Suite(SuiteError::Declaration { .. })
    ));
    assert!(format!("{err:#}").contains("loader"));
}

#[test]
fn test_markdown_summary_of_real_run() {
    let report = run_declarations(
        |s| {
            s.describe("A", |s| {
                s.it("works", || ());
                s.xit("later");
            });
        },
        RunnerConfig::default(),
    )
    .expect("run");

    let md = report.render_markdown();
    assert!(md.contains("2 total, 1 passed, 0 failed, 1 skipped"));
    assert!(md.contains("- **PASS** `A, works`"));
    assert!(md.contains("- **SKIP** `A, later`"));
}

#[test]
#[traced_test]
fn test_run_emits_hook_failure_and_totals() {
    let report = run_declarations(
        |s| {
            s.before_each(|| -> anyhow::Result<()> { anyhow::bail!("no connection") });
            s.it("spec", || ());
        },
        RunnerConfig::default(),
    )
    .expect("run");
    assert_eq!(report.failed, 1);
    assert!(logs_contain("hook.failed"));
    assert!(logs_contain("no connection"));
    assert!(logs_contain("run.finished"));
}
