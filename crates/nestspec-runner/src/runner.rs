//! Spec execution.
//!
//! Runs a realized [`SuiteTree`] one spec at a time, in tree order, firing
//! hooks according to the [`ExecutionSchedule`] and the hook plan of each
//! spec. Every failure is attributed to exactly one spec and reported once.

use std::collections::HashSet;
use std::time::Instant;

use nestspec_core::{
    collect_scoped_hooks, obs, HookPhase, Invokable, IntoOutcome, SpecBody, SpecId, SuiteBuilder,
    SuiteId, SuiteTree,
};

use crate::config::RunnerConfig;
use crate::error::Result;
use crate::outcome::{Failure, SpecInfo, SpecOutcome, SpecResult};
use crate::reporter::{Reporter, RunReport};
use crate::schedule::{ExecutionSchedule, ScheduledSpec};

/// Totals of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, outcome: &SpecOutcome) {
        match outcome {
            SpecOutcome::Passed => self.passed += 1,
            SpecOutcome::Failed { .. } => self.failed += 1,
            SpecOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// Mutable bookkeeping for one run.
#[derive(Default)]
struct RunState {
    /// Suites whose `before` list was attempted; only these fire `after`.
    entered: HashSet<SuiteId>,
    /// Suites whose `before` list failed.
    broken: HashSet<SuiteId>,
}

impl RunState {
    /// Innermost enclosing suite of `suite` (inclusive) whose setup failed.
    fn broken_ancestor(&self, tree: &SuiteTree, suite: SuiteId) -> Option<SuiteId> {
        tree.ancestors(suite)
            .into_iter()
            .find(|id| self.broken.contains(id))
    }
}

/// Synchronous, single-threaded spec runner.
#[derive(Debug, Clone, Default)]
pub struct SpecRunner {
    config: RunnerConfig,
}

impl SpecRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Specs of `tree` selected by the configured filter, in tree order.
    pub fn selected_specs(&self, tree: &SuiteTree) -> Vec<SpecId> {
        tree.collect_specs()
            .into_iter()
            .filter(|id| self.config.selects(&tree.full_description(*id)))
            .collect()
    }

    /// Run every selected spec of `tree`, reporting each one to `reporter`.
    pub fn run(&self, tree: &SuiteTree, reporter: &mut dyn Reporter) -> RunSummary {
        let start = Instant::now();
        let specs = self.selected_specs(tree);
        let schedule = ExecutionSchedule::new(tree, &specs);
        let mut state = RunState::default();
        let mut summary = RunSummary::default();

        for step in schedule.steps() {
            let result = self.run_step(tree, step, &mut state, reporter);
            summary.record(&result.outcome);
            reporter.spec_finished(&result);
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;
        obs::emit_run_finished(
            summary.passed,
            summary.failed,
            summary.skipped,
            summary.duration_ms,
        );
        summary
    }

    fn run_step(
        &self,
        tree: &SuiteTree,
        step: &ScheduledSpec,
        state: &mut RunState,
        reporter: &mut dyn Reporter,
    ) -> SpecResult {
        let info = SpecInfo::from_tree(tree, step.spec);
        let body = match tree.spec(step.spec).body() {
            SpecBody::Executable(body) => body,
            SpecBody::Pending => {
                obs::emit_spec_finished(&info.full_description, "skipped", 0);
                return SpecResult {
                    spec: info,
                    outcome: SpecOutcome::Skipped,
                    duration_ms: 0,
                };
            }
        };

        let start = Instant::now();
        reporter.spec_started(&info);
        obs::emit_spec_started(&info.full_description);

        let mut failures = Vec::new();
        for &suite in &step.enter {
            self.enter_suite(tree, suite, state, &mut failures);
        }

        let suite = tree.spec(step.spec).suite();
        match state.broken_ancestor(tree, suite) {
            Some(broken) => {
                // The failure itself was attributed when it happened.
                if failures.is_empty() {
                    failures.push(Failure::setup_aborted(tree.suite_path(broken)));
                }
            }
            None => self.run_spec(tree, suite, body, &mut failures),
        }

        for &suite in &step.exit {
            self.exit_suite(tree, suite, state, &mut failures);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let outcome = SpecOutcome::from_failures(failures);
        obs::emit_spec_finished(&info.full_description, outcome.status(), duration_ms);
        SpecResult {
            spec: info,
            outcome,
            duration_ms,
        }
    }

    /// `before_each` chain, body, then the whole `after_each` chain.
    fn run_spec(
        &self,
        tree: &SuiteTree,
        suite: SuiteId,
        body: &Invokable,
        failures: &mut Vec<Failure>,
    ) {
        let mut setup_ok = true;
        for scoped in collect_scoped_hooks(tree, suite, HookPhase::BeforeEach) {
            if let Err(err) = self.invoke(&scoped.hook) {
                self.hook_failed(tree, scoped.suite, HookPhase::BeforeEach, &err, failures);
                setup_ok = false;
                break;
            }
        }

        if setup_ok {
            if let Err(err) = self.invoke(body) {
                failures.push(Failure::spec(&err));
            }
        }

        for scoped in collect_scoped_hooks(tree, suite, HookPhase::AfterEach) {
            if let Err(err) = self.invoke(&scoped.hook) {
                self.hook_failed(tree, scoped.suite, HookPhase::AfterEach, &err, failures);
            }
        }
    }

    fn enter_suite(
        &self,
        tree: &SuiteTree,
        suite: SuiteId,
        state: &mut RunState,
        failures: &mut Vec<Failure>,
    ) {
        if state.broken_ancestor(tree, suite).is_some() {
            return;
        }
        state.entered.insert(suite);
        for hook in &tree.suite(suite).hooks().before {
            if let Err(err) = self.invoke(hook) {
                self.hook_failed(tree, suite, HookPhase::Before, &err, failures);
                state.broken.insert(suite);
                return;
            }
        }
    }

    fn exit_suite(
        &self,
        tree: &SuiteTree,
        suite: SuiteId,
        state: &mut RunState,
        failures: &mut Vec<Failure>,
    ) {
        if !state.entered.remove(&suite) {
            return;
        }
        for hook in &tree.suite(suite).hooks().after {
            if let Err(err) = self.invoke(hook) {
                self.hook_failed(tree, suite, HookPhase::After, &err, failures);
            }
        }
    }

    fn hook_failed(
        &self,
        tree: &SuiteTree,
        suite: SuiteId,
        phase: HookPhase,
        err: &anyhow::Error,
        failures: &mut Vec<Failure>,
    ) {
        let path = tree.suite_path(suite);
        obs::emit_hook_failed(&path, phase.as_str(), err);
        failures.push(Failure::hook(phase, path, err));
    }

    fn invoke(&self, invokable: &Invokable) -> anyhow::Result<()> {
        if self.config.catch_panics {
            invokable.invoke_caught()
        } else {
            invokable.invoke()
        }
    }
}

/// Evaluate `entry`, run the resulting tree and collect a [`RunReport`].
///
/// The report is also written to `config.report_path` when set.
pub fn run_declarations<F, R>(entry: F, config: RunnerConfig) -> Result<RunReport>
where
    F: FnOnce(&mut SuiteBuilder) -> R + 'static,
    R: IntoOutcome,
{
    let tree = SuiteTree::build(entry)?;
    let mut report = RunReport::new(tree.fingerprint());
    let runner = SpecRunner::new(config);
    {
        let _span = obs::RunSpan::enter(&report.run_id.to_string());
        runner.run(&tree, &mut report);
    }
    if let Some(path) = &runner.config().report_path {
        report.write_json(path)?;
    }
    Ok(report)
}
