//! nestspec core - nested describe/it suites
//!
//! Provides the engine behind a Jasmine-style test DSL:
//! - `SuiteBuilder` records one level of `describe`/`it`/hook declarations
//! - `SuiteDefinitionEvaluator` runs declaration bodies depth-first into a `SuiteTree`
//! - `plan_hooks` computes the ordered hook sequences around a spec

pub mod builder;
pub mod declaration;
pub mod error;
pub mod evaluator;
pub mod invokable;
pub mod obs;
pub mod planner;
pub mod tree;

// Re-export key types
pub use builder::{effective, Captured, Captures, Mark, SuiteBuilder};
pub use declaration::{DeclarationMode, DeclarationScope, SuiteDeclaration};
pub use error::{DeclarationKind, SuiteError, SuiteResult};
pub use evaluator::SuiteDefinitionEvaluator;
pub use invokable::{catch_panic, DeclarationBody, IntoOutcome, Invokable};
pub use obs::{
    emit_evaluation_failed, emit_evaluation_finished, emit_hook_failed, emit_run_finished,
    emit_spec_finished, emit_spec_started, emit_suite_evaluated, RunSpan,
};
pub use planner::{
    collect_hooks, collect_scoped_hooks, plan_hooks, HookPhase, HookPlan, ScopedHook,
};
pub use tree::{Child, Spec, SpecBody, SpecId, Suite, SuiteHooks, SuiteId, SuiteTree};
