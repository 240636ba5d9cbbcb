//! Hook execution planning.
//!
//! Setup hooks run outermost first, teardown hooks innermost first, so
//! anything an outer `before` acquires is available to every inner
//! `before_each` and is released only after the inner teardown has run.

use serde::{Deserialize, Serialize};

use crate::invokable::Invokable;
use crate::tree::{SpecId, SuiteHooks, SuiteId, SuiteTree};

/// The four hook categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPhase {
    Before,
    BeforeEach,
    AfterEach,
    After,
}

impl HookPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookPhase::Before => "before",
            HookPhase::BeforeEach => "before_each",
            HookPhase::AfterEach => "after_each",
            HookPhase::After => "after",
        }
    }

    /// Setup phases execute root-to-leaf; teardown phases leaf-to-root.
    pub fn is_setup(&self) -> bool {
        matches!(self, HookPhase::Before | HookPhase::BeforeEach)
    }

    /// Hooks of this phase registered directly on one suite.
    pub fn select<'a>(&self, hooks: &'a SuiteHooks) -> &'a [Invokable] {
        match self {
            HookPhase::Before => &hooks.before,
            HookPhase::BeforeEach => &hooks.before_each,
            HookPhase::AfterEach => &hooks.after_each,
            HookPhase::After => &hooks.after,
        }
    }
}

/// Ordered hook sequences surrounding one spec.
#[derive(Debug, Clone, Default)]
pub struct HookPlan {
    pub before: Vec<Invokable>,
    pub before_each: Vec<Invokable>,
    pub after_each: Vec<Invokable>,
    pub after: Vec<Invokable>,
}

impl HookPlan {
    pub fn phase(&self, phase: HookPhase) -> &[Invokable] {
        match phase {
            HookPhase::Before => &self.before,
            HookPhase::BeforeEach => &self.before_each,
            HookPhase::AfterEach => &self.after_each,
            HookPhase::After => &self.after,
        }
    }
}

/// Compute every hook sequence for `spec` by walking its ancestor chain.
pub fn plan_hooks(tree: &SuiteTree, spec: SpecId) -> HookPlan {
    let suite = tree.spec(spec).suite();
    HookPlan {
        before: collect_hooks(tree, suite, HookPhase::Before),
        before_each: collect_hooks(tree, suite, HookPhase::BeforeEach),
        after_each: collect_hooks(tree, suite, HookPhase::AfterEach),
        after: collect_hooks(tree, suite, HookPhase::After),
    }
}

/// Hooks of `phase` from `suite` and all its ancestors, in execution order.
pub fn collect_hooks(tree: &SuiteTree, suite: SuiteId, phase: HookPhase) -> Vec<Invokable> {
    collect_scoped_hooks(tree, suite, phase)
        .into_iter()
        .map(|scoped| scoped.hook)
        .collect()
}

/// A planned hook together with the suite that registered it.
#[derive(Debug, Clone)]
pub struct ScopedHook {
    pub suite: SuiteId,
    pub hook: Invokable,
}

/// Same order as [`collect_hooks`], keeping track of each hook's owner.
pub fn collect_scoped_hooks(tree: &SuiteTree, suite: SuiteId, phase: HookPhase) -> Vec<ScopedHook> {
    let mut chain = tree.ancestors(suite);
    if phase.is_setup() {
        chain.reverse();
    }
    chain
        .into_iter()
        .flat_map(|id| {
            phase
                .select(tree.suite(id).hooks())
                .iter()
                .map(move |hook| ScopedHook {
                    suite: id,
                    hook: hook.clone(),
                })
        })
        .collect()
}
