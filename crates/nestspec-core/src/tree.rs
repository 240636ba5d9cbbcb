//! Realized suite tree.
//!
//! Suites and specs live in one arena owned by [`SuiteTree`] and refer to
//! each other by index. Parent links are navigational only; the tree is
//! immutable once the evaluator hands it out.

use sha2::{Digest, Sha256};

use crate::builder::Mark;
use crate::invokable::Invokable;

/// Index of a suite inside its [`SuiteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiteId(pub(crate) usize);

/// Index of a spec inside its [`SuiteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpecId(pub(crate) usize);

/// Body of a spec: either runnable or intentionally pending.
#[derive(Debug, Clone)]
pub enum SpecBody {
    Executable(Invokable),
    Pending,
}

impl SpecBody {
    pub fn is_pending(&self) -> bool {
        matches!(self, SpecBody::Pending)
    }

    pub fn invokable(&self) -> Option<&Invokable> {
        match self {
            SpecBody::Executable(inv) => Some(inv),
            SpecBody::Pending => None,
        }
    }
}

/// A direct child of a suite, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    Spec(SpecId),
    Suite(SuiteId),
}

/// Lifecycle hooks registered directly on one suite.
#[derive(Debug, Clone, Default)]
pub struct SuiteHooks {
    pub before: Vec<Invokable>,
    pub after: Vec<Invokable>,
    pub before_each: Vec<Invokable>,
    pub after_each: Vec<Invokable>,
}

/// A realized suite.
#[derive(Debug, Clone)]
pub struct Suite {
    pub(crate) description: Option<String>,
    pub(crate) parent: Option<SuiteId>,
    pub(crate) mark: Mark,
    pub(crate) children: Vec<Child>,
    pub(crate) hooks: SuiteHooks,
}

impl Suite {
    /// `None` only for the implicit root.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn parent(&self) -> Option<SuiteId> {
        self.parent
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Direct child specs, in declaration order.
    pub fn specs(&self) -> impl Iterator<Item = SpecId> + '_ {
        self.children.iter().filter_map(|c| match c {
            Child::Spec(id) => Some(*id),
            Child::Suite(_) => None,
        })
    }

    /// Direct child suites, in declaration order.
    pub fn suites(&self) -> impl Iterator<Item = SuiteId> + '_ {
        self.children.iter().filter_map(|c| match c {
            Child::Suite(id) => Some(*id),
            Child::Spec(_) => None,
        })
    }

    pub fn hooks(&self) -> &SuiteHooks {
        &self.hooks
    }
}

/// A realized spec.
#[derive(Debug, Clone)]
pub struct Spec {
    pub(crate) description: String,
    pub(crate) suite: SuiteId,
    pub(crate) mark: Mark,
    pub(crate) body: SpecBody,
}

impl Spec {
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Owning suite.
    pub fn suite(&self) -> SuiteId {
        self.suite
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub fn body(&self) -> &SpecBody {
        &self.body
    }

    pub fn is_pending(&self) -> bool {
        self.body.is_pending()
    }
}

/// The realized tree of suites and specs produced by one evaluation.
#[derive(Debug, Clone)]
pub struct SuiteTree {
    suites: Vec<Suite>,
    specs: Vec<Spec>,
}

impl SuiteTree {
    pub(crate) fn new() -> Self {
        Self {
            suites: Vec::new(),
            specs: Vec::new(),
        }
    }

    pub(crate) fn push_suite(&mut self, suite: Suite) -> SuiteId {
        self.suites.push(suite);
        SuiteId(self.suites.len() - 1)
    }

    pub(crate) fn push_spec(&mut self, spec: Spec) -> SpecId {
        let id = SpecId(self.specs.len());
        let suite = spec.suite;
        self.specs.push(spec);
        self.suites[suite.0].children.push(Child::Spec(id));
        id
    }

    pub(crate) fn attach_suite(&mut self, parent: SuiteId, child: SuiteId) {
        self.suites[parent.0].children.push(Child::Suite(child));
    }

    /// The implicit root suite. Always the first suite created.
    pub fn root(&self) -> SuiteId {
        SuiteId(0)
    }

    pub fn suite(&self, id: SuiteId) -> &Suite {
        &self.suites[id.0]
    }

    pub fn spec(&self, id: SpecId) -> &Spec {
        &self.specs[id.0]
    }

    pub fn suite_count(&self) -> usize {
        self.suites.len()
    }

    pub fn spec_count(&self) -> usize {
        self.specs.len()
    }

    /// Find a direct child suite by description.
    pub fn child_suite(&self, parent: SuiteId, description: &str) -> Option<SuiteId> {
        self.suite(parent)
            .suites()
            .find(|id| self.suite(*id).description() == Some(description))
    }

    /// Suite ids from `suite` up to the root, innermost first.
    pub fn ancestors(&self, suite: SuiteId) -> Vec<SuiteId> {
        let mut chain = vec![suite];
        let mut current = self.suite(suite).parent;
        while let Some(id) = current {
            chain.push(id);
            current = self.suite(id).parent;
        }
        chain
    }

    /// Every spec in pre-order, specs and child suites interleaved in
    /// declaration order.
    pub fn collect_specs(&self) -> Vec<SpecId> {
        self.collect_specs_in(self.root())
    }

    /// Like [`SuiteTree::collect_specs`], restricted to the subtree at `suite`.
    pub fn collect_specs_in(&self, suite: SuiteId) -> Vec<SpecId> {
        let mut out = Vec::new();
        self.walk_specs(suite, &mut out);
        out
    }

    fn walk_specs(&self, suite: SuiteId, out: &mut Vec<SpecId>) {
        for child in &self.suite(suite).children {
            match child {
                Child::Spec(id) => out.push(*id),
                Child::Suite(id) => self.walk_specs(*id, out),
            }
        }
    }

    /// Descriptions of the enclosing suites of `suite`, root excluded.
    pub fn suite_path(&self, suite: SuiteId) -> Vec<String> {
        let mut path: Vec<String> = self
            .ancestors(suite)
            .into_iter()
            .filter_map(|id| self.suite(id).description.clone())
            .collect();
        path.reverse();
        path
    }

    /// Descriptions from the outermost suite down to the spec itself.
    pub fn description_path(&self, spec: SpecId) -> Vec<String> {
        let spec = self.spec(spec);
        let mut path = self.suite_path(spec.suite);
        path.push(spec.description.clone());
        path
    }

    /// Human-readable identifier, e.g. `"Calculator, addition, adds"`.
    pub fn full_description(&self, spec: SpecId) -> String {
        self.description_path(spec).join(", ")
    }

    /// SHA-256 hex digest of the tree shape.
    ///
    /// Covers descriptions, nesting, ordering, marks, pending status and hook
    /// counts. Two evaluations of the same declarations yield equal digests.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        self.hash_suite(self.root(), 0, &mut hasher);
        hex::encode(hasher.finalize())
    }

    fn hash_suite(&self, id: SuiteId, depth: usize, hasher: &mut Sha256) {
        let suite = self.suite(id);
        hasher.update(b"suite\0");
        hasher.update(depth.to_le_bytes());
        hasher.update(suite.description.as_deref().unwrap_or("").as_bytes());
        hasher.update(b"\0");
        hasher.update(suite.mark.as_str().as_bytes());
        for count in [
            suite.hooks.before.len(),
            suite.hooks.after.len(),
            suite.hooks.before_each.len(),
            suite.hooks.after_each.len(),
        ] {
            hasher.update(count.to_le_bytes());
        }
        for child in &suite.children {
            match child {
                Child::Spec(spec_id) => {
                    let spec = self.spec(*spec_id);
                    hasher.update(b"spec\0");
                    hasher.update(spec.description.as_bytes());
                    hasher.update(b"\0");
                    hasher.update(spec.mark.as_str().as_bytes());
                    hasher.update([u8::from(spec.is_pending())]);
                }
                Child::Suite(child_id) => self.hash_suite(*child_id, depth + 1, hasher),
            }
        }
        hasher.update(b"end\0");
    }
}
