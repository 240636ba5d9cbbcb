//! Suite tree evaluation.
//!
//! Declaration bodies are executed depth-first starting at the root. Each
//! body runs against a freshly reset [`SuiteBuilder`]; its captures are
//! drained immediately afterwards, the focus override is applied, and every
//! surviving nested declaration is evaluated in turn.

use std::time::Instant;

use crate::builder::{effective, Captured, Mark, SuiteBuilder};
use crate::declaration::SuiteDeclaration;
use crate::error::{SuiteError, SuiteResult};
use crate::invokable::{catch_panic, DeclarationBody, IntoOutcome};
use crate::obs;
use crate::tree::{Spec, SpecBody, Suite, SuiteHooks, SuiteId, SuiteTree};

/// Turns a root declaration into a realized [`SuiteTree`].
///
/// Holds no state between runs; evaluating the same declarations twice
/// yields structurally identical trees.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuiteDefinitionEvaluator;

enum Declared {
    Spec(Captured<SpecBody>),
    Suite(Captured<SuiteDeclaration>),
}

impl Declared {
    fn order(&self) -> usize {
        match self {
            Declared::Spec(c) => c.order,
            Declared::Suite(c) => c.order,
        }
    }
}

impl SuiteDefinitionEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate `root` and everything it declares.
    ///
    /// Any duplicate declaration or failing declaration body aborts the whole
    /// evaluation; no partial tree is returned.
    pub fn evaluate(
        &self,
        root: SuiteDeclaration,
        builder: &mut SuiteBuilder,
    ) -> SuiteResult<SuiteTree> {
        let start = Instant::now();
        let mut tree = SuiteTree::new();
        if let Err(err) = self.evaluate_node(root, Mark::Plain, None, builder, &mut tree) {
            obs::emit_evaluation_failed(&err);
            return Err(err);
        }
        obs::emit_evaluation_finished(
            tree.suite_count(),
            tree.spec_count(),
            start.elapsed().as_millis() as u64,
        );
        Ok(tree)
    }

    fn evaluate_node(
        &self,
        node: SuiteDeclaration,
        mark: Mark,
        parent: Option<SuiteId>,
        builder: &mut SuiteBuilder,
        tree: &mut SuiteTree,
    ) -> SuiteResult<SuiteId> {
        let path = node.path();
        let description = node.description().map(str::to_string);
        builder.reset(node.scope(), node.mode());

        let body = node.into_body();
        let declared = catch_panic(|| body.declare(builder));
        let captures = builder.take_captures()?;
        if let Err(source) = declared {
            return Err(SuiteError::Declaration { path, source });
        }

        let suite_id = tree.push_suite(Suite {
            description,
            parent,
            mark,
            children: Vec::new(),
            hooks: SuiteHooks {
                before: captures.before,
                after: captures.after,
                before_each: captures.before_each,
                after_each: captures.after_each,
            },
        });
        if let Some(parent) = parent {
            tree.attach_suite(parent, suite_id);
        }

        let mut children: Vec<Declared> = effective(captures.specs)
            .into_iter()
            .map(Declared::Spec)
            .chain(effective(captures.suites).into_iter().map(Declared::Suite))
            .collect();
        children.sort_by_key(Declared::order);

        obs::emit_suite_evaluated(&path, children.len());

        for child in children {
            match child {
                Declared::Spec(spec) => {
                    tree.push_spec(Spec {
                        description: spec.description,
                        suite: suite_id,
                        mark: spec.mark,
                        body: spec.item,
                    });
                }
                Declared::Suite(suite) => {
                    self.evaluate_node(suite.item, suite.mark, Some(suite_id), builder, tree)?;
                }
            }
        }

        Ok(suite_id)
    }
}

impl SuiteTree {
    /// Evaluate a declaration entry point with a fresh recorder.
    ///
    /// ```
    /// use nestspec_core::SuiteTree;
    ///
    /// let tree = SuiteTree::build(|s| {
    ///     s.describe("A", |s| {
    ///         s.it("a1", || ());
    ///         s.xit("a2");
    ///     });
    /// })
    /// .unwrap();
    /// assert_eq!(tree.spec_count(), 2);
    /// ```
    pub fn build<F, R>(entry: F) -> SuiteResult<SuiteTree>
    where
        F: FnOnce(&mut SuiteBuilder) -> R + 'static,
        R: IntoOutcome,
    {
        let root = SuiteDeclaration::root(DeclarationBody::new(entry));
        SuiteDefinitionEvaluator::new().evaluate(root, &mut SuiteBuilder::new())
    }
}
