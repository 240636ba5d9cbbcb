//! Execution sequencing policy.
//!
//! Decides, for a flattened list of specs run one at a time, when each
//! suite's own `before` and `after` lists fire. A suite is entered right
//! before the first executable spec of its subtree and exited right after
//! the last one. Pending specs never enter or exit anything, so a subtree
//! holding only pending specs fires no hooks at all.

use std::collections::HashMap;

use nestspec_core::{SpecId, SuiteId, SuiteTree};

/// One spec of the run with the suite transitions surrounding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledSpec {
    pub spec: SpecId,
    /// Suites whose `before` list fires before this spec, outermost first.
    pub enter: Vec<SuiteId>,
    /// Suites whose `after` list fires after this spec, innermost first.
    pub exit: Vec<SuiteId>,
}

/// The ordered steps of a run.
#[derive(Debug, Clone, Default)]
pub struct ExecutionSchedule {
    steps: Vec<ScheduledSpec>,
}

impl ExecutionSchedule {
    /// Build the schedule for `specs`, which must be in tree pre-order
    /// (as returned by [`SuiteTree::collect_specs`], possibly filtered).
    pub fn new(tree: &SuiteTree, specs: &[SpecId]) -> Self {
        // (first, last) position of an executable spec within each suite's subtree
        let mut span: HashMap<SuiteId, (usize, usize)> = HashMap::new();
        for (pos, &spec) in specs.iter().enumerate() {
            if tree.spec(spec).is_pending() {
                continue;
            }
            for suite in tree.ancestors(tree.spec(spec).suite()) {
                span.entry(suite)
                    .and_modify(|(_, last)| *last = pos)
                    .or_insert((pos, pos));
            }
        }

        let steps = specs
            .iter()
            .enumerate()
            .map(|(pos, &spec)| {
                if tree.spec(spec).is_pending() {
                    return ScheduledSpec {
                        spec,
                        enter: Vec::new(),
                        exit: Vec::new(),
                    };
                }
                let chain = tree.ancestors(tree.spec(spec).suite());
                let exit: Vec<SuiteId> = chain
                    .iter()
                    .copied()
                    .filter(|s| span.get(s).map(|(_, last)| *last) == Some(pos))
                    .collect();
                let mut enter: Vec<SuiteId> = chain
                    .into_iter()
                    .filter(|s| span.get(s).map(|(first, _)| *first) == Some(pos))
                    .collect();
                enter.reverse();
                ScheduledSpec { spec, enter, exit }
            })
            .collect();

        Self { steps }
    }

    /// Schedule every spec of the tree.
    pub fn for_tree(tree: &SuiteTree) -> Self {
        Self::new(tree, &tree.collect_specs())
    }

    pub fn steps(&self) -> &[ScheduledSpec] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
