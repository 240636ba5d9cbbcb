//! Lazy suite declaration nodes.
//!
//! A [`SuiteDeclaration`] is the inert record of one `describe`-family call:
//! its body has not run yet, so its children are unknown until the
//! evaluator consumes it.

use std::rc::Rc;

use crate::invokable::DeclarationBody;

/// How the evaluator treats a declaration's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationMode {
    /// Declarations inside the body keep their own kind.
    Normal,
    /// Declared through `xdescribe` (or nested in one): every spec discovered
    /// beneath it is pending and its hooks are discarded.
    Pending,
}

/// Navigational link from a declaration to its enclosing suites.
///
/// Only used to report the description path of a failing declaration.
#[derive(Debug)]
pub struct DeclarationScope {
    description: String,
    parent: Option<Rc<DeclarationScope>>,
}

impl DeclarationScope {
    pub fn new(description: impl Into<String>, parent: Option<Rc<DeclarationScope>>) -> Self {
        Self {
            description: description.into(),
            parent,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Descriptions from the outermost enclosing suite down to this one.
    pub fn path(&self) -> Vec<String> {
        let mut path = vec![self.description.clone()];
        let mut current = self.parent.as_deref();
        while let Some(scope) = current {
            path.push(scope.description.clone());
            current = scope.parent.as_deref();
        }
        path.reverse();
        path
    }
}

/// One captured `describe`, `fdescribe` or `xdescribe` call.
#[derive(Debug)]
pub struct SuiteDeclaration {
    description: Option<String>,
    body: DeclarationBody,
    mode: DeclarationMode,
    parent: Option<Rc<DeclarationScope>>,
}

impl SuiteDeclaration {
    /// The implicit root: no description, no parent.
    pub fn root(body: DeclarationBody) -> Self {
        Self {
            description: None,
            body,
            mode: DeclarationMode::Normal,
            parent: None,
        }
    }

    pub fn nested(
        description: impl Into<String>,
        body: DeclarationBody,
        mode: DeclarationMode,
        parent: Option<Rc<DeclarationScope>>,
    ) -> Self {
        Self {
            description: Some(description.into()),
            body,
            mode,
            parent,
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn mode(&self) -> DeclarationMode {
        self.mode
    }

    pub fn parent(&self) -> Option<&Rc<DeclarationScope>> {
        self.parent.as_ref()
    }

    /// Scope that children captured while this body runs will point at.
    ///
    /// `None` for the root, whose children have no enclosing suite.
    pub fn scope(&self) -> Option<Rc<DeclarationScope>> {
        self.description
            .as_ref()
            .map(|d| Rc::new(DeclarationScope::new(d.clone(), self.parent.clone())))
    }

    /// Description path of this node, root excluded.
    pub fn path(&self) -> Vec<String> {
        match self.scope() {
            Some(scope) => scope.path(),
            None => Vec::new(),
        }
    }

    /// Give up the body for evaluation.
    pub fn into_body(self) -> DeclarationBody {
        self.body
    }
}
