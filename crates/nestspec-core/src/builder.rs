//! Suite declaration recorder.
//!
//! [`SuiteBuilder`] is the DSL surface handed to every declaration body. It
//! captures exactly one level of declarations: the evaluator resets it before
//! each body runs and drains it right after the body returns.
//!
//! A duplicate description does not interrupt the body that declares it.
//! Only the first collision is stored and later declarations at that level
//! are ignored. The evaluator reports the collision once the body returns,
//! so nested bodies captured at that level never run.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::declaration::{DeclarationMode, DeclarationScope, SuiteDeclaration};
use crate::error::{DeclarationKind, SuiteError, SuiteResult};
use crate::invokable::{DeclarationBody, IntoOutcome, Invokable};
use crate::tree::SpecBody;

/// Focus classification of a single declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Plain,
    Focused,
    Pending,
}

impl Mark {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::Plain => "plain",
            Mark::Focused => "focused",
            Mark::Pending => "pending",
        }
    }
}

/// A declaration captured at one level, tagged with its focus mark.
#[derive(Debug)]
pub struct Captured<T> {
    /// Position among all declarations (suites and specs) at this level.
    pub order: usize,
    pub description: String,
    pub mark: Mark,
    pub item: T,
}

/// Everything one declaration body registered.
#[derive(Debug, Default)]
pub struct Captures {
    pub suites: Vec<Captured<SuiteDeclaration>>,
    pub specs: Vec<Captured<SpecBody>>,
    pub before: Vec<Invokable>,
    pub after: Vec<Invokable>,
    pub before_each: Vec<Invokable>,
    pub after_each: Vec<Invokable>,
}

/// Apply the focus override to one sibling group.
///
/// When any entry is focused only focused and pending entries survive;
/// otherwise every entry does. Declaration order is preserved.
pub fn effective<T>(entries: Vec<Captured<T>>) -> Vec<Captured<T>> {
    if entries.iter().any(|e| e.mark == Mark::Focused) {
        entries
            .into_iter()
            .filter(|e| e.mark != Mark::Plain)
            .collect()
    } else {
        entries
    }
}

/// Recorder for `describe`/`it`/hook declarations made by a single body.
#[derive(Debug)]
pub struct SuiteBuilder {
    captures: Captures,
    mode: DeclarationMode,
    scope: Option<Rc<DeclarationScope>>,
    next_order: usize,
    error: Option<SuiteError>,
}

impl Default for SuiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SuiteBuilder {
    pub fn new() -> Self {
        Self {
            captures: Captures::default(),
            mode: DeclarationMode::Normal,
            scope: None,
            next_order: 0,
            error: None,
        }
    }

    /// Empty every capture and prepare for the body of the suite at `scope`.
    pub fn reset(&mut self, scope: Option<Rc<DeclarationScope>>, mode: DeclarationMode) {
        self.captures = Captures::default();
        self.mode = mode;
        self.scope = scope;
        self.next_order = 0;
        self.error = None;
    }

    /// Whether declarations are currently forced pending (inside `xdescribe`).
    pub fn is_pending_mode(&self) -> bool {
        self.mode == DeclarationMode::Pending
    }

    /// Declare a nested suite.
    ///
    /// A description already used by a sibling suite is recorded as a
    /// duplicate; see the module docs.
    pub fn describe<F, R>(&mut self, description: impl Into<String>, body: F) -> &mut Self
    where
        F: FnOnce(&mut SuiteBuilder) -> R + 'static,
        R: IntoOutcome,
    {
        self.push_suite(description.into(), DeclarationBody::new(body), Mark::Plain)
    }

    /// Declare a focused nested suite; unfocused plain siblings are dropped.
    pub fn fdescribe<F, R>(&mut self, description: impl Into<String>, body: F) -> &mut Self
    where
        F: FnOnce(&mut SuiteBuilder) -> R + 'static,
        R: IntoOutcome,
    {
        self.push_suite(description.into(), DeclarationBody::new(body), Mark::Focused)
    }

    /// Declare a pending suite. Its body still runs to discover the specs
    /// it contains, but every one of them is pending and its hooks are
    /// discarded.
    pub fn xdescribe<F, R>(&mut self, description: impl Into<String>, body: F) -> &mut Self
    where
        F: FnOnce(&mut SuiteBuilder) -> R + 'static,
        R: IntoOutcome,
    {
        self.push_suite(description.into(), DeclarationBody::new(body), Mark::Pending)
    }

    /// Declare an executable spec.
    ///
    /// A description already used by a sibling spec (plain, focused or
    /// pending) is recorded as a duplicate; see the module docs.
    pub fn it<F, R>(&mut self, description: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoOutcome,
    {
        self.push_spec(description.into(), Some(Invokable::new(body)), Mark::Plain)
    }

    /// Declare a focused spec; unfocused plain siblings are dropped.
    pub fn fit<F, R>(&mut self, description: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoOutcome,
    {
        self.push_spec(description.into(), Some(Invokable::new(body)), Mark::Focused)
    }

    /// Declare a pending spec without a body.
    pub fn xit(&mut self, description: impl Into<String>) -> &mut Self {
        self.push_spec(description.into(), None, Mark::Pending)
    }

    /// Run once before the first spec of this suite.
    pub fn before<F, R>(&mut self, hook: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoOutcome,
    {
        if !self.is_pending_mode() {
            self.captures.before.push(Invokable::new(hook));
        }
        self
    }

    /// Run once after the last spec of this suite.
    pub fn after<F, R>(&mut self, hook: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoOutcome,
    {
        if !self.is_pending_mode() {
            self.captures.after.push(Invokable::new(hook));
        }
        self
    }

    /// Run before every spec in this suite and its descendants.
    pub fn before_each<F, R>(&mut self, hook: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoOutcome,
    {
        if !self.is_pending_mode() {
            self.captures.before_each.push(Invokable::new(hook));
        }
        self
    }

    /// Run after every spec in this suite and its descendants.
    pub fn after_each<F, R>(&mut self, hook: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoOutcome,
    {
        if !self.is_pending_mode() {
            self.captures.after_each.push(Invokable::new(hook));
        }
        self
    }

    pub fn suites(&self) -> &[Captured<SuiteDeclaration>] {
        &self.captures.suites
    }

    pub fn specs(&self) -> &[Captured<SpecBody>] {
        &self.captures.specs
    }

    pub fn before_hooks(&self) -> &[Invokable] {
        &self.captures.before
    }

    pub fn after_hooks(&self) -> &[Invokable] {
        &self.captures.after
    }

    pub fn before_each_hooks(&self) -> &[Invokable] {
        &self.captures.before_each
    }

    pub fn after_each_hooks(&self) -> &[Invokable] {
        &self.captures.after_each
    }

    /// First collision detected at this level, if any.
    pub fn error(&self) -> Option<&SuiteError> {
        self.error.as_ref()
    }

    /// Drain everything captured since the last reset.
    ///
    /// Fails with the first duplicate declaration seen at this level.
    pub fn take_captures(&mut self) -> SuiteResult<Captures> {
        if let Some(err) = self.error.take() {
            self.captures = Captures::default();
            return Err(err);
        }
        Ok(std::mem::take(&mut self.captures))
    }

    fn push_suite(&mut self, description: String, body: DeclarationBody, mark: Mark) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if self.captures.suites.iter().any(|s| s.description == description) {
            self.record_duplicate(DeclarationKind::Suite, description);
            return self;
        }

        let (mark, mode) = if self.is_pending_mode() || mark == Mark::Pending {
            (Mark::Pending, DeclarationMode::Pending)
        } else {
            (mark, DeclarationMode::Normal)
        };
        let declaration =
            SuiteDeclaration::nested(description.clone(), body, mode, self.scope.clone());
        let order = self.next_order();
        self.captures.suites.push(Captured {
            order,
            description,
            mark,
            item: declaration,
        });
        self
    }

    fn push_spec(&mut self, description: String, body: Option<Invokable>, mark: Mark) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if self.captures.specs.iter().any(|s| s.description == description) {
            self.record_duplicate(DeclarationKind::Spec, description);
            return self;
        }

        let item = match body {
            Some(body) if !self.is_pending_mode() => SpecBody::Executable(body),
            _ => SpecBody::Pending,
        };
        let mark = if item.is_pending() { Mark::Pending } else { mark };
        let order = self.next_order();
        self.captures.specs.push(Captured {
            order,
            description,
            mark,
            item,
        });
        self
    }

    fn record_duplicate(&mut self, kind: DeclarationKind, description: String) {
        let path = self.scope.as_ref().map(|s| s.path()).unwrap_or_default();
        tracing::debug!(kind = %kind, description = %description, "duplicate declaration");
        self.error = Some(SuiteError::DuplicateDeclaration {
            kind,
            description,
            path,
        });
    }

    fn next_order(&mut self) -> usize {
        let order = self.next_order;
        self.next_order += 1;
        order
    }
}
