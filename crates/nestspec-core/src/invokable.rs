//! Deferred units of work: hook bodies, spec bodies and declaration bodies.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::builder::SuiteBuilder;

/// Conversion of a closure's return value into a uniform outcome.
///
/// Lets bodies be written either as plain blocks (`|| { assert!(..); }`)
/// or as fallible ones (`|| -> anyhow::Result<()> { .. }`).
///
/// Bodies that only diverge, such as `|| todo!()` or `|| panic!(..)`, need
/// an explicit `-> ()` annotation: `|| -> () { todo!() }`.
pub trait IntoOutcome {
    fn into_outcome(self) -> anyhow::Result<()>;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl IntoOutcome for anyhow::Result<()> {
    fn into_outcome(self) -> anyhow::Result<()> {
        self
    }
}

/// A zero-argument, possibly failing unit of work.
///
/// Cloning is cheap; the same hook is shared by every planned sequence that
/// includes it.
#[derive(Clone)]
pub struct Invokable(Rc<dyn Fn() -> anyhow::Result<()>>);

impl Invokable {
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn() -> R + 'static,
        R: IntoOutcome,
    {
        Self(Rc::new(move || f().into_outcome()))
    }

    /// Run the body, propagating its failure. Panics are not intercepted.
    pub fn invoke(&self) -> anyhow::Result<()> {
        (self.0)()
    }

    /// Run the body, turning a panic (e.g. a failed `assert!`) into an error.
    pub fn invoke_caught(&self) -> anyhow::Result<()> {
        catch_panic(|| self.invoke())
    }

    /// Whether two handles point at the same body.
    pub fn ptr_eq(&self, other: &Invokable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Invokable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invokable(..)")
    }
}

/// A one-shot suite declaration body, run against the current recorder.
pub struct DeclarationBody(Box<dyn FnOnce(&mut SuiteBuilder) -> anyhow::Result<()>>);

impl DeclarationBody {
    pub fn new<F, R>(f: F) -> Self
    where
        F: FnOnce(&mut SuiteBuilder) -> R + 'static,
        R: IntoOutcome,
    {
        Self(Box::new(move |builder: &mut SuiteBuilder| f(builder).into_outcome()))
    }

    /// Consume the body, declaring into `builder`.
    pub fn declare(self, builder: &mut SuiteBuilder) -> anyhow::Result<()> {
        (self.0)(builder)
    }
}

impl fmt::Debug for DeclarationBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeclarationBody(..)")
    }
}

/// Run `f`, converting an unwinding panic into an error with the panic message.
pub fn catch_panic<F>(f: F) -> anyhow::Result<()>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(anyhow::anyhow!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
