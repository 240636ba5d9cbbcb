//! nestspec runner - executes realized suite trees
//!
//! Provides the host-facing side of nestspec:
//! - `ExecutionSchedule` decides when per-suite `before`/`after` hooks fire
//! - `SpecRunner` executes specs in tree order and reports every outcome once
//! - `RunReport` collects results as a JSON/Markdown artifact

pub mod config;
pub mod error;
pub mod outcome;
pub mod reporter;
pub mod runner;
pub mod schedule;
pub mod telemetry;

// Re-export key types
pub use config::RunnerConfig;
pub use error::{Result, RunnerError};
pub use outcome::{Failure, FailureKind, SpecInfo, SpecOutcome, SpecResult};
pub use reporter::{Reporter, RunReport};
pub use runner::{run_declarations, RunSummary, SpecRunner};
pub use schedule::{ExecutionSchedule, ScheduledSpec};
pub use telemetry::{init_from_config, init_tracing};
