//! Runner configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding a spec filter substring.
pub const ENV_FILTER: &str = "NESTSPEC_FILTER";
/// Set to `json` for newline-delimited JSON logs.
pub const ENV_LOG_FORMAT: &str = "NESTSPEC_LOG_FORMAT";
/// Path the JSON run report is written to.
pub const ENV_REPORT: &str = "NESTSPEC_REPORT";

/// Configuration for a [`crate::SpecRunner`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Only run specs whose full description contains this substring.
    pub filter: Option<String>,

    /// Convert panics in spec and hook bodies into failures.
    ///
    /// When disabled a panicking body unwinds through the runner.
    pub catch_panics: bool,

    /// Emit JSON-formatted log lines.
    pub log_json: bool,

    /// Write the JSON run report here after the run.
    pub report_path: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            filter: None,
            catch_panics: true,
            log_json: false,
            report_path: None,
        }
    }
}

impl RunnerConfig {
    /// Create a config from `NESTSPEC_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        RunnerConfig {
            filter: lookup(ENV_FILTER).filter(|f| !f.is_empty()),
            catch_panics: true,
            log_json: lookup(ENV_LOG_FORMAT)
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            report_path: lookup(ENV_REPORT).filter(|p| !p.is_empty()).map(PathBuf::from),
        }
    }

    /// Restrict the run to matching specs.
    pub fn with_filter(mut self, filter: &str) -> Self {
        self.filter = Some(filter.to_string());
        self
    }

    /// Write the JSON report to `path`.
    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Let panics in bodies propagate instead of recording them.
    pub fn without_panic_capture(mut self) -> Self {
        self.catch_panics = false;
        self
    }

    /// Whether a spec with this full description is selected.
    pub fn selects(&self, full_description: &str) -> bool {
        self.filter
            .as_deref()
            .map_or(true, |f| full_description.contains(f))
    }
}
