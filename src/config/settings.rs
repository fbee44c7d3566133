//! Resolved run settings.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::error::{LintError, Result};
use crate::lint::OutputFormat;

use super::yamllint::default_yamllint_config;

/// Default shellcheck binary, looked up on `PATH`.
pub const DEFAULT_SHELLCHECK: &str = "shellcheck";
/// Default yamllint binary, looked up on `PATH`.
pub const DEFAULT_YAMLLINT: &str = "yamllint";

/// Which checkers run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnabledCheckers {
    pub headerlint: bool,
    pub scriptlint: bool,
    pub shellcheck: bool,
    pub yamllint: bool,
}

impl Default for EnabledCheckers {
    fn default() -> Self {
        Self {
            headerlint: true,
            scriptlint: true,
            shellcheck: true,
            yamllint: true,
        }
    }
}

impl EnabledCheckers {
    /// Only the internal checkers, for runs without external tools.
    pub fn internal_only() -> Self {
        Self {
            shellcheck: false,
            yamllint: false,
            ..Self::default()
        }
    }
}

/// Everything a lint run needs to know, fixed before the first file is read.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Output format.
    pub format: OutputFormat,

    /// Enabled checkers.
    pub checkers: EnabledCheckers,

    /// shellcheck binary.
    pub shellcheck: PathBuf,

    /// yamllint binary.
    pub yamllint: PathBuf,

    /// yamllint rule configuration, passed inline with `-d`.
    pub yamllint_config: serde_json::Value,

    /// Number of files linted concurrently.
    pub jobs: NonZeroUsize,

    /// Never color output.
    pub no_color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            checkers: EnabledCheckers::default(),
            shellcheck: PathBuf::from(DEFAULT_SHELLCHECK),
            yamllint: PathBuf::from(DEFAULT_YAMLLINT),
            yamllint_config: default_yamllint_config(),
            jobs: default_jobs(),
            no_color: false,
        }
    }
}

impl Settings {
    /// Set the number of concurrent files. Zero is rejected.
    pub fn with_jobs(mut self, jobs: usize) -> Result<Self> {
        self.jobs = NonZeroUsize::new(jobs).ok_or_else(|| LintError::InvalidSettings {
            message: "--jobs must be at least 1".to_string(),
        })?;
        Ok(self)
    }
}

/// Available parallelism, or 1 when it cannot be determined.
pub fn default_jobs() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}
