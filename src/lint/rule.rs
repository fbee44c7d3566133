//! Lint rule definitions.
//!
//! This module provides the core traits and types shared by every checker:
//!
//! - [`HeaderRule`] - The trait implemented by the internal header rules
//! - [`Severity`] - Severity level for diagnostics (Error, Warning, Info)
//! - [`Checker`] - Which analysis source produced a diagnostic

use super::diagnostic::Diagnostic;
use crate::header::ParsedHeader;
use crate::lint::schema::Schema;

/// Severity level for lint diagnostics.
///
/// Variants are ordered by urgency, most urgent first, which is also the
/// order diagnostics on the same location are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Error that makes the run fail.
    Error,
    /// Warning that should be addressed.
    Warning,
    /// Informational note, does not affect the exit status.
    Info,
}

impl Severity {
    /// Sort rank: error < warning < info.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }

    /// Map a level name reported by an external checker.
    ///
    /// shellcheck's `info` and `style` are informational. Unknown levels map
    /// to `None`.
    pub fn from_level(level: &str) -> Option<Self> {
        match level {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            "info" | "style" => Some(Severity::Info),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// The analysis source a diagnostic originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Checker {
    /// Internal header linter (splitting, parsing, schema, key order).
    Headerlint,
    /// Internal script linter.
    Scriptlint,
    /// External shell-script analyzer.
    Shellcheck,
    /// External YAML style checker.
    Yamllint,
}

impl Checker {
    /// Stable name, also used as the last sort key.
    pub fn name(self) -> &'static str {
        match self {
            Checker::Headerlint => "headerlint",
            Checker::Scriptlint => "scriptlint",
            Checker::Shellcheck => "shellcheck",
            Checker::Yamllint => "yamllint",
        }
    }
}

impl std::fmt::Display for Checker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What a header rule gets to look at.
pub struct HeaderContext<'a> {
    /// The parsed, position-annotated header.
    pub header: &'a ParsedHeader,
    /// The recipe schema.
    pub schema: &'a Schema,
    /// Recipe file name, `None` when reading standard input.
    pub file_name: Option<&'a str>,
}

/// A lint rule that validates a parsed recipe header.
///
/// Rules are independent: each one sees the whole header and reports every
/// problem it finds, whatever other rules report on the same keys.
pub trait HeaderRule: Send + Sync {
    /// Diagnostic code emitted by this rule.
    fn code(&self) -> &'static str;

    /// Severity of the diagnostics this rule reports.
    fn default_severity(&self) -> Severity;

    /// Check the header and return any diagnostics.
    fn check(&self, ctx: &HeaderContext<'_>) -> Vec<Diagnostic>;
}
