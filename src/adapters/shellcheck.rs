//! shellcheck adapter.
//!
//! Scripts are piped to `shellcheck --format=json1 -`, which reports a
//! `comments` array with 1-based start and end positions.

use std::path::PathBuf;

use serde::Deserialize;

use super::process::run_with_stdin;
use super::{AdapterError, ExternalChecker};
use crate::lint::span::Position;
use crate::lint::{Checker, Diagnostic, Severity};
use crate::recipe::SubDocument;

const TOOL: &str = "shellcheck";

/// Optional checks enabled on top of the defaults (see `shellcheck --list-optional`).
const OPTIONAL_CHECKS: &[&str] = &[
    // Suggest explicitly using -n in `[ $var ]`.
    "avoid-nullary-conditions",
    // Notify when set -e is suppressed during function invocation.
    "check-set-e-suppressed",
];

/// Exit codes that still come with a complete report.
const NORMAL_EXIT_CODES: &[i32] = &[0, 1];

#[derive(Debug, Deserialize)]
struct Report {
    comments: Vec<Comment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Comment {
    line: usize,
    end_line: Option<usize>,
    column: usize,
    end_column: Option<usize>,
    level: String,
    code: u32,
    message: String,
}

impl Comment {
    fn into_diagnostic(self) -> Result<Diagnostic, AdapterError> {
        let severity = Severity::from_level(&self.level).ok_or_else(|| AdapterError::MalformedOutput {
            tool: TOOL,
            detail: format!("unknown level {:?} for SC{}", self.level, self.code),
        })?;
        let diagnostic = Diagnostic::new(
            Checker::Shellcheck,
            severity,
            format!("SC{}", self.code),
            self.message,
        )
        .at(Position::new(self.line, self.column));

        Ok(match (self.end_line, self.end_column) {
            (Some(end_line), Some(end_column)) => diagnostic.with_end(end_line, end_column),
            _ => diagnostic,
        })
    }
}

/// Parse `--format=json1` output.
pub fn parse_report(stdout: &str) -> Result<Vec<Diagnostic>, AdapterError> {
    let report: Report = serde_json::from_str(stdout).map_err(|e| AdapterError::MalformedOutput {
        tool: TOOL,
        detail: e.to_string(),
    })?;
    report
        .comments
        .into_iter()
        .map(Comment::into_diagnostic)
        .collect()
}

/// Runs shellcheck on shell scripts.
#[derive(Debug, Clone)]
pub struct Shellcheck {
    program: PathBuf,
}

impl Shellcheck {
    /// Create an adapter running `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command-line arguments passed to shellcheck.
    pub fn args() -> Vec<String> {
        vec![
            "--format=json1".to_string(),
            "--shell=bash".to_string(),
            format!("--enable={}", OPTIONAL_CHECKS.join(",")),
            "-".to_string(),
        ]
    }
}

impl ExternalChecker for Shellcheck {
    fn checker(&self) -> Checker {
        Checker::Shellcheck
    }

    fn check(&self, document: &SubDocument) -> Result<Vec<Diagnostic>, AdapterError> {
        tracing::debug!("running {} on {} bytes", self.program.display(), document.text.len());
        let output = run_with_stdin(TOOL, &self.program, &Self::args(), &document.text)?
            .require_exit(TOOL, NORMAL_EXIT_CODES)?;
        parse_report(&output.stdout)
    }
}
