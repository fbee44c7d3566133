//! External checker adapters.
//!
//! Each adapter runs one third-party tool as a child process on a
//! sub-document and turns its machine-readable output into
//! [`Diagnostic`]s in sub-document coordinates.
//!
//! - [`shellcheck`] - shell scripts (main body and embedded scripts)
//! - [`yamllint`] - the YAML header
//! - [`process`] - spawning and stdin/stdout plumbing

pub mod process;
pub mod shellcheck;
pub mod yamllint;

pub use shellcheck::Shellcheck;
pub use yamllint::Yamllint;

use thiserror::Error;

use crate::error::LintError;
use crate::lint::{Checker, CheckerReport, Diagnostic, Severity};
use crate::recipe::SubDocument;

/// Code of the diagnostic standing in for a checker that failed.
pub const CHECKER_FAILED_CODE: &str = "ali:checker-failed";

/// Why an adapter produced no diagnostics.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The tool binary does not exist or may not be executed.
    #[error("{tool} is not installed or cannot be run ({program})")]
    ToolMissing { tool: &'static str, program: String },

    /// The tool exited with a status it never uses for findings.
    #[error("{tool} exited unexpectedly with {}{}", exit_label(.exit_code), stderr_suffix(.stderr))]
    Crashed {
        tool: &'static str,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The tool's output could not be understood.
    #[error("{tool} produced unreadable output: {detail}")]
    MalformedOutput { tool: &'static str, detail: String },

    /// Talking to the child process failed.
    #[error("I/O error while running {tool}: {source}")]
    Io {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    match stderr.lines().next() {
        Some(first) if !first.is_empty() => format!(": {}", first),
        _ => String::new(),
    }
}

/// A checker binary that could not be started.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MissingTool {
    /// Tool name, e.g. `shellcheck`.
    pub tool: &'static str,
    /// Program that was tried.
    pub program: String,
}

impl From<MissingTool> for LintError {
    fn from(missing: MissingTool) -> Self {
        LintError::ToolMissing {
            tool: missing.tool.to_string(),
            program: missing.program,
        }
    }
}

/// A third-party checker run on sub-documents.
pub trait ExternalChecker: Send + Sync {
    /// Which checker this is.
    fn checker(&self) -> Checker;

    /// Check one sub-document. Positions are relative to `document.text`.
    fn check(&self, document: &SubDocument) -> Result<Vec<Diagnostic>, AdapterError>;
}

/// Run `adapter` on `document`.
///
/// Crashes and unreadable output become a single `ali:checker-failed` error
/// at the start of the sub-document, replacing whatever the tool reported.
/// Only a missing tool is returned as an error: it is a problem with the
/// environment, not with the recipe.
pub fn run_adapter(
    adapter: &dyn ExternalChecker,
    document: &SubDocument,
) -> Result<CheckerReport, MissingTool> {
    match adapter.check(document) {
        Ok(diagnostics) => Ok(CheckerReport::new(document.frame, diagnostics)),
        Err(AdapterError::ToolMissing { tool, program }) => Err(MissingTool { tool, program }),
        Err(err) => {
            tracing::warn!("{}", err);
            let failed = Diagnostic::new(
                adapter.checker(),
                Severity::Error,
                CHECKER_FAILED_CODE,
                err.to_string(),
            );
            Ok(CheckerReport::new(document.frame, vec![failed]))
        }
    }
}
