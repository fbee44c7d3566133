//! Lint command implementation.
//!
//! Lints every recipe, writes one report to stdout and run notices
//! (unreadable files, missing tools) to stderr.

use std::io::{ErrorKind, Write};

use crate::config::Settings;
use crate::error::{LintError, Result};
use crate::lint::write_diagnostics;
use crate::runner::{run, ExitStatus, RecipeSource, RunReport};

use super::dispatcher::{Command, CommandResult};

/// The lint command implementation.
pub struct LintCommand {
    sources: Vec<RecipeSource>,
    settings: Settings,
}

impl LintCommand {
    /// Create a new lint command.
    pub fn new(sources: Vec<RecipeSource>, settings: Settings) -> Self {
        Self { sources, settings }
    }

    /// Write the report for a finished run.
    fn report(&self, report: &RunReport, out: &mut dyn Write, err: &mut dyn Write) -> Result<CommandResult> {
        for unreadable in &report.unreadable {
            writeln!(err, "alilint: {}", unreadable)?;
        }
        for missing in &report.missing_tools {
            writeln!(err, "alilint: {}", LintError::from(missing.clone()))?;
        }

        let diagnostics = report.diagnostics();
        match write_diagnostics(self.settings.format, &diagnostics, self.settings.no_color, out) {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
            other => other?,
        }

        Ok(match report.exit_status() {
            ExitStatus::Clean => CommandResult::success(),
            status => CommandResult::failure(status.code()),
        })
    }
}

impl Command for LintCommand {
    fn execute(&self, out: &mut dyn Write, err: &mut dyn Write) -> Result<CommandResult> {
        let report = run(&self.sources, &self.settings)?;
        self.report(&report, out, err)
    }
}
