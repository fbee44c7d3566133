//! Lint output formatters.
//!
//! This module provides formatters for outputting lint diagnostics
//! in different formats (human-readable, gcc, GitHub, JSON, SARIF).
//! Every formatter is a pure function of the diagnostics it is given.

pub mod gcc;
pub mod github;
pub mod human;
pub mod json;
pub mod sarif;

use std::io::Write;

use clap::ValueEnum;

use crate::lint::Diagnostic;
use crate::ui::theme::should_use_colors;

/// Output format for lint results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Multi-line, optionally colored, with a summary.
    #[default]
    Human,
    /// One `file:line:col: severity: message` line per diagnostic.
    Gcc,
    /// GitHub Actions workflow commands.
    Github,
    /// A JSON document with diagnostics and a summary.
    Json,
    /// A SARIF 2.1.0 log.
    Sarif,
}

/// Trait for formatting lint output.
pub trait LintFormatter {
    /// Format diagnostics to the given writer.
    fn format<W: Write + ?Sized>(&self, diagnostics: &[Diagnostic], writer: &mut W) -> std::io::Result<()>;
}

/// Write `diagnostics` in `format`.
pub fn write_diagnostics<W: Write + ?Sized>(
    format: OutputFormat,
    diagnostics: &[Diagnostic],
    no_color: bool,
    writer: &mut W,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Human => {
            HumanFormatter::new(!no_color && should_use_colors()).format(diagnostics, writer)
        }
        OutputFormat::Gcc => GccFormatter.format(diagnostics, writer),
        OutputFormat::Github => GithubFormatter.format(diagnostics, writer),
        OutputFormat::Json => JsonFormatter::new().format(diagnostics, writer),
        OutputFormat::Sarif => {
            SarifFormatter::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
                .format(diagnostics, writer)
        }
    }
}

pub use gcc::GccFormatter;
pub use github::GithubFormatter;
pub use human::HumanFormatter;
pub use json::JsonFormatter;
pub use sarif::SarifFormatter;
