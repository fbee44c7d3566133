//! Human-readable output formatter.
//!
//! Formats lint diagnostics for terminal display with optional color support.

use std::io::Write;

use super::LintFormatter;
use crate::lint::aggregate::Summary;
use crate::lint::Diagnostic;
use crate::ui::theme::LintTheme;

/// Formats lint output for human consumption.
pub struct HumanFormatter {
    theme: LintTheme,
}

impl HumanFormatter {
    /// Create a new human formatter.
    pub fn new(use_color: bool) -> Self {
        Self {
            theme: LintTheme::for_output(use_color),
        }
    }
}

impl LintFormatter for HumanFormatter {
    fn format<W: Write + ?Sized>(&self, diagnostics: &[Diagnostic], writer: &mut W) -> std::io::Result<()> {
        for diag in diagnostics {
            // Header line: error[code]: message
            writeln!(
                writer,
                "{}: {}",
                self.theme.format_label(diag.severity, &diag.code),
                self.theme.message.apply_to(&diag.message)
            )?;

            let location = match diag.column {
                Some(column) => format!("{}:{}:{}", diag.file, diag.line, column),
                None => format!("{}:{}", diag.file, diag.line),
            };
            writeln!(writer, "  {} {}", self.theme.arrow.apply_to("-->"), location)?;
            writeln!(writer)?;
        }

        let summary = Summary::of(diagnostics);
        if summary.total() > 0 {
            writeln!(
                writer,
                "Found {} error(s) and {} warning(s)",
                self.theme.highlight.apply_to(summary.errors),
                self.theme.highlight.apply_to(summary.warnings)
            )?;
        }

        Ok(())
    }
}
