//! GCC-style output, understood by most editors' quickfix lists.

use std::io::Write;

use super::LintFormatter;
use crate::lint::{Diagnostic, Severity};

/// Formats one `file:line:col: level: message [code]` line per diagnostic.
pub struct GccFormatter;

impl GccFormatter {
    fn level(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "note",
        }
    }
}

impl LintFormatter for GccFormatter {
    fn format<W: Write + ?Sized>(&self, diagnostics: &[Diagnostic], writer: &mut W) -> std::io::Result<()> {
        for diag in diagnostics {
            write!(writer, "{}:{}:", diag.file, diag.line)?;
            if let Some(column) = diag.column {
                write!(writer, "{}:", column)?;
            }
            writeln!(
                writer,
                " {}: {} [{}]",
                Self::level(diag.severity),
                diag.message,
                diag.code
            )?;
        }
        Ok(())
    }
}
