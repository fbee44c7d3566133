//! GitHub Actions workflow commands.
//!
//! Printed from a workflow step, each line becomes an annotation on the
//! pull request's changed files.

use std::io::Write;

use super::LintFormatter;
use crate::lint::{Diagnostic, Severity};

/// Formats `::level file=..,line=..::message [code]` lines.
pub struct GithubFormatter;

impl GithubFormatter {
    fn level(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "notice",
        }
    }
}

/// Escape workflow command data (the message).
fn escape_data(text: &str) -> String {
    text.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a workflow command property value (the file name).
fn escape_property(text: &str) -> String {
    escape_data(text).replace(':', "%3A").replace(',', "%2C")
}

impl LintFormatter for GithubFormatter {
    fn format<W: Write + ?Sized>(&self, diagnostics: &[Diagnostic], writer: &mut W) -> std::io::Result<()> {
        for diag in diagnostics {
            write!(
                writer,
                "::{} file={},line={}",
                Self::level(diag.severity),
                escape_property(&diag.file),
                diag.line
            )?;
            if let Some(end_line) = diag.end_line {
                write!(writer, ",endLine={}", end_line)?;
            }
            if let Some(column) = diag.column {
                write!(writer, ",col={}", column)?;
            }
            if let Some(end_column) = diag.end_column {
                write!(writer, ",endColumn={}", end_column)?;
            }
            writeln!(writer, "::{}", escape_data(&format!("{} [{}]", diag.message, diag.code)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::span::Position;
    use crate::lint::Checker;

    fn render(diagnostics: &[Diagnostic]) -> String {
        let mut output = Vec::new();
        GithubFormatter.format(diagnostics, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn includes_range_when_known() {
        let output = render(&[Diagnostic::new(
            Checker::Shellcheck,
            Severity::Info,
            "SC2086",
            "Double quote to prevent globbing and word splitting.",
        )
        .at(Position::new(12, 6))
        .with_end(12, 10)
        .in_file("zlib.sh")]);

        assert_eq!(
            output,
            "::notice file=zlib.sh,line=12,endLine=12,col=6,endColumn=10::\
             Double quote to prevent globbing and word splitting. [SC2086]\n"
        );
    }

    #[test]
    fn escapes_file_and_message() {
        let output = render(&[Diagnostic::new(
            Checker::Headerlint,
            Severity::Error,
            "ali:parse",
            "100% broken\nsee line 2",
        )
        .at(Position::line(3))
        .in_file("dist/a,b:c.sh")]);

        assert_eq!(
            output,
            "::error file=dist/a%2Cb%3Ac.sh,line=3::100%25 broken%0Asee line 2 [ali:parse]\n"
        );
    }

    #[test]
    fn minimal_annotation() {
        let output = render(&[Diagnostic::new(
            Checker::Headerlint,
            Severity::Error,
            "ali:empty",
            "metadata not found or empty",
        )
        .in_file("-")]);

        assert_eq!(output, "::error file=-,line=1::metadata not found or empty [ali:empty]\n");
    }
}
