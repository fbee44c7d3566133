//! Lint diagnostic messages.
//!
//! This module provides the [`Diagnostic`] type, the single record every
//! checker reports through, whether the finding came from the internal
//! header linter or from an external tool.

use super::rule::{Checker, Severity};
use super::span::{Frame, Position};

/// A normalized finding.
///
/// Checkers fill in positions relative to the text they looked at; the
/// aggregator rewrites them into whole-file coordinates and sets `file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Display name of the recipe, `-` for standard input.
    pub file: String,
    /// Line (1-indexed).
    pub line: usize,
    /// Column (1-indexed), when known.
    pub column: Option<usize>,
    /// Last line of the flagged range, when the checker reports one.
    pub end_line: Option<usize>,
    /// Last column of the flagged range, when the checker reports one.
    pub end_column: Option<usize>,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Stable identifier, e.g. `ali:schema` or `SC2086`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// The checker that produced this diagnostic.
    pub source: Checker,
}

impl Diagnostic {
    /// Create a new diagnostic located at the start of its document.
    pub fn new(
        source: Checker,
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: String::new(),
            line: 1,
            column: None,
            end_line: None,
            end_column: None,
            severity,
            code: code.into(),
            message: message.into(),
            source,
        }
    }

    /// Set the start position.
    pub fn at(mut self, position: Position) -> Self {
        self.line = position.line;
        self.column = position.column;
        self
    }

    /// Set the end of the flagged range.
    pub fn with_end(mut self, end_line: usize, end_column: usize) -> Self {
        self.end_line = Some(end_line);
        self.end_column = Some(end_column);
        self
    }

    /// Set the file this diagnostic belongs to.
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Rewrite positions from sub-document to whole-file coordinates.
    pub fn remap(mut self, frame: Frame) -> Self {
        self.line = frame.line(self.line);
        self.column = self.column.map(|c| frame.column(c));
        self.end_line = self.end_line.map(|l| frame.line(l));
        self.end_column = self.end_column.map(|c| frame.column(c));
        self
    }

    /// Whether this diagnostic makes the run fail.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_creation() {
        let diag = Diagnostic::new(
            Checker::Headerlint,
            Severity::Error,
            "ali:schema",
            "tag: required key not found",
        );

        assert_eq!(diag.code, "ali:schema");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.line, 1);
        assert!(diag.column.is_none());
        assert!(diag.file.is_empty());
        assert!(diag.is_error());
    }

    #[test]
    fn diagnostic_builder_pattern() {
        let diag = Diagnostic::new(Checker::Shellcheck, Severity::Warning, "SC2034", "unused")
            .at(Position::new(3, 5))
            .with_end(3, 9)
            .in_file("zlib.sh");

        assert_eq!(diag.line, 3);
        assert_eq!(diag.column, Some(5));
        assert_eq!(diag.end_line, Some(3));
        assert_eq!(diag.end_column, Some(9));
        assert_eq!(diag.file, "zlib.sh");
        assert!(!diag.is_error());
    }

    #[test]
    fn remap_shifts_every_coordinate() {
        let diag = Diagnostic::new(Checker::Shellcheck, Severity::Info, "SC2086", "quote")
            .at(Position::new(3, 1))
            .with_end(4, 6)
            .remap(Frame {
                line_offset: 9,
                column_offset: 2,
            });

        assert_eq!(diag.line, 12);
        assert_eq!(diag.column, Some(3));
        assert_eq!(diag.end_line, Some(13));
        assert_eq!(diag.end_column, Some(8));
    }

    #[test]
    fn remap_keeps_missing_column_missing() {
        let diag = Diagnostic::new(Checker::Headerlint, Severity::Error, "ali:empty", "m")
            .remap(Frame::starting_at(5));

        assert_eq!(diag.line, 5);
        assert!(diag.column.is_none());
    }
}
