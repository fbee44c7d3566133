//! Source positions.
//!
//! This module provides the [`Position`] type shared by the header locator
//! and by diagnostics, and the [`Frame`] type describing where a
//! sub-document sits inside the whole recipe file.

/// A 1-based location in a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Line (1-indexed).
    pub line: usize,
    /// Column (1-indexed), when known.
    pub column: Option<usize>,
}

impl Position {
    /// Create a position with a known column.
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column: Some(column),
        }
    }

    /// Create a position covering a whole line.
    pub fn line(line: usize) -> Self {
        Self { line, column: None }
    }

    /// Start of the document.
    pub fn start() -> Self {
        Self::line(1)
    }
}

/// Offsets converting sub-document coordinates to whole-file coordinates.
///
/// A diagnostic at sub-document line `l`, column `c` sits at whole-file line
/// `l + line_offset`, column `c + column_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    /// Lines preceding the sub-document in the file.
    pub line_offset: usize,
    /// Columns preceding every line of the sub-document.
    pub column_offset: usize,
}

impl Frame {
    /// The frame of a text starting at line 1, column 1 of the file.
    pub fn whole_file() -> Self {
        Self::default()
    }

    /// The frame of a text whose first line is file line `start_line`.
    pub fn starting_at(start_line: usize) -> Self {
        Self {
            line_offset: start_line.saturating_sub(1),
            column_offset: 0,
        }
    }

    /// Convert a sub-document line to a whole-file line.
    pub fn line(&self, line: usize) -> usize {
        line + self.line_offset
    }

    /// Convert a sub-document column to a whole-file column.
    pub fn column(&self, column: usize) -> usize {
        column + self.column_offset
    }
}
