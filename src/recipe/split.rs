//! Header/body splitting.
//!
//! A recipe is a YAML header, a line containing exactly `---`, and a shell
//! script. Splitting is a pure function of the text; the separator line
//! number is kept so sub-document positions can be converted back to
//! whole-file positions by addition.

use crate::lint::span::Frame;
use crate::lint::{Checker, Diagnostic, Severity};

/// Separator between the header and the script.
pub const SEPARATOR: &str = "---";

/// Code for recipes without a separator line.
pub const EMPTY_CODE: &str = "ali:empty";

/// The diagnostic for a recipe without a separator line.
pub fn missing_separator() -> Diagnostic {
    Diagnostic::new(
        Checker::Headerlint,
        Severity::Error,
        EMPTY_CODE,
        "metadata not found or empty (is the '---' separator present?)",
    )
}

/// The two halves of a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRecipe<'a> {
    /// Every line before the separator, newlines included. May be empty.
    pub header: &'a str,
    /// Everything after the separator line.
    pub body: &'a str,
    /// 1-based line number of the separator.
    pub separator_line: usize,
}

impl<'a> SplitRecipe<'a> {
    /// Whole-file line of the first body line.
    pub fn body_start_line(&self) -> usize {
        self.separator_line + 1
    }

    /// Coordinate frame of the header (it starts the file).
    pub fn header_frame(&self) -> Frame {
        Frame::whole_file()
    }

    /// Coordinate frame of the body.
    pub fn body_frame(&self) -> Frame {
        Frame::starting_at(self.body_start_line())
    }
}

/// Split a recipe at the first line that is exactly `---`.
///
/// Only the trailing `\n` is stripped before comparing, so `--- ` or
/// `---\r` do not count as separators. Returns `None` when there is no
/// separator at all.
pub fn split_recipe(text: &str) -> Option<SplitRecipe<'_>> {
    let mut offset = 0;
    for (index, line) in text.split_inclusive('\n').enumerate() {
        let content = line.strip_suffix('\n').unwrap_or(line);
        if content == SEPARATOR {
            return Some(SplitRecipe {
                header: &text[..offset],
                body: &text[offset + line.len()..],
                separator_line: index + 1,
            });
        }
        offset += line.len();
    }
    None
}
