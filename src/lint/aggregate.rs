//! Merging diagnostics from every checker into one per-file stream.

use super::span::Frame;
use super::{Diagnostic, Severity};

/// Diagnostics one checker produced for one sub-document, in that
/// sub-document's coordinates.
#[derive(Debug, Clone, Default)]
pub struct CheckerReport {
    /// Where the sub-document sits in the file.
    pub frame: Frame,
    /// Findings relative to the sub-document.
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckerReport {
    /// Create a report for a sub-document.
    pub fn new(frame: Frame, diagnostics: Vec<Diagnostic>) -> Self {
        Self { frame, diagnostics }
    }

    /// A report already in whole-file coordinates.
    pub fn whole_file(diagnostics: Vec<Diagnostic>) -> Self {
        Self::new(Frame::whole_file(), diagnostics)
    }
}

/// Remap every report into file coordinates, tag it with `file`, and sort.
///
/// Nothing is deduplicated: two checkers flagging the same spot both show.
pub fn aggregate(file: &str, reports: Vec<CheckerReport>) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = reports
        .into_iter()
        .flat_map(|report| {
            let frame = report.frame;
            report
                .diagnostics
                .into_iter()
                .map(move |diag| diag.remap(frame).in_file(file))
        })
        .collect();
    sort_diagnostics(&mut diagnostics);
    diagnostics
}

/// Stable sort by line, column, severity and checker name.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        (a.line, a.column.unwrap_or(0), a.severity.rank(), a.source.name()).cmp(&(
            b.line,
            b.column.unwrap_or(0),
            b.severity.rank(),
            b.source.name(),
        ))
    });
}

/// Diagnostic counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl Summary {
    /// Count the diagnostics of a run.
    pub fn of(diagnostics: &[Diagnostic]) -> Self {
        diagnostics
            .iter()
            .fold(Self::default(), |mut summary, diag| {
                match diag.severity {
                    Severity::Error => summary.errors += 1,
                    Severity::Warning => summary.warnings += 1,
                    Severity::Info => summary.infos += 1,
                }
                summary
            })
    }

    /// Total number of diagnostics.
    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}
