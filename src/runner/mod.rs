//! Lint run orchestration.
//!
//! Files are linted on a bounded thread pool; results are reported in input
//! order once every file is done.

pub mod pipeline;

pub use pipeline::{FileReport, RecipeInput, RecipeLinter};

use std::collections::BTreeSet;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::adapters::MissingTool;
use crate::config::Settings;
use crate::error::{LintError, Result};
use crate::lint::Diagnostic;

/// Where a recipe comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeSource {
    /// A file on disk.
    Path(PathBuf),
    /// Standard input, written `-` on the command line.
    Stdin,
}

impl RecipeSource {
    /// Interpret a command-line argument.
    pub fn from_arg(arg: &Path) -> Self {
        if arg == Path::new("-") {
            RecipeSource::Stdin
        } else {
            RecipeSource::Path(arg.to_path_buf())
        }
    }
}

/// Exit status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// No error diagnostics and every checker ran.
    Clean,
    /// At least one error diagnostic.
    LintErrors,
    /// A tool was missing or a file unreadable, with no error diagnostics.
    ConfigurationFailure,
}

impl ExitStatus {
    /// Process exit code.
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Clean => 0,
            ExitStatus::LintErrors => 1,
            ExitStatus::ConfigurationFailure => 2,
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Per-file diagnostics, files in input order.
    pub files: Vec<FileReport>,
    /// Tools that could not be started, each listed once.
    pub missing_tools: BTreeSet<MissingTool>,
    /// Inputs that could not be read.
    pub unreadable: Vec<LintError>,
}

impl RunReport {
    /// All diagnostics, grouped by file in input order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.files
            .iter()
            .flat_map(|file| file.diagnostics.iter().cloned())
            .collect()
    }

    /// Whether any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.files
            .iter()
            .any(|file| file.diagnostics.iter().any(Diagnostic::is_error))
    }

    /// Exit status; lint errors take precedence over configuration problems.
    pub fn exit_status(&self) -> ExitStatus {
        if self.has_errors() {
            ExitStatus::LintErrors
        } else if !self.missing_tools.is_empty() || !self.unreadable.is_empty() {
            ExitStatus::ConfigurationFailure
        } else {
            ExitStatus::Clean
        }
    }
}

enum Outcome {
    Linted(FileReport),
    Unreadable(LintError),
}

fn read_source(
    source: &RecipeSource,
    stdin: Option<&io::Result<String>>,
) -> std::result::Result<RecipeInput, LintError> {
    match source {
        RecipeSource::Stdin => match stdin {
            Some(Err(e)) => Err(LintError::InputUnreadable {
                path: PathBuf::from("-"),
                source: io::Error::new(e.kind(), e.to_string()),
            }),
            Some(Ok(text)) => Ok(RecipeInput::stdin(text.as_str())),
            None => Ok(RecipeInput::stdin("")),
        },
        RecipeSource::Path(path) => std::fs::read(path)
            .map(|bytes| {
                RecipeInput::file(
                    path.display().to_string(),
                    String::from_utf8_lossy(&bytes),
                )
            })
            .map_err(|source| LintError::InputUnreadable {
                path: path.clone(),
                source,
            }),
    }
}

/// Lint every source.
///
/// Standard input is read once, before any linting starts, even when `-`
/// is given several times. Invalid UTF-8 is replaced like it is for files,
/// and a failed read only makes `-` unreadable.
pub fn run(sources: &[RecipeSource], settings: &Settings) -> Result<RunReport> {
    let stdin = sources.contains(&RecipeSource::Stdin).then(|| {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .map(|_| String::from_utf8_lossy(&bytes).into_owned())
    });
    lint_sources(sources, settings, stdin.as_ref())
}

/// Lint every source, using `stdin` as the text of `-`.
pub fn run_with_stdin(sources: &[RecipeSource], settings: &Settings, stdin: Option<&str>) -> Result<RunReport> {
    let stdin = stdin.map(|text| Ok(text.to_string()));
    lint_sources(sources, settings, stdin.as_ref())
}

fn lint_sources(
    sources: &[RecipeSource],
    settings: &Settings,
    stdin: Option<&io::Result<String>>,
) -> Result<RunReport> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.jobs.get())
        .build()
        .map_err(anyhow::Error::from)?;
    let linter = RecipeLinter::new(settings);

    tracing::debug!("linting {} recipe(s) on {} thread(s)", sources.len(), settings.jobs);
    let outcomes: Vec<Outcome> = pool.install(|| {
        sources
            .par_iter()
            .map(|source| match read_source(source, stdin) {
                Ok(input) => Outcome::Linted(linter.lint(&input)),
                Err(err) => Outcome::Unreadable(err),
            })
            .collect()
    });

    let mut report = RunReport::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Linted(file) => {
                report.missing_tools.extend(file.missing_tools.iter().cloned());
                report.files.push(file);
            }
            Outcome::Unreadable(err) => report.unreadable.push(err),
        }
    }
    Ok(report)
}
