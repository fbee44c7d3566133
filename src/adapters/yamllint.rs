//! yamllint adapter.
//!
//! The header is piped to `yamllint -f parsable -d <config> -`, which prints
//! one `stdin:LINE:COL: [LEVEL] MESSAGE (RULE)` line per problem.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use super::process::run_with_stdin;
use super::{AdapterError, ExternalChecker};
use crate::lint::span::Position;
use crate::lint::{Checker, Diagnostic, Severity};
use crate::recipe::SubDocument;

const TOOL: &str = "yamllint";

/// 0: clean, 1: errors, 2: warnings only (strict mode).
const NORMAL_EXIT_CODES: &[i32] = &[0, 1, 2];

static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<file>.+?):(?P<line>\d+):(?P<column>\d+):\s\[(?P<level>\w+)\]\s(?P<message>.+)\s\((?P<rule>[^)]+)\)$",
    )
    .unwrap()
});

fn parse_line(line: &str) -> Result<Diagnostic, String> {
    let caps = LINE_PATTERN
        .captures(line)
        .ok_or_else(|| format!("could not parse output line {:?}", line))?;
    let number = |name: &str| {
        caps[name]
            .parse::<usize>()
            .map_err(|_| format!("bad {} number in output line {:?}", name, line))
    };
    let position = Position::new(number("line")?, number("column")?);
    let severity = Severity::from_level(&caps["level"])
        .ok_or_else(|| format!("unknown level {:?} in output line {:?}", &caps["level"], line))?;
    Ok(Diagnostic::new(
        Checker::Yamllint,
        severity,
        format!("yl:{}", &caps["rule"]),
        &caps["message"],
    )
    .at(position))
}

/// Parse `-f parsable` output.
pub fn parse_output(stdout: &str) -> Result<Vec<Diagnostic>, AdapterError> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_line(line).map_err(|detail| AdapterError::MalformedOutput { tool: TOOL, detail }))
        .collect()
}

/// Runs yamllint on recipe headers.
#[derive(Debug, Clone)]
pub struct Yamllint {
    program: PathBuf,
    config: String,
}

impl Yamllint {
    /// Create an adapter running `program` with the given rule configuration.
    pub fn new(program: impl Into<PathBuf>, config: &serde_json::Value) -> Self {
        Self {
            program: program.into(),
            config: config.to_string(),
        }
    }

    /// Command-line arguments passed to yamllint.
    pub fn args(&self) -> Vec<String> {
        vec![
            "-f".to_string(),
            "parsable".to_string(),
            "-d".to_string(),
            self.config.clone(),
            "-".to_string(),
        ]
    }
}

impl ExternalChecker for Yamllint {
    fn checker(&self) -> Checker {
        Checker::Yamllint
    }

    fn check(&self, document: &SubDocument) -> Result<Vec<Diagnostic>, AdapterError> {
        tracing::debug!("running {} on {} bytes", self.program.display(), document.text.len());
        let output = run_with_stdin(TOOL, &self.program, &self.args(), &document.text)?
            .require_exit(TOOL, NORMAL_EXIT_CODES)?;
        parse_output(&output.stdout)
    }
}
