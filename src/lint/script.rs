//! Recipe-specific checks on shell scripts.
//!
//! These complement shellcheck with conventions of the build tool: module
//! files, the expected shebang, and a few patterns that are known to break
//! in practice. Positions are relative to the script; the aggregator moves
//! them into the recipe.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::lint::{Checker, Diagnostic, Severity};
use crate::recipe::{Script, ScriptRole};

use super::span::Position;

macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pattern).unwrap());
    };
}

lazy_regex!(RE_MODULES_ESCAPE, r"\$::");
lazy_regex!(RE_DYLD_LIBRARY_PATH, r"\bDYLD_LIBRARY_PATH\b");
lazy_regex!(RE_UNSET_PREFIX, r"^\s*unset\s+$");
lazy_regex!(
    RE_MASKED_MKDIR,
    r"^[^#]*mkdir\s+.*etc/modulefiles\s*&&\s*rsync\s+.*etc/modulefiles"
);

/// Shebang scripts must start with.
pub const EXPECTED_SHEBANG: &str = "#!/bin/bash -e\n";

/// Recipe-level facts the script checks depend on.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptContext<'a> {
    /// Recipe file name, `None` for standard input.
    pub file_name: Option<&'a str>,
    /// Whether the header declares `system_requirement`.
    pub system_requirement: bool,
}

impl ScriptContext<'_> {
    /// `defaults-*` recipes only set up the environment.
    fn is_defaults_recipe(&self) -> bool {
        self.file_name
            .and_then(|name| Path::new(name).file_name())
            .is_some_and(|name| name.to_string_lossy().starts_with("defaults-"))
    }
}

fn script_diagnostic(
    severity: Severity,
    code: &str,
    message: impl Into<String>,
    line: usize,
    column: usize,
) -> Diagnostic {
    Diagnostic::new(Checker::Scriptlint, severity, code, message).at(Position::new(line, column))
}

/// Run every script check on one script.
pub fn lint_script(script: &Script, ctx: &ScriptContext<'_>) -> Vec<Diagnostic> {
    let text = script.document.text.as_str();
    let exempt = ctx.system_requirement || ctx.is_defaults_recipe();
    let mut diagnostics = Vec::new();

    if script.role == ScriptRole::Main
        && !exempt
        && !text.contains("#%Module")
        && !text.contains("alibuild-generate-module")
    {
        diagnostics.push(script_diagnostic(
            Severity::Info,
            "ali:missing-modulefile",
            format!(
                "{} should create a Modulefile; use alibuild-generate-module or add a \
                 \"#%Module1.0\" comment to your manually-created Modulefile",
                script.role.describe()
            ),
            1,
            1,
        ));
    }

    let wants_shebang = match &script.role {
        ScriptRole::Main => true,
        ScriptRole::Embedded(key) => key == "incremental_recipe" || text.starts_with("#!"),
    };
    if wants_shebang && !exempt && !text.starts_with(EXPECTED_SHEBANG) {
        let problem = if text.starts_with("#!") { "Invalid" } else { "Missing" };
        diagnostics.push(script_diagnostic(
            Severity::Info,
            "ali:bad-shebang",
            format!(
                "{} script shebang. Use exactly \"#!/bin/bash -e\" to match the build \
                 environment. You may see spurious errors until you fix the shebang.",
                problem
            ),
            1,
            1,
        ));
    }

    for (index, line) in text.lines().enumerate() {
        let lineno = index + 1;
        diagnostics.extend(prepend_path_colons(line, lineno));

        for found in RE_DYLD_LIBRARY_PATH.find_iter(line) {
            if RE_UNSET_PREFIX.is_match(&line[..found.start()]) {
                continue;
            }
            diagnostics.push(script_diagnostic(
                Severity::Info,
                "ali:dyld-library-path",
                "DYLD_LIBRARY_PATH is ignored on recent MacOS versions",
                lineno,
                found.start() + 1,
            ));
        }

        if RE_MASKED_MKDIR.is_match(line) {
            let column = line.find("&&").map_or(1, |pos| pos + 1);
            diagnostics.push(script_diagnostic(
                Severity::Info,
                "ali:masked-exitcode",
                "\"mkdir && rsync\" ignores errors if \"mkdir\" fails; prefer writing the \
                 commands on separate lines",
                lineno,
                column,
            ));
        }
    }

    diagnostics
}

/// Environment Modules 4 rejects `:` in `prepend-path`, except in `$::env(..)`.
fn prepend_path_colons(line: &str, lineno: usize) -> Vec<Diagnostic> {
    let Some(start) = line.find("prepend-path") else {
        return vec![];
    };
    let tail = &line[start..];
    let allowed: Vec<usize> = RE_MODULES_ESCAPE
        .find_iter(tail)
        .flat_map(|m| [m.start() + 1, m.start() + 2])
        .collect();

    tail.match_indices(':')
        .map(|(pos, _)| pos)
        .filter(|pos| !allowed.contains(pos))
        .map(|pos| {
            script_diagnostic(
                Severity::Error,
                "ali:colons-prepend-path",
                "Modules 4 does not allow colons in prepend-path",
                lineno,
                start + pos + 1,
            )
        })
        .collect()
}
