//! The per-file lint pipeline.
//!
//! A recipe is split once; the internal checks (header rules, script checks)
//! and the external tools then run side by side on the pieces, and their
//! reports are merged into one sorted, whole-file stream.

use rayon::prelude::*;

use crate::adapters::{run_adapter, ExternalChecker, MissingTool, Shellcheck, Yamllint};
use crate::config::{EnabledCheckers, Settings};
use crate::header::{parse_header, stray_separators, HeaderError, ParsedHeader};
use crate::lint::{
    aggregate, lint_script, CheckerReport, Diagnostic, HeaderContext, RuleRegistry, Schema,
    ScriptContext,
};
use crate::recipe::{
    embedded_scripts, missing_separator, split_recipe, EmbeddedScripts, Script, ScriptRole,
    SplitRecipe, SubDocument,
};

/// One recipe to lint.
#[derive(Debug, Clone)]
pub struct RecipeInput {
    /// Name shown in diagnostics, `-` for standard input.
    pub display_name: String,
    /// File name checked against `package`, `None` for standard input.
    pub file_name: Option<String>,
    /// Full recipe text.
    pub text: String,
}

impl RecipeInput {
    /// A recipe read from a file.
    pub fn file(path: impl Into<String>, text: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            display_name: path.clone(),
            file_name: Some(path),
            text: text.into(),
        }
    }

    /// A recipe read from standard input.
    pub fn stdin(text: impl Into<String>) -> Self {
        Self {
            display_name: "-".to_string(),
            file_name: None,
            text: text.into(),
        }
    }
}

/// What linting one recipe produced.
#[derive(Debug, Clone, Default)]
pub struct FileReport {
    /// Sorted diagnostics in whole-file coordinates.
    pub diagnostics: Vec<Diagnostic>,
    /// Tools that could not be started while linting this recipe.
    pub missing_tools: Vec<MissingTool>,
}

/// The pieces of a split recipe every checker works from.
struct Documents<'a> {
    split: SplitRecipe<'a>,
    header: Result<ParsedHeader, HeaderError>,
    embedded: EmbeddedScripts,
    scripts: Vec<Script>,
}

impl<'a> Documents<'a> {
    fn new(split: SplitRecipe<'a>) -> Self {
        let header = parse_header(split.header);
        let embedded = header.as_ref().map(embedded_scripts).unwrap_or_default();

        let mut scripts = vec![Script {
            document: SubDocument::new(split.body, split.body_frame()),
            role: ScriptRole::Main,
        }];
        scripts.extend(embedded.scripts.iter().cloned());

        Self {
            split,
            header,
            embedded,
            scripts,
        }
    }

    fn header_document(&self) -> SubDocument {
        SubDocument::new(self.split.header, self.split.header_frame())
    }

    fn is_system_requirement(&self) -> bool {
        self.header
            .as_ref()
            .is_ok_and(|header| header.contains_key("system_requirement"))
    }
}

/// Lints recipes with a fixed set of checkers.
pub struct RecipeLinter {
    checkers: EnabledCheckers,
    registry: RuleRegistry,
    shellcheck: Shellcheck,
    yamllint: Yamllint,
}

impl RecipeLinter {
    /// Create a linter for the given settings.
    pub fn new(settings: &Settings) -> Self {
        Self {
            checkers: settings.checkers,
            registry: RuleRegistry::with_builtins(),
            shellcheck: Shellcheck::new(&settings.shellcheck),
            yamllint: Yamllint::new(&settings.yamllint, &settings.yamllint_config),
        }
    }

    /// Lint one recipe.
    pub fn lint(&self, input: &RecipeInput) -> FileReport {
        tracing::debug!("linting {}", input.display_name);

        let Some(split) = split_recipe(&input.text) else {
            return FileReport {
                diagnostics: aggregate(
                    &input.display_name,
                    vec![CheckerReport::whole_file(vec![missing_separator()])],
                ),
                missing_tools: Vec::new(),
            };
        };
        let documents = Documents::new(split);

        let (mut reports, (external, missing_tools)) = rayon::join(
            || self.internal_reports(&documents, input.file_name.as_deref()),
            || self.external_reports(&documents),
        );
        reports.extend(external);

        FileReport {
            diagnostics: aggregate(&input.display_name, reports),
            missing_tools,
        }
    }

    fn internal_reports(&self, documents: &Documents<'_>, file_name: Option<&str>) -> Vec<CheckerReport> {
        let mut reports = Vec::new();

        if self.checkers.headerlint {
            let mut diagnostics = stray_separators(documents.split.header);
            match &documents.header {
                Ok(header) => {
                    diagnostics.extend(self.registry.check(&HeaderContext {
                        header,
                        schema: Schema::recipe(),
                        file_name,
                    }));
                    diagnostics.extend(documents.embedded.diagnostics.iter().cloned());
                }
                Err(err) => diagnostics.push(err.to_diagnostic()),
            }
            reports.push(CheckerReport::new(documents.split.header_frame(), diagnostics));
        }

        if self.checkers.scriptlint {
            let ctx = ScriptContext {
                file_name,
                system_requirement: documents.is_system_requirement(),
            };
            reports.extend(
                documents
                    .scripts
                    .iter()
                    .map(|script| CheckerReport::new(script.document.frame, lint_script(script, &ctx))),
            );
        }

        reports
    }

    fn external_reports(&self, documents: &Documents<'_>) -> (Vec<CheckerReport>, Vec<MissingTool>) {
        let header_document = documents.header_document();
        let mut jobs: Vec<(&dyn ExternalChecker, &SubDocument)> = Vec::new();

        if self.checkers.yamllint {
            jobs.push((&self.yamllint as &dyn ExternalChecker, &header_document));
        }
        if self.checkers.shellcheck {
            jobs.extend(
                documents
                    .scripts
                    .iter()
                    .map(|script| (&self.shellcheck as &dyn ExternalChecker, &script.document)),
            );
        }

        let results: Vec<_> = jobs
            .par_iter()
            .map(|(adapter, document)| run_adapter(*adapter, document))
            .collect();

        let mut reports = Vec::new();
        let mut missing = Vec::new();
        for result in results {
            match result {
                Ok(report) => reports.push(report),
                Err(tool) => {
                    if !missing.contains(&tool) {
                        missing.push(tool);
                    }
                }
            }
        }
        (reports, missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::Severity;

    const GOOD: &str = "package: zlib\nversion: v1.3\ntag: v1.3\n---\n#!/bin/bash -e\nmake\nalibuild-generate-module > \"$MODULEFILE\"\n";

    fn internal_linter() -> RecipeLinter {
        RecipeLinter::new(&Settings {
            checkers: EnabledCheckers::internal_only(),
            ..Settings::default()
        })
    }

    fn codes(report: &FileReport) -> Vec<&str> {
        report.diagnostics.iter().map(|d| d.code.as_str()).collect()
    }

    #[test]
    fn clean_recipe_has_no_diagnostics() {
        let report = internal_linter().lint(&RecipeInput::file("zlib.sh", GOOD));
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        assert!(report.missing_tools.is_empty());
    }

    #[test]
    fn missing_separator_is_the_only_diagnostic() {
        let report = internal_linter().lint(&RecipeInput::file("zlib.sh", "package: zlib\n"));
        assert_eq!(codes(&report), vec!["ali:empty"]);
        assert_eq!(report.diagnostics[0].file, "zlib.sh");
    }

    #[test]
    fn missing_separator_is_reported_with_every_checker_off() {
        let linter = RecipeLinter::new(&Settings {
            checkers: EnabledCheckers {
                headerlint: false,
                scriptlint: false,
                shellcheck: false,
                yamllint: false,
            },
            ..Settings::default()
        });
        assert_eq!(codes(&linter.lint(&RecipeInput::stdin("x\n"))), vec!["ali:empty"]);
        assert!(linter.lint(&RecipeInput::stdin("x: 1\n---\n")).diagnostics.is_empty());
    }

    #[test]
    fn missing_tag_only() {
        let report = internal_linter().lint(&RecipeInput::stdin("package: X\nversion: 1\n---\n"));
        let header: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.source == crate::lint::Checker::Headerlint)
            .collect();
        assert_eq!(header.len(), 1);
        assert_eq!(header[0].code, "ali:schema");
        assert!(header[0].message.contains("tag"));
    }

    #[test]
    fn key_order_at_package_line() {
        let report = internal_linter().lint(&RecipeInput::stdin("tag: v1\npackage: X\nversion: 1\n---\n"));
        let order: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.code == "ali:key-order")
            .collect();
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].line, 2);
    }

    #[test]
    fn parse_error_skips_schema() {
        let report = internal_linter().lint(&RecipeInput::stdin("package: [zlib\n---\nmake\n"));
        let header: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.source == crate::lint::Checker::Headerlint)
            .collect();
        assert_eq!(header.len(), 1);
        assert_eq!(header[0].code, "ali:parse");
        assert_eq!(header[0].severity, Severity::Error);
    }

    #[test]
    fn script_findings_land_on_file_lines() {
        let text = format!("{}export DYLD_LIBRARY_PATH=x\n", GOOD);
        let report = internal_linter().lint(&RecipeInput::file("zlib.sh", text));
        assert_eq!(codes(&report), vec!["ali:dyld-library-path"]);
        assert_eq!(report.diagnostics[0].line, 8);
        assert_eq!(report.diagnostics[0].column, Some(8));
    }

    #[test]
    fn embedded_script_findings_are_shifted_into_the_header() {
        let text = "package: zlib\nversion: v1\ntag: v1\nincremental_recipe: |\n  #!/bin/bash -e\n  export DYLD_LIBRARY_PATH=x\n---\n#!/bin/bash -e\n#%Module1.0\n";
        let report = internal_linter().lint(&RecipeInput::file("zlib.sh", text));
        assert_eq!(codes(&report), vec!["ali:dyld-library-path"]);
        assert_eq!(report.diagnostics[0].line, 6);
        assert_eq!(report.diagnostics[0].column, Some(10));
    }

    #[test]
    fn system_requirements_skip_modulefile_check() {
        let text = "package: zlib\nversion: v1\ntag: v1\nsystem_requirement: .*\nsystem_requirement_check: exit 0\n---\n";
        let report = internal_linter().lint(&RecipeInput::file("zlib.sh", text));
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    }

    #[test]
    fn missing_tools_are_collected_once() {
        let linter = RecipeLinter::new(&Settings {
            shellcheck: "/nonexistent/alilint-shellcheck".into(),
            yamllint: "/nonexistent/alilint-yamllint".into(),
            checkers: EnabledCheckers {
                headerlint: false,
                scriptlint: false,
                ..EnabledCheckers::default()
            },
            ..Settings::default()
        });
        let text = "package: zlib\nprefer_system_check: exit 1\n---\nmake\n";
        let report = linter.lint(&RecipeInput::file("zlib.sh", text));

        assert!(report.diagnostics.is_empty());
        let mut tools: Vec<_> = report.missing_tools.iter().map(|m| m.tool).collect();
        tools.sort();
        assert_eq!(tools, vec!["shellcheck", "yamllint"]);
    }
}
