//! Schema validation of recipe headers.
//!
//! Every key is validated on its own and every problem is reported: an
//! invalid key never hides problems on other keys, and one key may produce
//! several diagnostics.

use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::{Mapping, Value};

use super::package_name::package_name_violation;
use super::schema::{Check, Field, Rule, Schema};
use crate::header::{dotted, scalar_text, ParsedHeader, PathSegment, ValueKind};
use crate::lint::rule::{HeaderContext, HeaderRule};
use crate::lint::span::Position;
use crate::lint::{Checker, Diagnostic, Severity};

/// Code for schema violations.
pub const SCHEMA_CODE: &str = "ali:schema";

/// Substitution variables the build tool expands in `version`.
const VERSION_VARIABLES: &[&str] = &[
    "branch_basename",
    "branch_stream",
    "commit_hash",
    "short_hash",
    "tag",
    "tag_basename",
    "defaults_upper",
    "year",
    "month",
    "day",
    "hour",
];

static GIT_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(https?|git)://").unwrap());
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap());

/// One schema problem, before it is positioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path of the offending key or item.
    pub path: Vec<PathSegment>,
    /// What is wrong with it.
    pub message: String,
    /// The key is absent; there is no declaration to point at.
    pub missing: bool,
}

impl Violation {
    pub(crate) fn at(path: &[PathSegment], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
            missing: false,
        }
    }

    /// Message including the dotted path.
    pub fn describe(&self) -> String {
        format!("{}: {}", dotted(&self.path), self.message)
    }
}

/// Validate a header against a schema.
pub fn validate(header: &ParsedHeader, schema: &Schema) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut path = Vec::new();
    validate_record(schema.fields(), header.root(), &mut path, &mut violations);
    violations
}

fn validate_record(
    fields: &[Field],
    mapping: &Mapping,
    path: &mut Vec<PathSegment>,
    out: &mut Vec<Violation>,
) {
    for field in fields.iter().filter(|f| f.required) {
        if !mapping.contains_key(field.name) {
            path.push(PathSegment::key(field.name));
            out.push(Violation {
                missing: true,
                ..Violation::at(path, "required key not found")
            });
            path.pop();
        }
    }

    for (key, value) in mapping {
        let Some(name) = scalar_text(key) else {
            out.push(Violation::at(path, "keys must be scalars"));
            continue;
        };
        path.push(PathSegment::Key(name.clone()));
        match fields.iter().find(|f| f.name == name) {
            None => out.push(Violation::at(path, "unknown key")),
            Some(field) => {
                validate_value(&field.rule, value, path, out);
                for needed in field.needs {
                    if !mapping.contains_key(*needed) {
                        out.push(Violation::at(
                            path,
                            format!("requires {} to be set as well", needed),
                        ));
                    }
                }
            }
        }
        path.pop();
    }
}

fn validate_value(rule: &Rule, value: &Value, path: &mut Vec<PathSegment>, out: &mut Vec<Violation>) {
    if is_null(value) {
        out.push(Violation::at(path, "null value not allowed"));
        return;
    }
    let actual = ValueKind::of(value);
    if let Some(expected) = rule.kind() {
        if expected != actual {
            out.push(Violation::at(
                path,
                format!("expected {}, got {}", rule.describe(), actual),
            ));
            return;
        }
    }

    match rule {
        Rule::Scalar(checks) => {
            for check in checks {
                for problem in apply_check(*check, value) {
                    out.push(Violation::at(path, problem));
                }
            }
        }
        Rule::Sequence(item_rule) => {
            if let Some(items) = value.as_sequence() {
                for (index, item) in items.iter().enumerate() {
                    path.push(PathSegment::Index(index));
                    validate_value(item_rule, item, path, out);
                    path.pop();
                }
            }
        }
        Rule::Map { keys, values } => {
            if let Some(mapping) = value.as_mapping() {
                for (key, item) in mapping {
                    let Some(name) = scalar_text(key) else {
                        out.push(Violation::at(path, "keys must be scalars"));
                        continue;
                    };
                    path.push(PathSegment::Key(name));
                    for check in keys {
                        for problem in apply_check(*check, key) {
                            out.push(Violation::at(path, problem));
                        }
                    }
                    validate_value(values, item, path, out);
                    path.pop();
                }
            }
        }
        Rule::Record(fields) => {
            if let Some(mapping) = value.as_mapping() {
                validate_record(fields, mapping, path, out);
            }
        }
        Rule::AnyOf(rules) => {
            let matches_any = rules.iter().any(|alternative| {
                let mut scratch = Vec::new();
                validate_value(alternative, value, &mut path.clone(), &mut scratch);
                scratch.is_empty()
            });
            if !matches_any {
                out.push(Violation::at(
                    path,
                    format!("expected {}, got {}", rule.describe(), describe_value(value)),
                ));
            }
        }
    }
}

fn is_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Tagged(tagged) => is_null(&tagged.value),
        _ => false,
    }
}

/// Kind of a value, naming the item kind of sequences.
fn describe_value(value: &Value) -> String {
    match value.as_sequence() {
        Some(items) => {
            let mut kinds: Vec<_> = items.iter().map(|i| ValueKind::of(i).name()).collect();
            kinds.sort_unstable();
            kinds.dedup();
            if kinds.is_empty() {
                "empty sequence".to_string()
            } else {
                format!("sequence of {}", kinds.join(" and "))
            }
        }
        None => ValueKind::of(value).to_string(),
    }
}

fn apply_check(check: Check, value: &Value) -> Vec<String> {
    if check == Check::Boolean {
        return match value {
            Value::Bool(_) => Vec::new(),
            _ => vec!["must be a boolean".to_string()],
        };
    }
    let Some(text) = scalar_text(value) else {
        return vec!["must be a scalar".to_string()];
    };
    match check {
        Check::Boolean => Vec::new(),
        Check::Regex => regex_problem(&text)
            .map(|e| format!("invalid regex: {}", e))
            .into_iter()
            .collect(),
        Check::VersionFormat => version_format_problems(&text),
        Check::GitUrl => {
            if GIT_URL.is_match(&text) {
                Vec::new()
            } else {
                vec!["must be an http://, https:// or git:// URL".to_string()]
            }
        }
        Check::Require => match text.split_once(':') {
            Some((_, arch)) => regex_problem(arch)
                .map(|e| format!("invalid architecture regex after colon: {}", e))
                .into_iter()
                .collect(),
            None => Vec::new(),
        },
        Check::RelativeToplevelPath => {
            let mut problems = Vec::new();
            if text.starts_with('/') {
                problems.push("expecting a relative path".to_string());
            }
            if text.contains('/') {
                problems.push("expecting a toplevel path (i.e. without slashes)".to_string());
            }
            problems
        }
        Check::Identifier => {
            if IDENTIFIER.is_match(&text) {
                Vec::new()
            } else {
                vec![format!("{:?} is not a valid variable name", text)]
            }
        }
    }
}

/// Compile error of `pattern`, if any.
///
/// Look-around and backreferences are valid for the build tool's regex
/// engine, so the "not supported" errors of the `regex` crate are ignored.
fn regex_problem(pattern: &str) -> Option<String> {
    match Regex::new(pattern) {
        Ok(_) => None,
        Err(regex::Error::Syntax(message)) if message.contains("not supported") => None,
        Err(e) => Some(
            e.to_string()
                .lines()
                .last()
                .unwrap_or_default()
                .trim()
                .to_string(),
        ),
    }
}

/// Problems with `%`-substitutions in a version string.
fn version_format_problems(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut problems = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '%' {
            i += 1;
            continue;
        }
        match chars.get(i + 1) {
            Some('%') => i += 2,
            Some('(') => {
                let Some(close) = chars[i + 2..].iter().position(|&c| c == ')') else {
                    problems.push("%-format error: incomplete format key".to_string());
                    break;
                };
                let close = i + 2 + close;
                let name: String = chars[i + 2..close].iter().collect();
                if !VERSION_VARIABLES.contains(&name.as_str()) {
                    problems.push(format!("substitution variable '{}' is invalid", name));
                }
                match chars.get(close + 1) {
                    Some('s') => {}
                    Some(other) => problems.push(format!(
                        "invalid substitution type '%({}){}'; use only %(...)s",
                        name, other
                    )),
                    None => problems.push("%-format error: incomplete format".to_string()),
                }
                i = close + 2;
            }
            next => {
                let shown: String = next.map_or("%".to_string(), |c| format!("%{}", c));
                problems.push(format!(
                    "invalid substitution type '{}'; use only %(...)s \
                     (or use '%%' if you want a literal '%')",
                    shown
                ));
                i += 2;
            }
        }
    }

    problems
}

/// Turn violations into positioned diagnostics.
pub fn violations_to_diagnostics(
    header: &ParsedHeader,
    violations: &[Violation],
    severity: Severity,
) -> Vec<Diagnostic> {
    violations
        .iter()
        .map(|violation| {
            let position = if violation.missing {
                Position::start()
            } else {
                header.position_of(&violation.path)
            };
            Diagnostic::new(Checker::Headerlint, severity, SCHEMA_CODE, violation.describe())
            .at(position)
        })
        .collect()
}

/// Checks the header against the recipe schema.
pub struct SchemaRule;

impl HeaderRule for SchemaRule {
    fn code(&self) -> &'static str {
        SCHEMA_CODE
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &HeaderContext<'_>) -> Vec<Diagnostic> {
        let mut violations = validate(ctx.header, ctx.schema);
        if let Some(file_name) = ctx.file_name {
            violations.extend(package_name_violation(ctx.header, file_name));
        }
        violations_to_diagnostics(ctx.header, &violations, self.default_severity())
    }
}
