//! Scripts embedded in the header.
//!
//! Top-level keys ending in `_recipe` or `_check` (`incremental_recipe`,
//! `system_requirement_check`, ...) hold shell scripts that the build tool
//! runs like the main body, so they are linted like it.

use serde_yaml::Value;

use super::{Script, ScriptRole, SubDocument};
use crate::header::{ParsedHeader, PathSegment};
use crate::lint::span::Frame;
use crate::lint::{Checker, Diagnostic, Severity};

/// Code for script keys whose value is not a string.
pub const SCRIPT_TYPE_CODE: &str = "ali:script-type";

/// Whether a top-level key holds a script.
pub fn is_script_key(key: &str) -> bool {
    key.ends_with("_recipe") || key.ends_with("_check")
}

/// Scripts found in a header, plus problems with script keys.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedScripts {
    /// String-valued script keys, in declaration order.
    pub scripts: Vec<Script>,
    /// `ali:script-type` errors for non-string values.
    pub diagnostics: Vec<Diagnostic>,
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(tagged) => type_name(&tagged.value),
    }
}

fn script_text(value: &Value) -> Option<&str> {
    match value {
        Value::String(text) => Some(text),
        Value::Tagged(tagged) => script_text(&tagged.value),
        _ => None,
    }
}

/// Frame of the script stored under `key`.
///
/// Block scalars (`key: |`) start on the next line at the body's
/// indentation. Inline values start where they are written.
fn script_frame(header: &ParsedHeader, key: &str) -> Frame {
    let Some(declaration) = header.key_declaration(key) else {
        return Frame::starting_at(header.position_of(&[PathSegment::key(key)]).line);
    };

    match (declaration.block_body, declaration.inline_value) {
        (Some(body), _) | (None, Some(body)) => Frame {
            line_offset: body.line - 1,
            column_offset: body.column.unwrap_or(1) - 1,
        },
        (None, None) => Frame::starting_at(declaration.position.line),
    }
}

/// Extract the scripts stored under top-level script keys.
pub fn embedded_scripts(header: &ParsedHeader) -> EmbeddedScripts {
    let mut found = EmbeddedScripts::default();

    for (key, value) in header.root() {
        let Some(key) = key.as_str() else {
            continue;
        };
        if !is_script_key(key) {
            continue;
        }

        match script_text(value) {
            Some(text) => found.scripts.push(Script {
                document: SubDocument::new(text, script_frame(header, key)),
                role: ScriptRole::Embedded(key.to_string()),
            }),
            None => found.diagnostics.push(
                Diagnostic::new(
                    Checker::Headerlint,
                    Severity::Error,
                    SCRIPT_TYPE_CODE,
                    format!("{}: script must be a string, not a {}", key, type_name(value)),
                )
                .at(header.position_of(&[PathSegment::key(key)])),
            ),
        }
    }

    found
}
