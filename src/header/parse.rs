//! Header parsing.
//!
//! The header is parsed with `serde_yaml` for its values and with
//! `marked_yaml`, through [`Locator`], for declaration positions. Parse failures are classified into
//! syntax errors and non-mapping documents, each with its own code.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use super::locate::{KeyDeclaration, Locator, PathSegment};
use crate::lint::span::Position;
use crate::lint::{Checker, Diagnostic, Severity};

/// Code for YAML syntax errors.
pub const PARSE_CODE: &str = "ali:parse";
/// Code for headers whose top level is not a mapping.
pub const NON_MAPPING_CODE: &str = "ali:toplevel-nondict";

/// Shape of a YAML value, as far as the schema is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// String, number, boolean or null.
    Scalar,
    /// Block or flow sequence.
    Sequence,
    /// Block or flow mapping.
    Mapping,
}

impl ValueKind {
    /// Kind of `value`, looking through tags.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Mapping(_) => ValueKind::Mapping,
            Value::Tagged(tagged) => ValueKind::of(&tagged.value),
            _ => ValueKind::Scalar,
        }
    }

    /// Name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Scalar => "scalar",
            ValueKind::Sequence => "sequence",
            ValueKind::Mapping => "mapping",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Text of a scalar value, `None` for collections.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("null".to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn untag(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => untag(tagged.value),
        other => other,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Why a header could not be turned into a [`ParsedHeader`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The YAML is malformed.
    #[error("YAML parse error: {message}")]
    Syntax { message: String, position: Position },

    /// The YAML is fine but is not a mapping.
    #[error("expected YAML header to be a mapping; got a {found} instead")]
    NotAMapping { found: &'static str },
}

impl HeaderError {
    /// The diagnostic reported for this failure.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, position) = match self {
            HeaderError::Syntax { position, .. } => (PARSE_CODE, *position),
            HeaderError::NotAMapping { .. } => (NON_MAPPING_CODE, Position::start()),
        };
        Diagnostic::new(Checker::Headerlint, Severity::Error, code, self.to_string()).at(position)
    }
}

/// A top-level (or nested) key and where it was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredKey {
    /// Key text.
    pub name: String,
    /// Declaration position.
    pub position: Position,
}

/// A successfully parsed header.
///
/// Holds the order-preserving mapping, the ordered top-level declarations,
/// and the locator used to find nested paths. Never mutated after parsing.
#[derive(Debug, Clone)]
pub struct ParsedHeader {
    root: Mapping,
    keys: Vec<DeclaredKey>,
    locator: Locator,
}

impl ParsedHeader {
    fn new(root: Mapping, locator: Locator) -> Self {
        let keys = declared_keys(&root, &locator, &[]);
        Self {
            root,
            keys,
            locator,
        }
    }

    /// The top-level mapping.
    pub fn root(&self) -> &Mapping {
        &self.root
    }

    /// Top-level keys in declaration order.
    pub fn keys(&self) -> &[DeclaredKey] {
        &self.keys
    }

    /// Value of a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Whether a top-level key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    /// Best known position of `path`.
    pub fn position_of(&self, path: &[PathSegment]) -> Position {
        self.locator.position_of(path)
    }

    /// Where the top-level key `key` and its value were declared.
    pub fn key_declaration(&self, key: &str) -> Option<KeyDeclaration> {
        self.locator.key_declaration(key)
    }

    /// Keys of a nested mapping found at `path`, in declaration order.
    pub fn declared_keys_of(&self, mapping: &Mapping, path: &[PathSegment]) -> Vec<DeclaredKey> {
        declared_keys(mapping, &self.locator, path)
    }
}

fn declared_keys(mapping: &Mapping, locator: &Locator, path: &[PathSegment]) -> Vec<DeclaredKey> {
    mapping
        .keys()
        .map(|key| {
            let name = scalar_text(key).unwrap_or_else(|| format!("{:?}", key));
            let mut key_path = path.to_vec();
            key_path.push(PathSegment::Key(name.clone()));
            DeclaredKey {
                position: locator.position_of(&key_path),
                name,
            }
        })
        .collect()
}

/// Report `---` occurring inside header lines.
///
/// The build tool splits recipes on the first `---` anywhere, not only on a
/// separator line, so such a header never reaches it intact. One error per
/// affected line, at the first occurrence.
pub fn stray_separators(text: &str) -> Vec<Diagnostic> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let column = line.find("---")? + 1;
            Some(
                Diagnostic::new(
                    Checker::Headerlint,
                    Severity::Error,
                    PARSE_CODE,
                    "found \"---\" in YAML header; this prevents the build tool from parsing this recipe",
                )
                .at(Position::new(index + 1, column))
                .with_end(index + 1, column + 3),
            )
        })
        .collect()
}

/// Whether the header has nothing but blank lines and comments.
fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.starts_with('#')
    })
}

/// Parse header text.
///
/// An empty header is an empty mapping: it is valid input for the schema
/// validator, which will then report the missing required keys.
pub fn parse_header(text: &str) -> Result<ParsedHeader, HeaderError> {
    if is_blank(text) {
        return Ok(ParsedHeader::new(Mapping::new(), Locator::default()));
    }

    let value: Value = serde_yaml::from_str(text).map_err(|e| HeaderError::Syntax {
        position: e
            .location()
            .map(|loc| Position::new(loc.line(), loc.column()))
            .unwrap_or_else(|| Position::new(1, 1)),
        message: e.to_string(),
    })?;

    match untag(value) {
        Value::Mapping(root) => Ok(ParsedHeader::new(root, Locator::new(text))),
        other => Err(HeaderError::NotAMapping {
            found: describe(&other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mapping_with_positions() {
        let header = parse_header("package: zlib\nversion: v1.2.13\n\ntag: v1.2.13\n").unwrap();
        let names: Vec<_> = header.keys().iter().map(|k| k.name.as_str()).collect();

        assert_eq!(names, vec!["package", "version", "tag"]);
        assert_eq!(header.keys()[2].position, Position::new(4, 1));
        assert!(header.contains_key("version"));
        assert_eq!(header.get("package"), Some(&Value::String("zlib".into())));
    }

    #[test]
    fn empty_header_is_empty_mapping() {
        let header = parse_header("").unwrap();
        assert!(header.root().is_empty());
        assert!(header.keys().is_empty());

        let commented = parse_header("# nothing here\n\n").unwrap();
        assert!(commented.root().is_empty());
    }

    #[test]
    fn sequence_top_level_is_not_a_mapping() {
        let err = parse_header("- a\n- b\n").unwrap_err();
        assert_eq!(err, HeaderError::NotAMapping { found: "sequence" });
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, NON_MAPPING_CODE);
        assert_eq!(diag.severity, Severity::Error);
    }

    #[test]
    fn scalar_top_level_is_not_a_mapping() {
        let err = parse_header("just text\n").unwrap_err();
        assert_eq!(err, HeaderError::NotAMapping { found: "string" });
    }

    #[test]
    fn unmatched_quote_is_a_syntax_error() {
        let err = parse_header("package: \"zlib\nversion: v1\n").unwrap_err();
        assert!(matches!(err, HeaderError::Syntax { .. }));
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, PARSE_CODE);
        assert!(diag.message.starts_with("YAML parse error"));
        assert!(diag.line >= 1);
    }

    #[test]
    fn dashes_inside_header_lines() {
        let diags = stray_separators("package: X\nversion: a---b\n# ---- ----\n");
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].line, 2);
        assert_eq!(diags[0].column, Some(11));
        assert_eq!(diags[0].end_column, Some(14));
        assert_eq!(diags[1].line, 3);
        assert_eq!(diags[1].code, PARSE_CODE);
        assert!(stray_separators("package: X\n").is_empty());
    }

    #[test]
    fn keys_inside_multiline_quoted_values_are_ignored() {
        let header =
            parse_header("package: X\nversion: \"v1\ntag: fake\"\nrequires: [a]\ntag: v1\n").unwrap();
        let keys: Vec<_> = header
            .keys()
            .iter()
            .map(|k| (k.name.as_str(), k.position.line))
            .collect();

        assert_eq!(header.get("version"), Some(&Value::String("v1 tag: fake".into())));
        assert_eq!(
            keys,
            vec![("package", 1), ("version", 2), ("requires", 4), ("tag", 5)]
        );
    }

    #[test]
    fn value_kinds() {
        let header = parse_header("a: 1\nb: [x]\nc: {d: e}\nf:\n").unwrap();
        assert_eq!(ValueKind::of(header.get("a").unwrap()), ValueKind::Scalar);
        assert_eq!(ValueKind::of(header.get("b").unwrap()), ValueKind::Sequence);
        assert_eq!(ValueKind::of(header.get("c").unwrap()), ValueKind::Mapping);
        assert_eq!(ValueKind::of(header.get("f").unwrap()), ValueKind::Scalar);
    }

    #[test]
    fn scalar_text_renders_numbers_and_booleans() {
        assert_eq!(scalar_text(&Value::Bool(true)).as_deref(), Some("true"));
        assert_eq!(
            scalar_text(&serde_yaml::from_str::<Value>("1").unwrap()).as_deref(),
            Some("1")
        );
        assert_eq!(scalar_text(&Value::Sequence(vec![])), None);
    }

    #[test]
    fn nested_declared_keys() {
        let header = parse_header("overrides:\n  ROOT:\n    tag: a\n    version: b\n").unwrap();
        let overrides = header.get("overrides").unwrap().as_mapping().unwrap();
        let root = overrides.get("ROOT").unwrap().as_mapping().unwrap();
        let keys = header.declared_keys_of(
            root,
            &[PathSegment::key("overrides"), PathSegment::key("ROOT")],
        );

        assert_eq!(keys[0].name, "tag");
        assert_eq!(keys[0].position, Position::new(3, 5));
        assert_eq!(keys[1].position, Position::new(4, 5));
    }
}
