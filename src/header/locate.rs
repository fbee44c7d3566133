//! Source positions of header keys and sequence items.
//!
//! The header is parsed a second time with `marked_yaml`, whose nodes carry
//! spans and whose mappings keep declaration order. Paths such as
//! `overrides.ROOT.version` or `requires.0` are resolved by walking that
//! tree. Values are never read from it.

use std::fmt;

use marked_yaml::{Node, Span};

use crate::lint::span::Position;

/// One step of a path into the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A mapping key.
    Key(String),
    /// A sequence index (0-based).
    Index(usize),
}

impl PathSegment {
    /// Shorthand for a key segment.
    pub fn key(name: impl Into<String>) -> Self {
        PathSegment::Key(name.into())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Render a path the way messages show it: `requires.0`.
pub fn dotted(path: &[PathSegment]) -> String {
    path.iter()
        .map(|segment| segment.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Where a key and its value were declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDeclaration {
    /// Position of the key itself.
    pub position: Position,
    /// First character of a value written on the key's line, past any
    /// opening quote.
    pub inline_value: Option<Position>,
    /// First line and content column of a `|` or `>` block scalar.
    pub block_body: Option<Position>,
}

fn start_of(span: &Span) -> Option<Position> {
    span.start()
        .map(|marker| Position::new(marker.line(), marker.column()))
}

/// Position lookups over a marked header tree.
#[derive(Debug, Clone, Default)]
pub struct Locator {
    root: Option<Node>,
    lines: Vec<String>,
}

impl Locator {
    /// Parse `text` for positions.
    ///
    /// Documents `marked_yaml` rejects (aliases, tags) still lint; their
    /// lookups resolve to the start of the header.
    pub fn new(text: &str) -> Self {
        let root = match marked_yaml::parse_yaml(0, text) {
            Ok(node) => Some(node),
            Err(e) => {
                tracing::debug!("header positions unavailable: {}", e);
                None
            }
        };
        Self {
            root,
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Whether positions are available.
    pub fn is_marked(&self) -> bool {
        self.root.is_some()
    }

    /// Position of `path`, falling back to the closest declared ancestor and
    /// finally to the start of the document.
    pub fn position_of(&self, path: &[PathSegment]) -> Position {
        let Some(mut node) = self.root.as_ref() else {
            return Position::start();
        };
        let mut found = Position::start();

        for segment in path {
            let next = match (segment, node) {
                (PathSegment::Key(key), Node::Mapping(mapping)) => mapping
                    .iter()
                    .find(|(name, _)| name.as_str() == key.as_str())
                    .and_then(|(name, value)| Some((start_of(name.span())?, value))),
                (PathSegment::Index(index), Node::Sequence(items)) => items
                    .get(*index)
                    .and_then(|item| Some((start_of(item.span())?, item))),
                _ => None,
            };
            let Some((position, child)) = next else {
                break;
            };
            found = position;
            node = child;
        }

        found
    }

    /// Declaration details of the top-level key `key`.
    pub fn key_declaration(&self, key: &str) -> Option<KeyDeclaration> {
        let Some(Node::Mapping(mapping)) = self.root.as_ref() else {
            return None;
        };
        let (name, value) = mapping.iter().find(|(name, _)| name.as_str() == key)?;
        let position = start_of(name.span())?;
        let mut declaration = KeyDeclaration {
            position,
            inline_value: None,
            block_body: None,
        };

        let Some(value_start) = start_of(value.span()) else {
            return Some(declaration);
        };
        let column = value_start.column.unwrap_or(1);
        match self.char_at(value_start.line, column) {
            Some('|') | Some('>') => declaration.block_body = self.block_body(value_start.line),
            Some('"') | Some('\'') if value_start.line == position.line => {
                declaration.inline_value = Some(Position::new(value_start.line, column + 1));
            }
            Some(c) if value_start.line == position.line && c != '#' => {
                declaration.inline_value = Some(value_start);
            }
            _ if self.indicator_follows(position) => {
                declaration.block_body = self.block_body(position.line);
            }
            _ => {}
        }
        Some(declaration)
    }

    fn char_at(&self, line: usize, column: usize) -> Option<char> {
        self.lines
            .get(line.checked_sub(1)?)?
            .chars()
            .nth(column.checked_sub(1)?)
    }

    /// Whether the key at `position` is followed by a block scalar indicator.
    fn indicator_follows(&self, position: Position) -> bool {
        let Some(line) = position.line.checked_sub(1).and_then(|i| self.lines.get(i)) else {
            return false;
        };
        let key_start = position.column.unwrap_or(1).saturating_sub(1);
        line.get(key_start..)
            .and_then(|rest| rest.split_once(": ").or_else(|| rest.split_once(":")))
            .is_some_and(|(_, value)| {
                let value = value.trim_start();
                value.starts_with('|') || value.starts_with('>')
            })
    }

    /// Body of a block scalar whose indicator is on `indicator_line`.
    fn block_body(&self, indicator_line: usize) -> Option<Position> {
        let indent = self
            .lines
            .iter()
            .skip(indicator_line)
            .find(|line| !line.trim().is_empty())
            .map(|line| line.len() - line.trim_start_matches(' ').len())?;
        Some(Position::new(indicator_line + 1, indent + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> PathSegment {
        PathSegment::key(name)
    }

    const HEADER: &str = "\
package: ROOT
version: \"%(tag_basename)s\"
tag: v6-30-01
requires:
  - arrow
  - \"GCC-Toolchain:(?!osx)\"
build_requires:
- CMake
env:
  ROOTSYS: \"$ROOT_ROOT\"
incremental_recipe: |
  make -j$JOBS
  cmake --install . # not: a key
prefer_system_check: which root-config
overrides:
  ROOT:
    version: v6
    tag: v6-28
";

    #[test]
    fn top_level_keys() {
        let locator = Locator::new(HEADER);
        assert!(locator.is_marked());
        assert_eq!(locator.position_of(&[key("package")]), Position::new(1, 1));
        assert_eq!(locator.position_of(&[key("tag")]), Position::new(3, 1));
        assert_eq!(locator.position_of(&[key("env")]), Position::new(9, 1));
        assert_eq!(locator.position_of(&[key("overrides")]), Position::new(15, 1));
    }

    #[test]
    fn sequence_items() {
        let locator = Locator::new(HEADER);
        assert_eq!(
            locator.position_of(&[key("requires"), PathSegment::Index(1)]).line,
            6
        );
        assert_eq!(
            locator.position_of(&[key("build_requires"), PathSegment::Index(0)]).line,
            8
        );
        // Past the end: the sequence's key.
        assert_eq!(
            locator.position_of(&[key("requires"), PathSegment::Index(5)]),
            Position::new(4, 1)
        );
    }

    #[test]
    fn nested_keys() {
        let locator = Locator::new(HEADER);
        assert_eq!(
            locator.position_of(&[key("env"), key("ROOTSYS")]),
            Position::new(10, 3)
        );
        assert_eq!(
            locator.position_of(&[key("overrides"), key("ROOT"), key("tag")]),
            Position::new(18, 5)
        );
    }

    #[test]
    fn flow_collections_have_positions() {
        let locator = Locator::new("env: {A: b}\nrequires: [x, y]\n");
        assert_eq!(locator.position_of(&[key("env"), key("A")]).line, 1);
        assert_eq!(
            locator.position_of(&[key("requires"), PathSegment::Index(1)]).line,
            2
        );
        assert_eq!(locator.position_of(&[key("missing")]), Position::start());
    }

    #[test]
    fn keys_inside_quoted_scalars_are_not_keys() {
        let locator = Locator::new("package: X\nversion: \"v1\ntag: fake\"\nrequires: [a]\ntag: v1\n");
        assert_eq!(locator.position_of(&[key("tag")]), Position::new(5, 1));
    }

    #[test]
    fn block_scalar_contents_are_not_keys() {
        let locator = Locator::new(HEADER);
        assert_eq!(
            locator.position_of(&[key("cmake --install . # not")]),
            Position::start()
        );
        assert_eq!(
            locator.position_of(&[key("prefer_system_check")]),
            Position::new(14, 1)
        );
    }

    #[test]
    fn key_declaration_reports_value_layout() {
        let locator = Locator::new(HEADER);

        let block = locator.key_declaration("incremental_recipe").unwrap();
        assert_eq!(block.position, Position::new(11, 1));
        assert_eq!(block.block_body, Some(Position::new(12, 3)));
        assert_eq!(block.inline_value, None);

        let inline = locator.key_declaration("prefer_system_check").unwrap();
        assert_eq!(inline.block_body, None);
        assert_eq!(inline.inline_value, Some(Position::new(14, 22)));

        let quoted = locator.key_declaration("version").unwrap();
        assert_eq!(quoted.inline_value, Some(Position::new(2, 11)));

        assert!(locator.key_declaration("absent").is_none());
    }

    #[test]
    fn unmarked_header_falls_back_to_the_start() {
        let locator = Locator::default();
        assert!(!locator.is_marked());
        assert_eq!(locator.position_of(&[key("b")]), Position::start());
        assert!(locator.key_declaration("b").is_none());
    }

    #[test]
    fn dotted_paths() {
        assert_eq!(dotted(&[key("requires"), PathSegment::Index(0)]), "requires.0");
        assert_eq!(
            dotted(&[key("overrides"), key("ROOT"), key("tag")]),
            "overrides.ROOT.tag"
        );
    }
}
