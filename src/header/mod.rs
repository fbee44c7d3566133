//! Recipe header parsing.
//!
//! - [`parse`] - YAML parsing and failure classification
//! - [`locate`] - declaration positions of keys and sequence items

pub mod locate;
pub mod parse;

pub use locate::{dotted, KeyDeclaration, Locator, PathSegment};
pub use parse::{
    parse_header, scalar_text, stray_separators, DeclaredKey, HeaderError, ParsedHeader, ValueKind,
    NON_MAPPING_CODE, PARSE_CODE,
};
