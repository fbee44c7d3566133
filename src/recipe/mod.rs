//! Recipe documents.
//!
//! A recipe file is split into a YAML header and a shell script body
//! ([`split`]); the header may embed further scripts ([`scripts`]). Each
//! piece handed to a checker is a [`SubDocument`] that remembers where it
//! came from.

pub mod scripts;
pub mod split;

pub use scripts::{embedded_scripts, EmbeddedScripts};
pub use split::{missing_separator, split_recipe, SplitRecipe, EMPTY_CODE, SEPARATOR};

use crate::lint::span::Frame;

/// What a script sub-document is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptRole {
    /// The recipe body after the separator.
    Main,
    /// A script stored under a header key, e.g. `incremental_recipe`.
    Embedded(String),
}

impl ScriptRole {
    /// Human name used in messages.
    pub fn describe(&self) -> &str {
        match self {
            ScriptRole::Main => "main recipe",
            ScriptRole::Embedded(key) => key,
        }
    }
}

/// A piece of a recipe checked on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubDocument {
    /// Text handed to the checker.
    pub text: String,
    /// Where the text sits inside the recipe file.
    pub frame: Frame,
}

impl SubDocument {
    /// Create a sub-document.
    pub fn new(text: impl Into<String>, frame: Frame) -> Self {
        Self {
            text: text.into(),
            frame,
        }
    }
}

/// A shell script found in a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// The script text and its frame.
    pub document: SubDocument,
    /// Main body or embedded key.
    pub role: ScriptRole,
}
