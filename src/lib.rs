//! alilint - a linter for build recipes.
//!
//! A recipe is a YAML header, a line holding exactly `---`, and a shell
//! body. alilint checks the header against the recipe schema and key-order
//! conventions, looks for known shell mistakes in the body and in embedded
//! scripts, runs shellcheck and yamllint on the pieces, and reports every
//! finding against whole-file positions.
//!
//! # Modules
//!
//! - [`adapters`] - shellcheck and yamllint sub-processes
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Run settings
//! - [`error`] - Error types and result aliases
//! - [`header`] - Header parsing and key positions
//! - [`lint`] - Diagnostics, header rules, script checks, output formats
//! - [`recipe`] - Splitting recipes into checkable sub-documents
//! - [`runner`] - The per-file pipeline and run orchestration
//! - [`ui`] - Terminal styling
//!
//! # Example
//!
//! ```
//! use alilint::config::{EnabledCheckers, Settings};
//! use alilint::runner::{RecipeInput, RecipeLinter};
//!
//! let settings = Settings {
//!     checkers: EnabledCheckers::internal_only(),
//!     ..Settings::default()
//! };
//! let report = RecipeLinter::new(&settings).lint(&RecipeInput::stdin("package: zlib\n"));
//! assert_eq!(report.diagnostics[0].code, "ali:empty");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod header;
pub mod lint;
pub mod recipe;
pub mod runner;
pub mod ui;

pub use error::{LintError, Result};
