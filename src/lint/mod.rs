//! Recipe linting.
//!
//! This module holds everything that turns recipe text into diagnostics,
//! except for running external tools (see [`crate::adapters`]).
//!
//! # Overview
//!
//! - **Header rules** - schema, including the package name, and key order ([`HeaderRule`])
//! - **Registry** - the header rules run for every recipe ([`RuleRegistry`])
//! - **Script checks** - recipe conventions in shell scripts ([`lint_script`])
//! - **Diagnostics** - normalized findings ([`Diagnostic`]) and their
//!   merging into one per-file stream ([`aggregate()`])
//! - **Output** - formatters for every output mode ([`OutputFormat`])
//!
//! # Example
//!
//! ```
//! use alilint::header::parse_header;
//! use alilint::lint::{HeaderContext, RuleRegistry, Schema, Severity};
//!
//! let header = parse_header("package: zlib\nversion: v1.3\n").unwrap();
//! let diagnostics = RuleRegistry::with_builtins().check(&HeaderContext {
//!     header: &header,
//!     schema: Schema::recipe(),
//!     file_name: Some("zlib.sh"),
//! });
//!
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].code, "ali:schema");
//! assert_eq!(diagnostics[0].severity, Severity::Error);
//! ```

pub mod aggregate;
pub mod diagnostic;
pub mod key_order;
pub mod output;
pub mod package_name;
pub mod registry;
pub mod rule;
pub mod schema;
pub mod script;
pub mod span;
pub mod validate;

pub use aggregate::{aggregate, sort_diagnostics, CheckerReport, Summary};
pub use diagnostic::Diagnostic;
pub use key_order::{KeyOrderRule, KEY_ORDER_CODE};
pub use output::{write_diagnostics, LintFormatter, OutputFormat};
pub use package_name::package_name_violation;
pub use registry::RuleRegistry;
pub use rule::{Checker, HeaderContext, HeaderRule, Severity};
pub use schema::Schema;
pub use script::{lint_script, ScriptContext};
pub use span::{Frame, Position};
pub use validate::{validate, SchemaRule, Violation, SCHEMA_CODE};
