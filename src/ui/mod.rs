//! Terminal styling for human-readable output.

pub mod theme;

pub use theme::{should_use_colors, LintTheme};
