//! Error types for alilint operations.
//!
//! This module defines [`LintError`], the error type used for failures that
//! are *not* lint findings, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Problems inside a recipe become [`Diagnostic`](crate::lint::Diagnostic)s,
//!   never errors
//! - `LintError` covers configuration failures: unreadable inputs, missing
//!   external tools, invalid settings
//! - Use `anyhow::Error` (via `LintError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for alilint operations.
#[derive(Debug, Error)]
pub enum LintError {
    /// An input recipe could not be read.
    #[error("Cannot read {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external checker is not installed or cannot be started.
    #[error("{tool} is not installed or cannot be run ({program})")]
    ToolMissing { tool: String, program: String },

    /// Invalid command-line or environment settings.
    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },

    /// Writing the report failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for alilint operations.
pub type Result<T> = std::result::Result<T, LintError>;
