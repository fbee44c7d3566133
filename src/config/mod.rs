//! Run configuration.
//!
//! - [`settings`] - the immutable [`Settings`] a run is started with
//! - [`yamllint`] - the yamllint rule set applied to headers
//!
//! Command-line flags and environment variables are resolved into
//! [`Settings`] by the CLI before any file is read.

pub mod settings;
pub mod yamllint;

pub use settings::{
    default_jobs, EnabledCheckers, Settings, DEFAULT_SHELLCHECK, DEFAULT_YAMLLINT,
};
pub use yamllint::default_yamllint_config;
