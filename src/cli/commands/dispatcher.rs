//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for turning parsed arguments into a command

use std::io::Write;

use crate::cli::args::Cli;
use crate::error::Result;

use super::lint::LintCommand;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// Reports go to `out`; notices about the run itself go to `err`.
    fn execute(&self, out: &mut dyn Write, err: &mut dyn Write) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: u8,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: u8) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Builds the command for a parsed command line and runs it.
#[derive(Debug, Default)]
pub struct CommandDispatcher;

impl CommandDispatcher {
    /// Create a new dispatcher.
    pub fn new() -> Self {
        Self
    }

    /// Resolve settings and run the lint command.
    pub fn dispatch(&self, cli: &Cli, out: &mut dyn Write, err: &mut dyn Write) -> Result<CommandResult> {
        let cmd = LintCommand::new(cli.sources(), cli.to_settings()?);
        cmd.execute(out, err)
    }
}
