//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{EnabledCheckers, Settings, DEFAULT_SHELLCHECK, DEFAULT_YAMLLINT};
use crate::error::Result;
use crate::lint::OutputFormat;
use crate::runner::RecipeSource;

/// alilint - Lint build recipes: YAML header, shell body.
#[derive(Debug, Parser)]
#[command(name = "alilint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Recipes to lint; `-` reads one from standard input
    #[arg(required = true, value_name = "RECIPE")]
    pub recipes: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Do not run shellcheck
    #[arg(short = 'S', long)]
    pub no_shellcheck: bool,

    /// Do not run yamllint
    #[arg(short = 'Y', long)]
    pub no_yamllint: bool,

    /// Do not run the header checks
    #[arg(short = 'H', long)]
    pub no_headerlint: bool,

    /// Do not run the script checks
    #[arg(short = 'L', long)]
    pub no_scriptlint: bool,

    /// Number of recipes linted at once (default: available parallelism)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// shellcheck binary
    #[arg(long, env = "ALILINT_SHELLCHECK", default_value = DEFAULT_SHELLCHECK)]
    pub shellcheck: PathBuf,

    /// yamllint binary
    #[arg(long, env = "ALILINT_YAMLLINT", default_value = DEFAULT_YAMLLINT)]
    pub yamllint: PathBuf,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Resolve the arguments into run settings.
    pub fn to_settings(&self) -> Result<Settings> {
        let settings = Settings {
            format: self.format,
            checkers: EnabledCheckers {
                headerlint: !self.no_headerlint,
                scriptlint: !self.no_scriptlint,
                shellcheck: !self.no_shellcheck,
                yamllint: !self.no_yamllint,
            },
            shellcheck: self.shellcheck.clone(),
            yamllint: self.yamllint.clone(),
            no_color: self.no_color,
            ..Settings::default()
        };
        match self.jobs {
            Some(jobs) => settings.with_jobs(jobs),
            None => Ok(settings),
        }
    }

    /// The recipes to lint, in command-line order.
    pub fn sources(&self) -> Vec<RecipeSource> {
        self.recipes
            .iter()
            .map(|path| RecipeSource::from_arg(path))
            .collect()
    }
}
