//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for tokenweave using
//! clap's derive API.
//!
//! # Commands
//!
//! - `analyze`: Summarize the global dependency analysis
//! - `validate`: Print the validation report (non-zero exit when invalid)
//! - `graph`: Project the token system into a dependency graph
//! - `chord`: Project modes and platforms into a chord diagram
//! - `visualize`: Run any registered projection by key
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--config <FILE>`: YAML file overriding analysis thresholds
//!
//! # Example
//!
//! ```bash
//! tokenweave analyze tokens.json
//! tokenweave --json validate tokens.json
//! tokenweave --config tokenweave.yaml visualize chord-diagram tokens.json
//! ```

mod args;
mod execute;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

pub use args::{InputArgs, VisualizeArgs};

use crate::output::OutputMode;
use crate::transform::VisualizationType;

/// Tokenweave - dependency analysis for design-token systems
///
/// Finds alias cycles, missing references and deep nesting, and projects the
/// token system into dependency-graph and chord-diagram data.
#[derive(Parser, Debug)]
#[command(name = "tokenweave")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// YAML file overriding the default analysis thresholds
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Analyze token dependencies
    ///
    /// Prints depth, reference counts, cycles and validation findings.
    Analyze(InputArgs),

    /// Validate a token system
    ///
    /// Exits with a non-zero status when there are missing references or
    /// circular aliases.
    Validate(InputArgs),

    /// Build the dependency graph projection
    Graph(InputArgs),

    /// Build the mode/platform chord projection
    Chord(InputArgs),

    /// Build a projection by registry key
    Visualize(VisualizeArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns an error if the config or token file cannot be loaded, the
    /// token system breaks the input contract, or output fails.
    pub fn execute(&self) -> Result<ExitCode> {
        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let Some(command) = &self.command else {
            println!("Tokenweave design-token dependency analysis");
            println!("Use --help for more information");
            return Ok(ExitCode::SUCCESS);
        };

        let config = execute::load_config(self.config.as_deref())?;

        match command {
            Commands::Analyze(args) => execute::execute_analyze(args, &config, output_mode)?,
            Commands::Validate(args) => {
                return execute::execute_validate(args, &config, output_mode);
            }
            Commands::Graph(args) => execute::execute_projection(
                VisualizationType::DependencyGraph.key(),
                &args.file,
                &config,
                output_mode,
            )?,
            Commands::Chord(args) => execute::execute_projection(
                VisualizationType::ChordDiagram.key(),
                &args.file,
                &config,
                output_mode,
            )?,
            Commands::Visualize(args) => execute::execute_visualize(args, &config, output_mode)?,
        }
        Ok(ExitCode::SUCCESS)
    }
}
