//! Argument structs for each command.

use clap::Parser;
use std::path::PathBuf;

/// Arguments shared by commands that read one token system
#[derive(Parser, Debug, Clone)]
pub struct InputArgs {
    /// Path to the token system JSON document
    pub file: PathBuf,
}

/// Arguments for the `visualize` command
#[derive(Parser, Debug, Clone)]
pub struct VisualizeArgs {
    /// Visualization key (`dependency-graph` or `chord-diagram`)
    pub visualization: String,

    /// Path to the token system JSON document
    pub file: PathBuf,
}
