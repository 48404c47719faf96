//! Error types for tokenweave operations.
//!
//! Only input-contract violations and infrastructure failures are errors.
//! Unresolved aliases, cycles, deep nesting and unused tokens are findings:
//! they are reported in [`crate::analysis::ValidationReport`], never raised.

use std::io;
use thiserror::Error;

/// The error type for tokenweave operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The token document is not valid JSON or does not match the model.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller supplied input that breaks the engine's contract.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No transformer is registered under the requested key.
    #[error("Unknown visualization type: {0}")]
    UnknownVisualization(String),
}

/// A specialized Result type for tokenweave operations.
pub type Result<T> = std::result::Result<T, Error>;
