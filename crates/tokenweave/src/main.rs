//! Tokenweave CLI binary.

use anyhow::Result;
use std::process::ExitCode;
use tokenweave::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    // Controlled via RUST_LOG, e.g. RUST_LOG=tokenweave=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tokenweave=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting tokenweave CLI");

    let cli = Cli::parse_args();
    let code = cli.execute()?;

    tracing::debug!("Tokenweave CLI completed");
    Ok(code)
}
