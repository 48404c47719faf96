//! Command execution logic.
//!
//! Commands load the token system and configuration, run the engine, and
//! hand the result to [`crate::output`]. The engine itself never touches
//! the filesystem.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::process::ExitCode;

use super::args::{InputArgs, VisualizeArgs};
use crate::analysis::{DependencyAnalyzer, GlobalDependencyAnalysis};
use crate::config::AnalysisConfig;
use crate::domain::TokenSystem;
use crate::output::{self, OutputMode};
use crate::transform::{TransformInput, TransformerRegistry, VisualizationType};

/// Load the analysis configuration, or defaults when no path is given
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

/// Read and parse a token system document
pub fn load_system(path: &Path) -> Result<TokenSystem> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    TokenSystem::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse token system {}", path.display()))
}

fn analyze_file(
    path: &Path,
    config: &AnalysisConfig,
) -> Result<(TokenSystem, GlobalDependencyAnalysis)> {
    let system = load_system(path)?;
    let analysis = DependencyAnalyzer::new(config.clone()).analyze(&system)?;
    Ok((system, analysis))
}

/// Execute the analyze command
pub fn execute_analyze(
    args: &InputArgs,
    config: &AnalysisConfig,
    output_mode: OutputMode,
) -> Result<()> {
    let (_, analysis) = analyze_file(&args.file, config)?;
    output::print_analysis(&analysis, output_mode)?;
    Ok(())
}

/// Execute the validate command
///
/// Exits with failure when the report is not valid.
pub fn execute_validate(
    args: &InputArgs,
    config: &AnalysisConfig,
    output_mode: OutputMode,
) -> Result<ExitCode> {
    let (_, analysis) = analyze_file(&args.file, config)?;
    output::print_validation(&analysis.validation, output_mode)?;

    if analysis.validation.is_valid {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::debug!(
            errors = analysis.validation.errors.len(),
            cycles = analysis.circular_dependencies.len(),
            "Validation failed"
        );
        Ok(ExitCode::FAILURE)
    }
}

/// Execute a projection through the transformer registry
pub fn execute_projection(
    visualization: &str,
    file: &Path,
    config: &AnalysisConfig,
    output_mode: OutputMode,
) -> Result<()> {
    let registry = TransformerRegistry::with_defaults(config);
    // Resolve the key before reading the file so typos fail fast.
    registry.get_by_key(visualization).with_context(|| {
        let known: Vec<&str> = VisualizationType::ALL.iter().map(|ty| ty.key()).collect();
        format!("Expected one of: {}", known.join(", "))
    })?;

    let (system, analysis) = analyze_file(file, config)?;
    let input = TransformInput {
        system: &system,
        analysis: &analysis,
    };
    let data = registry.transform(visualization, &input)?;
    output::print_visualization(&data, output_mode)?;
    Ok(())
}

/// Execute the visualize command
pub fn execute_visualize(
    args: &VisualizeArgs,
    config: &AnalysisConfig,
    output_mode: OutputMode,
) -> Result<()> {
    execute_projection(&args.visualization, &args.file, config, output_mode)
}
