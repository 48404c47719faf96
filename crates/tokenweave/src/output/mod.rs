//! Output formatting for CLI commands.
//!
//! Every command prints either a human-readable summary or the full result
//! structure as pretty JSON. Text printers write to any [`Write`] so they
//! can be tested against a buffer.

mod color;

use crate::analysis::{GlobalDependencyAnalysis, ValidationReport};
use crate::transform::{ChordDiagramData, TokenDependencyGraph, VisualizationData};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

use color::{Tone, paint, paint_impact};

/// Maximum number of per-token lines in text summaries
const TEXT_LIST_LIMIT: usize = 10;

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Configuration for text output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `TOKENWEAVE_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        Self {
            use_colors: colors_enabled(
                env::var("NO_COLOR").ok().as_deref(),
                env::var("TOKENWEAVE_COLOR").ok().as_deref(),
            ),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

// Respect NO_COLOR (https://no-color.org/), then TOKENWEAVE_COLOR.
fn colors_enabled(no_color: Option<&str>, tokenweave_color: Option<&str>) -> bool {
    no_color.is_none()
        && tokenweave_color.is_none_or(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{json}")
}

/// Print an analysis summary in the specified format
pub fn print_analysis(analysis: &GlobalDependencyAnalysis, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(analysis),
        OutputMode::Text => {
            let stdout = io::stdout();
            print_analysis_text(&mut stdout.lock(), analysis, &OutputConfig::from_env())
        }
    }
}

/// Print a validation report in the specified format
pub fn print_validation(report: &ValidationReport, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(report),
        OutputMode::Text => {
            let stdout = io::stdout();
            print_validation_text(&mut stdout.lock(), report, &OutputConfig::from_env())
        }
    }
}

/// Print a visualization projection in the specified format
pub fn print_visualization(data: &VisualizationData, mode: OutputMode) -> io::Result<()> {
    match (data, mode) {
        (_, OutputMode::Json) => print_json(data),
        (VisualizationData::DependencyGraph(graph), OutputMode::Text) => {
            let stdout = io::stdout();
            print_graph_text(&mut stdout.lock(), graph, &OutputConfig::from_env())
        }
        (VisualizationData::ChordDiagram(chord), OutputMode::Text) => {
            let stdout = io::stdout();
            print_chord_text(&mut stdout.lock(), chord, &OutputConfig::from_env())
        }
    }
}

// ============================================================================
// Text Formatting
// ============================================================================

fn print_analysis_text<W: Write>(
    w: &mut W,
    analysis: &GlobalDependencyAnalysis,
    config: &OutputConfig,
) -> io::Result<()> {
    let complexity = &analysis.complexity;

    writeln!(w, "{}", paint(Tone::Heading, "Dependency Analysis", config))?;
    writeln!(w)?;
    writeln!(w, "{} {}", paint(Tone::Muted, "Tokens:         ", config), analysis.total_tokens)?;
    writeln!(w, "{} {}", paint(Tone::Muted, "References:     ", config), complexity.total_references)?;
    writeln!(
        w,
        "{} {} (average {:.2})",
        paint(Tone::Muted, "Max depth:      ", config),
        complexity.max_depth,
        complexity.average_depth
    )?;
    writeln!(
        w,
        "{} {} root, {} leaf, {} isolated",
        paint(Tone::Muted, "Shape:          ", config),
        analysis.root_tokens.len(),
        analysis.leaf_tokens.len(),
        analysis.isolated_tokens.len()
    )?;

    if !analysis.most_referenced.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}", paint(Tone::Heading, "Most referenced", config))?;
        for usage in analysis.most_referenced.iter().take(TEXT_LIST_LIMIT) {
            let impact = analysis
                .token(&usage.token_id)
                .map(|info| paint_impact(info.blast_radius.estimated_impact, config))
                .unwrap_or_default();
            writeln!(
                w,
                "  {}  {} reference(s)  impact {}",
                paint(Tone::Id, usage.token_id.as_str(), config),
                usage.usage_count,
                impact
            )?;
        }
    }

    if !analysis.circular_dependencies.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "{}",
            paint(
                Tone::Heading,
                &format!("Circular dependencies ({})", analysis.circular_dependencies.len()),
                config
            )
        )?;
        for cycle in &analysis.circular_dependencies {
            writeln!(w, "  {}", paint(Tone::Error, &cycle.description, config))?;
        }
    }

    writeln!(w)?;
    print_validation_text(w, &analysis.validation, config)
}

fn print_validation_text<W: Write>(
    w: &mut W,
    report: &ValidationReport,
    config: &OutputConfig,
) -> io::Result<()> {
    if report.is_valid {
        writeln!(
            w,
            "{} ({} warning(s))",
            paint(Tone::Success, "Token system is valid", config),
            report.warnings.len()
        )?;
    } else {
        writeln!(
            w,
            "{} ({} error(s), {} warning(s))",
            paint(Tone::Error, "Token system is invalid", config),
            report.errors.len(),
            report.warnings.len()
        )?;
    }

    for err in &report.errors {
        writeln!(
            w,
            "  {} [{}] {}",
            paint(Tone::Error, "error", config),
            err.kind.as_str(),
            err.message
        )?;
    }
    for warn in &report.warnings {
        writeln!(
            w,
            "  {} [{}] {}",
            paint(Tone::Warning, "warning", config),
            warn.kind.as_str(),
            warn.message
        )?;
    }
    Ok(())
}

fn print_graph_text<W: Write>(
    w: &mut W,
    graph: &TokenDependencyGraph,
    config: &OutputConfig,
) -> io::Result<()> {
    let stats = &graph.statistics;

    writeln!(w, "{}", paint(Tone::Heading, "Dependency Graph", config))?;
    writeln!(w)?;
    writeln!(w, "{} {}", paint(Tone::Muted, "Nodes:    ", config), stats.total_tokens)?;
    writeln!(w, "{} {}", paint(Tone::Muted, "Edges:    ", config), stats.total_edges)?;
    writeln!(w, "{} {}", paint(Tone::Muted, "Clusters: ", config), graph.clusters.len())?;
    writeln!(w, "{} {}", paint(Tone::Muted, "Isolated: ", config), stats.isolated_tokens)?;

    if let Some(usage) = &stats.most_referenced {
        writeln!(
            w,
            "{} {} ({} reference(s))",
            paint(Tone::Muted, "Most referenced:", config),
            paint(Tone::Id, usage.token_id.as_str(), config),
            usage.usage_count
        )?;
    }
    if let Some(deepest) = &stats.deepest_token {
        writeln!(
            w,
            "{} {} (depth {})",
            paint(Tone::Muted, "Deepest token:  ", config),
            paint(Tone::Id, deepest.token_id.as_str(), config),
            deepest.depth
        )?;
    }

    for cluster in &graph.clusters {
        writeln!(
            w,
            "  {} {} token(s)",
            paint(Tone::Id, &cluster.name, config),
            cluster.node_ids.len()
        )?;
    }
    Ok(())
}

fn print_chord_text<W: Write>(
    w: &mut W,
    chord: &ChordDiagramData,
    config: &OutputConfig,
) -> io::Result<()> {
    let stats = &chord.statistics;

    writeln!(w, "{}", paint(Tone::Heading, "Mode/Platform Conflicts", config))?;
    writeln!(w)?;
    writeln!(
        w,
        "{} {} ({} mode(s), {} platform(s))",
        paint(Tone::Muted, "Nodes:    ", config),
        stats.total_nodes,
        stats.total_modes,
        stats.total_platforms
    )?;
    writeln!(w, "{} {}", paint(Tone::Muted, "Links:    ", config), stats.total_links)?;
    writeln!(
        w,
        "{} {:.2}",
        paint(Tone::Muted, "Coupling: ", config),
        stats.average_coupling
    )?;

    for coupling in &chord.mode_analysis.couplings {
        writeln!(
            w,
            "  {} <-> {}  {:.2} ({} of {} shared)",
            paint(Tone::Id, coupling.mode_a.as_str(), config),
            paint(Tone::Id, coupling.mode_b.as_str(), config),
            coupling.strength,
            coupling.changed_together,
            coupling.shared_tokens
        )?;
    }

    for volatility in chord.mode_analysis.volatile_tokens.iter().take(TEXT_LIST_LIMIT) {
        writeln!(
            w,
            "  {} {} distinct value(s) across {} entries",
            paint(Tone::Id, volatility.token_id.as_str(), config),
            volatility.distinct_values,
            volatility.mode_combinations
        )?;
    }

    if !stats.recommendations.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}", paint(Tone::Heading, "Recommendations", config))?;
        for recommendation in &stats.recommendations {
            writeln!(w, "  - {recommendation}")?;
        }
    }
    Ok(())
}
