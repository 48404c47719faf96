//! Visualization projections of an analyzed token system.
//!
//! Each projection is a [`Transformer`]: a pure function from the token
//! system and its [`GlobalDependencyAnalysis`] to a render-ready structure.
//! Transformers are looked up by [`VisualizationType`] through the
//! [`TransformerRegistry`].
//!
//! | Key | Transformer | Output |
//! |-----|-------------|--------|
//! | `dependency-graph` | [`GraphTransformer`] | [`TokenDependencyGraph`] |
//! | `chord-diagram` | [`ChordTransformer`] | [`ChordDiagramData`] |

mod chord;
mod graph;
mod palette;
mod registry;

pub use chord::{
    ChordDiagramData, ChordLink, ChordLinkType, ChordNode, ChordNodeType, ChordStatistics,
    ChordTransformer, CouplingKind, ModeAnalysis, ModeCoupling, ModeSummary, PlatformAnalysis,
    PlatformDeviation, TokenVolatility,
};
pub use graph::{
    Cluster, DeepestToken, EdgeType, GraphEdge, GraphNode, GraphStatistics, GraphTransformer,
    NodeType, TokenDependencyGraph,
};
pub use registry::TransformerRegistry;

use crate::analysis::GlobalDependencyAnalysis;
use crate::domain::TokenSystem;
use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Kinds of visualization the engine can project into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualizationType {
    /// Force-directed token dependency graph
    DependencyGraph,
    /// Chord diagram over modes and platforms
    ChordDiagram,
}

impl VisualizationType {
    /// Every visualization type, in registry order.
    pub const ALL: [Self; 2] = [Self::DependencyGraph, Self::ChordDiagram];

    /// Registry key of this type.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::DependencyGraph => "dependency-graph",
            Self::ChordDiagram => "chord-diagram",
        }
    }
}

impl fmt::Display for VisualizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for VisualizationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.key() == s)
            .ok_or_else(|| Error::UnknownVisualization(s.to_string()))
    }
}

/// Input shared by every transformer.
#[derive(Debug, Clone, Copy)]
pub struct TransformInput<'a> {
    /// The token system snapshot
    pub system: &'a TokenSystem,
    /// Analysis of that snapshot
    pub analysis: &'a GlobalDependencyAnalysis,
}

/// Output of a transformer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum VisualizationData {
    /// Dependency graph projection
    DependencyGraph(TokenDependencyGraph),
    /// Chord diagram projection
    ChordDiagram(ChordDiagramData),
}

/// A projection from an analyzed token system to render-ready data.
pub trait Transformer: Send + Sync {
    /// The visualization this transformer produces.
    fn visualization_type(&self) -> VisualizationType;

    /// Project the input.
    ///
    /// # Errors
    ///
    /// Returns an error only if the input breaks the engine's contract.
    fn transform(&self, input: &TransformInput<'_>) -> Result<VisualizationData>;
}
