//! Token dependency graph projection.
//!
//! Nodes are tokens, edges are alias references. The rendering layer
//! indexes nodes and edges by id, so the field shape here is stable.
//!
//! ## Edge Direction Convention
//!
//! As in the analysis maps, an edge points from the aliasing token
//! (`source`) to the aliased token (`target`). Edges are only built for
//! targets that exist; unresolved aliases show up in validation instead.

use super::palette::{
    ALIAS_NODE_COLOR, BASE_NODE_COLOR, CIRCULAR_NODE_COLOR, CLUSTER_PALETTE, cyclic,
};
use super::{TransformInput, Transformer, VisualizationData, VisualizationType};
use crate::analysis::{
    CircularDependency, GlobalDependencyAnalysis, TokenDependencyInfo, TokenUsage,
};
use crate::domain::{ModeId, Token, TokenId, TokenSystem, ValueTypeId};
use crate::error::Result;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Radius of a node nobody aliases
const BASE_NODE_SIZE: f64 = 8.0;

/// Extra radius per aliasing token
const SIZE_PER_REFERENCE: f64 = 2.0;

/// Usage count beyond which nodes stop growing
const MAX_SIZED_REFERENCES: usize = 10;

/// Classification of a graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Only literal values
    Base,
    /// At least one aliased value
    Alias,
    /// Participates in a cycle (takes precedence over `Alias`)
    Circular,
}

/// Classification of a graph edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// Plain alias reference
    Direct,
    /// Both endpoints participate in a cycle
    Circular,
}

/// A token node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Token id
    pub id: TokenId,
    /// Display name
    pub name: String,
    /// Node classification
    pub node_type: NodeType,
    /// Value type, also the cluster key
    pub value_type_id: ValueTypeId,
    /// Alias depth
    pub depth: usize,
    /// Number of tokens aliasing this one
    pub usage_count: usize,
    /// Render radius
    pub size: f64,
    /// Render color
    pub color: String,
}

/// An alias edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Edge id, `source->target`
    pub id: String,
    /// Aliasing token
    pub source: TokenId,
    /// Aliased token
    pub target: TokenId,
    /// Edge classification
    pub edge_type: EdgeType,
    /// Modes whose values carry this alias, in document order
    pub mode_ids: Vec<ModeId>,
}

/// Tokens sharing a value type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Value type id
    pub id: ValueTypeId,
    /// Value type display name
    pub name: String,
    /// Member tokens, in input order
    pub node_ids: Vec<TokenId>,
    /// Render color
    pub color: String,
}

/// The deepest token of a graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepestToken {
    /// Token id
    pub token_id: TokenId,
    /// Its depth
    pub depth: usize,
}

/// Graph-level statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStatistics {
    /// Number of nodes
    pub total_tokens: usize,
    /// Number of edges
    pub total_edges: usize,
    /// Greatest depth
    pub max_depth: usize,
    /// Mean depth
    pub average_depth: f64,
    /// Tokens with no aliases in either direction
    pub isolated_tokens: usize,
    /// First token with the highest non-zero usage
    pub most_referenced: Option<TokenUsage>,
    /// First token with the highest non-zero depth
    pub deepest_token: Option<DeepestToken>,
}

/// Force-directed graph of token aliases
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDependencyGraph {
    /// One node per token, in input order
    pub nodes: Vec<GraphNode>,
    /// One edge per unique resolvable alias pair
    pub edges: Vec<GraphEdge>,
    /// Value-type groups with more than one member
    pub clusters: Vec<Cluster>,
    /// Cycles reported by the analysis
    pub circular_dependencies: Vec<CircularDependency>,
    /// Summary statistics
    pub statistics: GraphStatistics,
}

/// Builds [`TokenDependencyGraph`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphTransformer;

impl GraphTransformer {
    /// Create a graph transformer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Project a token system and its analysis into a dependency graph.
    #[must_use]
    pub fn build(
        &self,
        system: &TokenSystem,
        analysis: &GlobalDependencyAnalysis,
    ) -> TokenDependencyGraph {
        let infos: HashMap<&TokenId, &TokenDependencyInfo> = analysis
            .tokens
            .iter()
            .map(|info| (&info.token_id, info))
            .collect();
        let known: HashSet<&TokenId> = system.tokens.iter().map(|t| &t.id).collect();
        let is_circular = |id: &TokenId| infos.get(id).is_some_and(|info| info.is_circular);

        let nodes: Vec<GraphNode> = system
            .tokens
            .iter()
            .map(|token| {
                build_node(token, infos.get(&token.id).copied(), is_circular(&token.id))
            })
            .collect();

        let mut edges = Vec::new();
        for token in &system.tokens {
            for (target, mode_ids) in alias_groups(token) {
                if !known.contains(target) {
                    continue;
                }
                let edge_type = if is_circular(&token.id) && is_circular(target) {
                    EdgeType::Circular
                } else {
                    EdgeType::Direct
                };
                edges.push(GraphEdge {
                    id: format!("{}->{}", token.id, target),
                    source: token.id.clone(),
                    target: target.clone(),
                    edge_type,
                    mode_ids,
                });
            }
        }

        let clusters = build_clusters(system);
        let statistics = build_statistics(&nodes, edges.len(), analysis.isolated_tokens.len());

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            clusters = clusters.len(),
            "Built dependency graph"
        );

        TokenDependencyGraph {
            nodes,
            edges,
            clusters,
            circular_dependencies: analysis.circular_dependencies.clone(),
            statistics,
        }
    }
}

impl Transformer for GraphTransformer {
    fn visualization_type(&self) -> VisualizationType {
        VisualizationType::DependencyGraph
    }

    fn transform(&self, input: &TransformInput<'_>) -> Result<VisualizationData> {
        Ok(VisualizationData::DependencyGraph(
            self.build(input.system, input.analysis),
        ))
    }
}

#[allow(clippy::cast_precision_loss)]
fn build_node(token: &Token, info: Option<&TokenDependencyInfo>, circular: bool) -> GraphNode {
    let node_type = if circular {
        NodeType::Circular
    } else if token.is_alias() {
        NodeType::Alias
    } else {
        NodeType::Base
    };
    let color = match node_type {
        NodeType::Base => BASE_NODE_COLOR,
        NodeType::Alias => ALIAS_NODE_COLOR,
        NodeType::Circular => CIRCULAR_NODE_COLOR,
    };
    let usage_count = info.map_or(0, |info| info.usage_count);
    let name = if token.display_name.is_empty() {
        token.id.to_string()
    } else {
        token.display_name.clone()
    };

    GraphNode {
        id: token.id.clone(),
        name,
        node_type,
        value_type_id: token.resolved_value_type_id.clone(),
        depth: info.map_or(0, |info| info.depth),
        usage_count,
        size: BASE_NODE_SIZE + usage_count.min(MAX_SIZED_REFERENCES) as f64 * SIZE_PER_REFERENCE,
        color: color.to_string(),
    }
}

/// Alias targets of a token with the modes aliasing each, first-seen order.
fn alias_groups(token: &Token) -> Vec<(&TokenId, Vec<ModeId>)> {
    let mut groups: Vec<(&TokenId, Vec<ModeId>)> = Vec::new();
    for entry in &token.values_by_mode {
        let Some(target) = entry.value.alias_target() else {
            continue;
        };
        let index = match groups.iter().position(|(existing, _)| *existing == target) {
            Some(index) => index,
            None => {
                groups.push((target, Vec::new()));
                groups.len() - 1
            }
        };
        for mode in &entry.mode_ids {
            if !groups[index].1.contains(mode) {
                groups[index].1.push(mode.clone());
            }
        }
    }
    groups
}

/// Group tokens by value type; singleton groups are dropped.
fn build_clusters(system: &TokenSystem) -> Vec<Cluster> {
    let mut groups: Vec<(&ValueTypeId, Vec<TokenId>)> = Vec::new();
    for token in &system.tokens {
        let value_type = &token.resolved_value_type_id;
        match groups.iter_mut().find(|(id, _)| *id == value_type) {
            Some((_, members)) => members.push(token.id.clone()),
            None => groups.push((value_type, vec![token.id.clone()])),
        }
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .enumerate()
        .map(|(index, (id, node_ids))| Cluster {
            id: id.clone(),
            name: system.value_type_name(id),
            node_ids,
            color: cyclic(&CLUSTER_PALETTE, index).to_string(),
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn build_statistics(
    nodes: &[GraphNode],
    total_edges: usize,
    isolated_tokens: usize,
) -> GraphStatistics {
    let mut most_referenced: Option<TokenUsage> = None;
    let mut deepest_token: Option<DeepestToken> = None;

    // Strict comparisons keep the first node on ties.
    for node in nodes {
        let best_usage = most_referenced.as_ref().map_or(0, |best| best.usage_count);
        if node.usage_count > best_usage {
            most_referenced = Some(TokenUsage {
                token_id: node.id.clone(),
                usage_count: node.usage_count,
            });
        }
        let best_depth = deepest_token.as_ref().map_or(0, |best| best.depth);
        if node.depth > best_depth {
            deepest_token = Some(DeepestToken {
                token_id: node.id.clone(),
                depth: node.depth,
            });
        }
    }

    let max_depth = nodes.iter().map(|node| node.depth).max().unwrap_or(0);
    let average_depth = if nodes.is_empty() {
        0.0
    } else {
        nodes.iter().map(|node| node.depth).sum::<usize>() as f64 / nodes.len() as f64
    };

    GraphStatistics {
        total_tokens: nodes.len(),
        total_edges,
        max_depth,
        average_depth,
        isolated_tokens,
        most_referenced,
        deepest_token,
    }
}
