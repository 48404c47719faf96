//! Mode and platform conflict projection for chord diagrams.
//!
//! Unlike the dependency graph, the unit here is a mode or a platform, not a
//! token. The projection computes:
//!
//! - **Mode coupling**: for each mode pair, the fraction of tokens defining
//!   both modes whose two values *both* differ from the token's baseline
//!   (its first `valuesByMode` entry)
//! - **Conflict matrix**: for each mode pair, the number of tokens whose
//!   resolved values differ (structural equality)
//! - **Volatility**: per token, how many of its entries carry distinct values
//! - **Platform deviation**: per platform, the tokens whose override differs
//!   from the baseline
//!
//! Node order is modes (dimension order) then platforms. The adjacency matrix
//! is indexed by node order and is always square; a node without links keeps
//! a row and column of zeros. With no modes and no platforms the output is a
//! single aggregate node and a 1x1 zero matrix.

use super::palette::{AGGREGATE_COLOR, MODE_PALETTE, PLATFORM_PALETTE, cyclic};
use super::{TransformInput, Transformer, VisualizationData, VisualizationType};
use crate::config::AnalysisConfig;
use crate::domain::{
    DimensionId, ModeId, ModeRef, Platform, PlatformId, Token, TokenId, TokenSystem, TokenValue,
};
use crate::error::Result;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Id of the synthetic node used when there is nothing else to draw
pub const AGGREGATE_NODE_ID: &str = "all-tokens";

/// Platform deviation score above which a recommendation is emitted
const HIGH_DEVIATION_SCORE: f64 = 0.5;

/// Kind of a chord node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordNodeType {
    /// A mode of some dimension
    Mode,
    /// A platform
    Platform,
    /// Synthetic stand-in for the whole token system
    Aggregate,
}

/// Kind of a chord link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChordLinkType {
    /// Two modes whose values diverge together
    ModeCoupling,
    /// Two platforms overriding the same tokens
    PlatformDeviation,
}

/// Classification of a significant mode coupling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CouplingKind {
    /// Strength above the always-together threshold
    AlwaysTogether,
    /// Strength between the conditional and always-together thresholds
    Conditional,
    /// Significant but below the conditional threshold
    Inverse,
}

/// A node of the chord layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordNode {
    /// Node id (`mode:<id>`, `platform:<id>` or `all-tokens`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Node kind
    pub node_type: ChordNodeType,
    /// Owning dimension, for mode nodes
    pub group: Option<DimensionId>,
    /// Render color, cyclic per node kind
    pub color: String,
    /// Tokens defined for the mode, deviating on the platform, or in total
    pub token_count: usize,
}

/// A weighted link between two chord nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordLink {
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Link weight in [0, 1]
    pub value: f64,
    /// Link kind
    pub link_type: ChordLinkType,
}

/// A significant coupling between two modes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeCoupling {
    /// First mode (earlier in mode order)
    pub mode_a: ModeId,
    /// Second mode
    pub mode_b: ModeId,
    /// `changed_together / shared_tokens`
    pub strength: f64,
    /// Tokens where both values differ from baseline
    pub changed_together: usize,
    /// Tokens defining both modes
    pub shared_tokens: usize,
    /// Strength classification
    pub kind: CouplingKind,
}

/// A token whose value varies across its entries
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenVolatility {
    /// Token id
    pub token_id: TokenId,
    /// Display name
    pub display_name: String,
    /// Number of distinct serialized values
    pub distinct_values: usize,
    /// Number of `valuesByMode` entries
    pub mode_combinations: usize,
    /// `(distinct - 1) / max(1, combinations - 1)`
    pub change_frequency: f64,
}

/// Per-mode summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeSummary {
    /// Mode id
    pub mode_id: ModeId,
    /// Mode name
    pub name: String,
    /// Owning dimension
    pub dimension_id: DimensionId,
    /// Tokens with a value under this mode
    pub tokens_defined: usize,
}

/// Mode-level findings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeAnalysis {
    /// Modes in node order
    pub modes: Vec<ModeSummary>,
    /// Couplings above the significance threshold
    pub couplings: Vec<ModeCoupling>,
    /// Symmetric count of tokens differing between two modes
    pub conflict_matrix: Vec<Vec<usize>>,
    /// Most volatile tokens, descending
    pub volatile_tokens: Vec<TokenVolatility>,
}

/// How far one platform deviates from the shared values
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDeviation {
    /// Platform id
    pub platform_id: PlatformId,
    /// Display name
    pub display_name: String,
    /// Tokens whose override differs from baseline, in token order
    pub affected_token_ids: Vec<TokenId>,
    /// `affected / total tokens`
    pub deviation_score: f64,
}

/// Platform-level findings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAnalysis {
    /// Platforms in node order
    pub platforms: Vec<PlatformDeviation>,
}

/// Chord-level statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordStatistics {
    /// Number of nodes
    pub total_nodes: usize,
    /// Number of links
    pub total_links: usize,
    /// Number of modes
    pub total_modes: usize,
    /// Number of platforms
    pub total_platforms: usize,
    /// Mean strength of reported couplings
    pub average_coupling: f64,
    /// First coupling with the highest strength
    pub strongest_coupling: Option<ModeCoupling>,
    /// Top entry of the volatility ranking
    pub most_volatile_token: Option<TokenId>,
    /// Human-readable suggestions
    pub recommendations: Vec<String>,
}

/// Chord diagram over modes and platforms
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordDiagramData {
    /// Modes then platforms (or the aggregate node)
    pub nodes: Vec<ChordNode>,
    /// Coupling and deviation links
    pub links: Vec<ChordLink>,
    /// Symmetric adjacency matrix indexed by node order
    pub matrix: Vec<Vec<f64>>,
    /// Mode findings
    pub mode_analysis: ModeAnalysis,
    /// Platform findings
    pub platform_analysis: PlatformAnalysis,
    /// Summary statistics
    pub statistics: ChordStatistics,
}

/// Builds [`ChordDiagramData`].
#[derive(Debug, Clone, Default)]
pub struct ChordTransformer {
    config: AnalysisConfig,
}

impl ChordTransformer {
    /// Create a chord transformer with the given thresholds.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Project a token system into chord diagram data.
    #[must_use]
    pub fn build(&self, system: &TokenSystem) -> ChordDiagramData {
        let modes = system.modes();
        let volatile_tokens = self.volatility(&system.tokens);

        if modes.is_empty() && system.platforms.is_empty() {
            tracing::debug!("No modes or platforms; using aggregate chord node");
            return self.aggregate(system, volatile_tokens);
        }

        let mode_analysis = ModeAnalysis {
            modes: mode_summaries(&system.tokens, &modes),
            couplings: self.couplings(&system.tokens, &modes),
            conflict_matrix: conflict_matrix(&system.tokens, &modes),
            volatile_tokens,
        };
        let platform_analysis = PlatformAnalysis {
            platforms: platform_deviations(system),
        };

        let mut nodes: Vec<ChordNode> = mode_analysis
            .modes
            .iter()
            .enumerate()
            .map(|(index, summary)| ChordNode {
                id: mode_node_id(&summary.mode_id),
                name: summary.name.clone(),
                node_type: ChordNodeType::Mode,
                group: Some(summary.dimension_id.clone()),
                color: cyclic(&MODE_PALETTE, index).to_string(),
                token_count: summary.tokens_defined,
            })
            .collect();
        nodes.extend(
            platform_analysis
                .platforms
                .iter()
                .enumerate()
                .map(|(index, deviation)| ChordNode {
                    id: platform_node_id(&deviation.platform_id),
                    name: deviation.display_name.clone(),
                    node_type: ChordNodeType::Platform,
                    group: None,
                    color: cyclic(&PLATFORM_PALETTE, index).to_string(),
                    token_count: deviation.affected_token_ids.len(),
                }),
        );

        let mut links: Vec<ChordLink> = mode_analysis
            .couplings
            .iter()
            .map(|coupling| ChordLink {
                source: mode_node_id(&coupling.mode_a),
                target: mode_node_id(&coupling.mode_b),
                value: coupling.strength,
                link_type: ChordLinkType::ModeCoupling,
            })
            .collect();
        links.extend(platform_links(&platform_analysis.platforms));

        let matrix = adjacency_matrix(&nodes, &links);
        let statistics = self.statistics(&nodes, &links, &mode_analysis, &platform_analysis);

        tracing::debug!(
            nodes = nodes.len(),
            links = links.len(),
            couplings = mode_analysis.couplings.len(),
            "Built chord diagram"
        );

        ChordDiagramData {
            nodes,
            links,
            matrix,
            mode_analysis,
            platform_analysis,
            statistics,
        }
    }

    fn aggregate(
        &self,
        system: &TokenSystem,
        volatile_tokens: Vec<TokenVolatility>,
    ) -> ChordDiagramData {
        let nodes = vec![ChordNode {
            id: AGGREGATE_NODE_ID.to_string(),
            name: "All tokens".to_string(),
            node_type: ChordNodeType::Aggregate,
            group: None,
            color: AGGREGATE_COLOR.to_string(),
            token_count: system.tokens.len(),
        }];
        let mode_analysis = ModeAnalysis {
            volatile_tokens,
            ..ModeAnalysis::default()
        };
        let platform_analysis = PlatformAnalysis::default();
        let statistics = self.statistics(&nodes, &[], &mode_analysis, &platform_analysis);

        ChordDiagramData {
            nodes,
            links: Vec::new(),
            matrix: vec![vec![0.0]],
            mode_analysis,
            platform_analysis,
            statistics,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn couplings(&self, tokens: &[Token], modes: &[ModeRef<'_>]) -> Vec<ModeCoupling> {
        let mut couplings = Vec::new();

        for (i, a) in modes.iter().enumerate() {
            for b in &modes[i + 1..] {
                let mut shared_tokens = 0;
                let mut changed_together = 0;

                for token in tokens {
                    let (Some(value_a), Some(value_b), Some(baseline)) = (
                        token.explicit_value_for_mode(&a.mode.id),
                        token.explicit_value_for_mode(&b.mode.id),
                        token.baseline(),
                    ) else {
                        continue;
                    };
                    shared_tokens += 1;
                    if value_a != baseline && value_b != baseline {
                        changed_together += 1;
                    }
                }

                if shared_tokens == 0 {
                    continue;
                }
                let strength = changed_together as f64 / shared_tokens as f64;
                if strength <= self.config.coupling_significance {
                    continue;
                }
                couplings.push(ModeCoupling {
                    mode_a: a.mode.id.clone(),
                    mode_b: b.mode.id.clone(),
                    strength,
                    changed_together,
                    shared_tokens,
                    kind: self.coupling_kind(strength),
                });
            }
        }
        couplings
    }

    fn coupling_kind(&self, strength: f64) -> CouplingKind {
        if strength > self.config.coupling_always_together {
            CouplingKind::AlwaysTogether
        } else if strength >= self.config.coupling_conditional {
            CouplingKind::Conditional
        } else {
            CouplingKind::Inverse
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn volatility(&self, tokens: &[Token]) -> Vec<TokenVolatility> {
        let mut ranking: Vec<TokenVolatility> = tokens
            .iter()
            .filter(|token| !token.values_by_mode.is_empty())
            .map(|token| {
                let distinct: HashSet<String> = token
                    .values_by_mode
                    .iter()
                    .map(|entry| entry.value.serialized())
                    .collect();
                let combinations = token.values_by_mode.len();
                let change_frequency = (distinct.len() - 1) as f64
                    / combinations.saturating_sub(1).max(1) as f64;
                TokenVolatility {
                    token_id: token.id.clone(),
                    display_name: token.display_name.clone(),
                    distinct_values: distinct.len(),
                    mode_combinations: combinations,
                    change_frequency,
                }
            })
            .filter(|entry| entry.change_frequency >= self.config.volatility_floor)
            .collect();

        // Stable sort: equal frequencies keep token order.
        ranking.sort_by(|a, b| b.change_frequency.total_cmp(&a.change_frequency));
        ranking.truncate(self.config.volatility_limit);
        ranking
    }

    #[allow(clippy::cast_precision_loss)]
    fn statistics(
        &self,
        nodes: &[ChordNode],
        links: &[ChordLink],
        modes: &ModeAnalysis,
        platforms: &PlatformAnalysis,
    ) -> ChordStatistics {
        let average_coupling = if modes.couplings.is_empty() {
            0.0
        } else {
            modes.couplings.iter().map(|c| c.strength).sum::<f64>() / modes.couplings.len() as f64
        };

        let mut strongest_coupling: Option<&ModeCoupling> = None;
        for coupling in &modes.couplings {
            if strongest_coupling.is_none_or(|best| coupling.strength > best.strength) {
                strongest_coupling = Some(coupling);
            }
        }

        ChordStatistics {
            total_nodes: nodes.len(),
            total_links: links.len(),
            total_modes: modes.modes.len(),
            total_platforms: platforms.platforms.len(),
            average_coupling,
            strongest_coupling: strongest_coupling.cloned(),
            most_volatile_token: modes.volatile_tokens.first().map(|v| v.token_id.clone()),
            recommendations: self.recommendations(modes, platforms),
        }
    }

    fn recommendations(&self, modes: &ModeAnalysis, platforms: &PlatformAnalysis) -> Vec<String> {
        let mut recommendations = Vec::new();

        if modes.modes.is_empty() && platforms.platforms.is_empty() {
            recommendations.push(
                "Define dimensions with modes, or platforms, to analyze value conflicts"
                    .to_string(),
            );
        }

        for coupling in &modes.couplings {
            let percent = percent(coupling.strength);
            match coupling.kind {
                CouplingKind::AlwaysTogether => recommendations.push(format!(
                    "Modes {} and {} diverge from baseline together on {percent}% of shared tokens; consider merging them",
                    coupling.mode_a, coupling.mode_b
                )),
                CouplingKind::Inverse => recommendations.push(format!(
                    "Modes {} and {} only occasionally diverge together ({percent}%); review whether their overrides are intentional",
                    coupling.mode_a, coupling.mode_b
                )),
                CouplingKind::Conditional => {}
            }
        }

        for deviation in &platforms.platforms {
            if deviation.deviation_score > HIGH_DEVIATION_SCORE {
                recommendations.push(format!(
                    "Platform {} overrides {} tokens ({}%); consider modelling it as a mode",
                    deviation.platform_id,
                    deviation.affected_token_ids.len(),
                    percent(deviation.deviation_score)
                ));
            }
        }

        if let Some(top) = modes.volatile_tokens.first() {
            recommendations.push(format!(
                "Token {} changes across {}% of its mode combinations; keep its variants under review",
                top.token_id,
                percent(top.change_frequency)
            ));
        }

        recommendations
    }
}

impl Transformer for ChordTransformer {
    fn visualization_type(&self) -> VisualizationType {
        VisualizationType::ChordDiagram
    }

    fn transform(&self, input: &TransformInput<'_>) -> Result<VisualizationData> {
        // Node ids are derived from mode and platform ids, so they must be unique.
        input.system.check_contract()?;
        Ok(VisualizationData::ChordDiagram(self.build(input.system)))
    }
}

fn mode_node_id(id: &ModeId) -> String {
    format!("mode:{id}")
}

fn platform_node_id(id: &PlatformId) -> String {
    format!("platform:{id}")
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(fraction: f64) -> u32 {
    (fraction * 100.0).round() as u32
}

fn mode_summaries(tokens: &[Token], modes: &[ModeRef<'_>]) -> Vec<ModeSummary> {
    modes
        .iter()
        .map(|mode_ref| ModeSummary {
            mode_id: mode_ref.mode.id.clone(),
            name: if mode_ref.mode.name.is_empty() {
                mode_ref.mode.id.to_string()
            } else {
                mode_ref.mode.name.clone()
            },
            dimension_id: mode_ref.dimension.id.clone(),
            tokens_defined: tokens
                .iter()
                .filter(|token| token.resolved_value_for_mode(&mode_ref.mode.id).is_some())
                .count(),
        })
        .collect()
}

/// Symmetric count of tokens whose resolved values differ between two modes.
fn conflict_matrix(tokens: &[Token], modes: &[ModeRef<'_>]) -> Vec<Vec<usize>> {
    let n = modes.len();
    let mut matrix = vec![vec![0; n]; n];

    for i in 0..n {
        for j in i + 1..n {
            let conflicts = tokens
                .iter()
                .filter(|token| {
                    match (
                        token.resolved_value_for_mode(&modes[i].mode.id),
                        token.resolved_value_for_mode(&modes[j].mode.id),
                    ) {
                        (Some(a), Some(b)) => a != b,
                        _ => false,
                    }
                })
                .count();
            matrix[i][j] = conflicts;
            matrix[j][i] = conflicts;
        }
    }
    matrix
}

#[allow(clippy::cast_precision_loss)]
fn platform_deviations(system: &TokenSystem) -> Vec<PlatformDeviation> {
    let platform_ids: HashSet<&PlatformId> = system.platforms.iter().map(|p| &p.id).collect();
    let mut overrides: HashMap<(&PlatformId, &TokenId), Vec<&TokenValue>> = HashMap::new();

    for entry in &system.platform_overrides {
        if !platform_ids.contains(&entry.platform_id) {
            tracing::warn!(
                platform = %entry.platform_id,
                token = %entry.token_id,
                "Override for unknown platform ignored"
            );
            continue;
        }
        if system.token(&entry.token_id).is_none() {
            tracing::warn!(
                platform = %entry.platform_id,
                token = %entry.token_id,
                "Override for unknown token ignored"
            );
            continue;
        }
        overrides
            .entry((&entry.platform_id, &entry.token_id))
            .or_default()
            .push(&entry.value);
    }

    let total = system.tokens.len();
    system
        .platforms
        .iter()
        .map(|platform: &Platform| {
            let affected_token_ids: Vec<TokenId> = system
                .tokens
                .iter()
                .filter(|token| {
                    overrides
                        .get(&(&platform.id, &token.id))
                        .is_some_and(|values| {
                            values.iter().any(|value| Some(*value) != token.baseline())
                        })
                })
                .map(|token| token.id.clone())
                .collect();
            let deviation_score = if total == 0 {
                0.0
            } else {
                affected_token_ids.len() as f64 / total as f64
            };
            PlatformDeviation {
                platform_id: platform.id.clone(),
                display_name: if platform.display_name.is_empty() {
                    platform.id.to_string()
                } else {
                    platform.display_name.clone()
                },
                affected_token_ids,
                deviation_score,
            }
        })
        .collect()
}

/// Links between platforms overriding overlapping token sets (Jaccard weight).
#[allow(clippy::cast_precision_loss)]
fn platform_links(platforms: &[PlatformDeviation]) -> Vec<ChordLink> {
    let mut links = Vec::new();
    for (i, a) in platforms.iter().enumerate() {
        let a_set: HashSet<&TokenId> = a.affected_token_ids.iter().collect();
        for b in &platforms[i + 1..] {
            let shared = b
                .affected_token_ids
                .iter()
                .filter(|id| a_set.contains(id))
                .count();
            if shared == 0 {
                continue;
            }
            let union = a.affected_token_ids.len() + b.affected_token_ids.len() - shared;
            links.push(ChordLink {
                source: platform_node_id(&a.platform_id),
                target: platform_node_id(&b.platform_id),
                value: shared as f64 / union as f64,
                link_type: ChordLinkType::PlatformDeviation,
            });
        }
    }
    links
}

fn adjacency_matrix(nodes: &[ChordNode], links: &[ChordLink]) -> Vec<Vec<f64>> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.as_str(), i))
        .collect();
    let mut matrix = vec![vec![0.0; nodes.len()]; nodes.len()];

    for link in links {
        let (Some(&source), Some(&target)) = (
            index.get(link.source.as_str()),
            index.get(link.target.as_str()),
        ) else {
            tracing::warn!(
                source = %link.source,
                target = %link.target,
                "Link endpoint is not a node; skipped in matrix"
            );
            continue;
        };
        matrix[source][target] = link.value;
        matrix[target][source] = link.value;
    }
    matrix
}
