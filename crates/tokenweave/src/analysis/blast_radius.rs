//! Blast-radius computation over the reverse alias map.

use super::context::DependencyContext;
use super::types::{BlastRadius, ImpactLevel};
use crate::config::AnalysisConfig;
use crate::domain::TokenId;
use std::collections::{HashSet, VecDeque};

/// Classify impact from the number of direct dependents.
#[must_use]
pub fn impact_level(direct_dependents: usize, config: &AnalysisConfig) -> ImpactLevel {
    if direct_dependents > config.impact_high_threshold {
        ImpactLevel::High
    } else if direct_dependents > config.impact_medium_threshold {
        ImpactLevel::Medium
    } else {
        ImpactLevel::Low
    }
}

/// Tokens affected by a change to `id`.
///
/// Direct dependents are the reverse-map entry. Indirect dependents are
/// found by BFS over the reverse map starting from the direct ones, bounded
/// by `max_indirect_depth` hops; neither list contains `id` itself.
#[must_use]
pub fn blast_radius(
    context: &DependencyContext<'_>,
    id: &TokenId,
    config: &AnalysisConfig,
) -> BlastRadius {
    let map = context.map();
    let directly_affected: Vec<TokenId> = map.dependents(id).cloned().collect();

    let mut visited: HashSet<&TokenId> = HashSet::new();
    visited.insert(id);
    let mut queue: VecDeque<(&TokenId, usize)> = VecDeque::new();
    for direct in map.dependents(id) {
        if visited.insert(direct) {
            queue.push_back((direct, 1));
        }
    }

    let mut indirectly_affected = Vec::new();
    while let Some((current, depth)) = queue.pop_front() {
        if depth >= config.max_indirect_depth {
            continue;
        }
        for dependent in map.dependents(current) {
            if visited.insert(dependent) {
                indirectly_affected.push(dependent.clone());
                queue.push_back((dependent, depth + 1));
            }
        }
    }

    BlastRadius {
        estimated_impact: impact_level(directly_affected.len(), config),
        directly_affected,
        indirectly_affected,
    }
}
