//! Token dependency analysis.
//!
//! One analysis run turns a token collection into a
//! [`GlobalDependencyAnalysis`]:
//!
//! 1. Check the input contract (fail fast, before any recursion)
//! 2. Build the [`DependencyMap`] and the [`DependencyContext`]
//! 3. Compute per-token depth, usage, cycle participation and blast radius
//! 4. Search for cycles with colour-marking DFS
//! 5. Roll up roots, leaves, isolated tokens and complexity metrics
//! 6. Run the validation pass
//!
//! The analyzer holds configuration only. All state of a run lives in the
//! context created for that run, so analyses of different token systems
//! never share memoized depths.

mod blast_radius;
mod context;
mod dependency_map;
mod types;
mod validation;

pub use blast_radius::{blast_radius, impact_level};
pub use context::{DependencyContext, DepthCalculator};
pub use dependency_map::DependencyMap;
pub use types::{
    BlastRadius, CircularDependency, ComplexityMetrics, GlobalDependencyAnalysis, ImpactLevel,
    TokenDependencyInfo, TokenUsage, ValidationError, ValidationErrorKind, ValidationReport,
    ValidationWarning, ValidationWarningKind,
};
pub use validation::validate;

use crate::config::AnalysisConfig;
use crate::domain::{Token, TokenId, TokenSystem};
use crate::error::Result;
use std::collections::HashMap;

/// Runs the global dependency analysis.
#[derive(Debug, Clone, Default)]
pub struct DependencyAnalyzer {
    config: AnalysisConfig,
}

impl DependencyAnalyzer {
    /// Create an analyzer with the given thresholds.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze every token of a token system.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] if the system breaks the input
    /// contract (see [`TokenSystem::check_contract`]). Data-quality problems
    /// are reported in the result instead.
    pub fn analyze(&self, system: &TokenSystem) -> Result<GlobalDependencyAnalysis> {
        system.check_contract()?;
        Ok(self.analyze_tokens(&system.tokens))
    }

    /// Analyze a token collection that already satisfies the input contract.
    #[must_use]
    pub fn analyze_tokens(&self, tokens: &[Token]) -> GlobalDependencyAnalysis {
        let context = DependencyContext::new(tokens);
        let map = context.map();

        let mut calculator = context.depths();
        let depths: HashMap<TokenId, usize> = tokens
            .iter()
            .map(|token| (token.id.clone(), calculator.depth(&token.id)))
            .collect();

        let circular_dependencies = context.find_cycles();

        let token_infos: Vec<TokenDependencyInfo> = tokens
            .iter()
            .map(|token| {
                let dependents: Vec<TokenId> = map.dependents(&token.id).cloned().collect();
                TokenDependencyInfo {
                    token_id: token.id.clone(),
                    depth: depths.get(&token.id).copied().unwrap_or(0),
                    dependencies: map.dependencies(&token.id).cloned().collect(),
                    usage_count: dependents.len(),
                    dependents,
                    is_circular: context.is_circular(&token.id),
                    circular_paths: circular_dependencies
                        .iter()
                        .filter(|cycle| cycle.contains(&token.id))
                        .map(|cycle| cycle.path.clone())
                        .collect(),
                    blast_radius: blast_radius(&context, &token.id, &self.config),
                }
            })
            .collect();

        let mut root_tokens = Vec::new();
        let mut leaf_tokens = Vec::new();
        let mut isolated_tokens = Vec::new();
        for info in &token_infos {
            match (info.dependencies.is_empty(), info.dependents.is_empty()) {
                (true, false) => root_tokens.push(info.token_id.clone()),
                (false, true) => leaf_tokens.push(info.token_id.clone()),
                (true, true) => isolated_tokens.push(info.token_id.clone()),
                (false, false) => {}
            }
        }

        let most_referenced = most_referenced(&token_infos, self.config.most_referenced_limit);
        let complexity = complexity(&token_infos, map.edge_count(), context.circular_count());
        let validation = validate(
            &context,
            &depths,
            circular_dependencies.len(),
            &self.config,
        );

        tracing::debug!(
            tokens = tokens.len(),
            cycles = circular_dependencies.len(),
            max_depth = complexity.max_depth,
            valid = validation.is_valid,
            "Dependency analysis complete"
        );

        GlobalDependencyAnalysis {
            total_tokens: tokens.len(),
            tokens: token_infos,
            circular_dependencies,
            root_tokens,
            leaf_tokens,
            isolated_tokens,
            most_referenced,
            complexity,
            validation,
        }
    }
}

/// Analyze a token system with default thresholds.
///
/// # Errors
///
/// Same conditions as [`DependencyAnalyzer::analyze`].
pub fn analyze(system: &TokenSystem) -> Result<GlobalDependencyAnalysis> {
    DependencyAnalyzer::default().analyze(system)
}

/// Referenced tokens by descending usage; ties keep input order.
fn most_referenced(infos: &[TokenDependencyInfo], limit: usize) -> Vec<TokenUsage> {
    let mut used: Vec<TokenUsage> = infos
        .iter()
        .filter(|info| info.usage_count > 0)
        .map(|info| TokenUsage {
            token_id: info.token_id.clone(),
            usage_count: info.usage_count,
        })
        .collect();
    used.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
    used.truncate(limit);
    used
}

#[allow(clippy::cast_precision_loss)]
fn complexity(
    infos: &[TokenDependencyInfo],
    total_references: usize,
    circular_token_count: usize,
) -> ComplexityMetrics {
    let count = infos.len();
    let max_depth = infos.iter().map(|info| info.depth).max().unwrap_or(0);
    let (average_depth, average_references_per_token) = if count == 0 {
        (0.0, 0.0)
    } else {
        let depth_sum: usize = infos.iter().map(|info| info.depth).sum();
        (
            depth_sum as f64 / count as f64,
            total_references as f64 / count as f64,
        )
    };
    ComplexityMetrics {
        max_depth,
        average_depth,
        total_references,
        average_references_per_token,
        circular_token_count,
    }
}
