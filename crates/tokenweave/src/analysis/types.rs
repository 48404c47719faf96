//! Result types of the dependency analysis.
//!
//! All of these are produced fresh per analysis run and never mutated
//! afterwards. They serialize in camelCase for the rendering layer.

use crate::domain::TokenId;
use serde::Serialize;
use std::fmt;

/// A circular alias chain found by the cycle search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularDependency {
    /// Token ids in alias order; the last one aliases the first.
    pub path: Vec<TokenId>,
    /// Human-readable description of the chain
    pub description: String,
    /// Suggested way to break the chain
    pub suggested_resolution: String,
}

impl CircularDependency {
    /// Build a record for the chain `path`.
    #[must_use]
    pub fn new(path: Vec<TokenId>) -> Self {
        let chain = format_chain(&path);
        let closed = match path.first() {
            Some(first) => format!("{chain} -> {first}"),
            None => chain.clone(),
        };
        Self {
            description: format!("Circular dependency: {closed}"),
            suggested_resolution: format!(
                "Replace one alias in {chain} with a literal value to break the cycle"
            ),
            path,
        }
    }

    /// Returns `true` if `id` is part of this chain.
    #[must_use]
    pub fn contains(&self, id: &TokenId) -> bool {
        self.path.contains(id)
    }
}

fn format_chain(path: &[TokenId]) -> String {
    path.iter()
        .map(TokenId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Estimated impact of changing a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    /// Few direct dependents
    Low,
    /// Moderate number of direct dependents
    Medium,
    /// Many direct dependents
    High,
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Tokens affected by a change to one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlastRadius {
    /// Tokens aliasing this token directly
    pub directly_affected: Vec<TokenId>,
    /// Tokens reaching this token through two or more alias hops
    pub indirectly_affected: Vec<TokenId>,
    /// Impact tier derived from the direct dependent count
    pub estimated_impact: ImpactLevel,
}

impl BlastRadius {
    /// Total number of affected tokens (direct + indirect).
    #[must_use]
    pub fn total_affected(&self) -> usize {
        self.directly_affected.len() + self.indirectly_affected.len()
    }
}

/// Per-token dependency metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDependencyInfo {
    /// The token analyzed
    pub token_id: TokenId,
    /// Alias depth (0 for literals and cycle participants)
    pub depth: usize,
    /// Tokens this token aliases
    pub dependencies: Vec<TokenId>,
    /// Tokens aliasing this token
    pub dependents: Vec<TokenId>,
    /// Number of tokens aliasing this token
    pub usage_count: usize,
    /// Whether the token can reach itself through aliases
    pub is_circular: bool,
    /// Reported chains this token appears in
    pub circular_paths: Vec<Vec<TokenId>>,
    /// Tokens affected by a change to this token
    pub blast_radius: BlastRadius,
}

/// A token and how many tokens alias it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    /// The referenced token
    pub token_id: TokenId,
    /// Number of tokens aliasing it
    pub usage_count: usize,
}

/// Whole-system complexity roll-up
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityMetrics {
    /// Greatest token depth
    pub max_depth: usize,
    /// Mean token depth (0 for an empty system)
    pub average_depth: f64,
    /// Unique (alias, target) pairs
    pub total_references: usize,
    /// Mean outgoing references per token
    pub average_references_per_token: f64,
    /// Tokens participating in a cycle
    pub circular_token_count: usize,
}

/// Kind of a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// An alias points at an id no token has
    MissingReference,
}

/// Kind of a validation warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationWarningKind {
    /// Alias depth exceeds the configured threshold
    DeepNesting,
    /// No token aliases this token
    UnusedToken,
}

impl ValidationErrorKind {
    /// Stable identifier for programmatic filtering.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingReference => "missing_reference",
        }
    }
}

impl ValidationWarningKind {
    /// Stable identifier for programmatic filtering.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeepNesting => "deep_nesting",
            Self::UnusedToken => "unused_token",
        }
    }
}

/// A validation error record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Error kind
    pub kind: ValidationErrorKind,
    /// Token carrying the problem
    pub token_id: TokenId,
    /// Unresolved target, for missing references
    pub referenced_id: Option<TokenId>,
    /// Human-readable message
    pub message: String,
}

/// A validation warning record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    /// Warning kind
    pub kind: ValidationWarningKind,
    /// Token the warning is about
    pub token_id: TokenId,
    /// Human-readable message
    pub message: String,
}

/// Structured outcome of the validation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// `true` when there are no errors and no cycles
    pub is_valid: bool,
    /// Error records
    pub errors: Vec<ValidationError>,
    /// Warning records
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Warnings of one kind.
    pub fn warnings_of(
        &self,
        kind: ValidationWarningKind,
    ) -> impl Iterator<Item = &ValidationWarning> + '_ {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }
}

/// Complete output of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalDependencyAnalysis {
    /// Number of tokens analyzed
    pub total_tokens: usize,
    /// Per-token metrics, in input order
    pub tokens: Vec<TokenDependencyInfo>,
    /// Reported cycles, in discovery order
    pub circular_dependencies: Vec<CircularDependency>,
    /// Tokens that alias nothing but are aliased
    pub root_tokens: Vec<TokenId>,
    /// Tokens that alias something but are aliased by nothing
    pub leaf_tokens: Vec<TokenId>,
    /// Tokens with no aliases in either direction
    pub isolated_tokens: Vec<TokenId>,
    /// Most-aliased tokens, descending
    pub most_referenced: Vec<TokenUsage>,
    /// Complexity roll-up
    pub complexity: ComplexityMetrics,
    /// Validation findings
    pub validation: ValidationReport,
}

impl GlobalDependencyAnalysis {
    /// Metrics for one token.
    #[must_use]
    pub fn token(&self, id: &TokenId) -> Option<&TokenDependencyInfo> {
        self.tokens.iter().find(|info| &info.token_id == id)
    }

    /// Depth of one token, if known.
    #[must_use]
    pub fn depth_of(&self, id: &TokenId) -> Option<usize> {
        self.token(id).map(|info| info.depth)
    }

    /// Returns `true` if `id` participates in a cycle.
    #[must_use]
    pub fn is_circular(&self, id: &TokenId) -> bool {
        self.token(id).is_some_and(|info| info.is_circular)
    }
}
