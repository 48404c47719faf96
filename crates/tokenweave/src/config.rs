//! Analysis configuration.
//!
//! Every policy threshold used by the analyzer and the transformers lives in
//! [`AnalysisConfig`]. The defaults are the documented policy constants; a
//! YAML file may override any subset of them.
//!
//! ```yaml
//! deep-nesting-threshold: 4
//! coupling-significance: 0.25
//! volatility-limit: 10
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Depth above which a token is reported as deeply nested
pub const DEFAULT_DEEP_NESTING_THRESHOLD: usize = 5;

/// Direct-dependent count above which impact is medium
pub const DEFAULT_IMPACT_MEDIUM_THRESHOLD: usize = 5;

/// Direct-dependent count above which impact is high
pub const DEFAULT_IMPACT_HIGH_THRESHOLD: usize = 10;

/// Number of entries kept in the most-referenced list
pub const DEFAULT_MOST_REFERENCED_LIMIT: usize = 10;

/// Bound on the blast-radius breadth-first search
pub const DEFAULT_MAX_INDIRECT_DEPTH: usize = 50;

/// Coupling strength above which a mode pair is reported
pub const DEFAULT_COUPLING_SIGNIFICANCE: f64 = 0.3;

/// Coupling strength above which modes always change together
pub const DEFAULT_COUPLING_ALWAYS_TOGETHER: f64 = 0.8;

/// Coupling strength from which modes change together conditionally
pub const DEFAULT_COUPLING_CONDITIONAL: f64 = 0.5;

/// Change frequency below which a token is not volatile
pub const DEFAULT_VOLATILITY_FLOOR: f64 = 0.1;

/// Number of entries kept in the volatility ranking
pub const DEFAULT_VOLATILITY_LIMIT: usize = 20;

/// Thresholds for dependency analysis and the conflict projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Depth above which a `deep_nesting` warning is emitted
    pub deep_nesting_threshold: usize,

    /// Direct dependents above which impact is medium
    pub impact_medium_threshold: usize,

    /// Direct dependents above which impact is high
    pub impact_high_threshold: usize,

    /// Length of the most-referenced list
    pub most_referenced_limit: usize,

    /// Hop limit for indirect blast radius
    pub max_indirect_depth: usize,

    /// Minimum coupling strength for a reported coupling
    pub coupling_significance: f64,

    /// Strength above which a coupling is `always-together`
    pub coupling_always_together: f64,

    /// Strength from which a coupling is `conditional`
    pub coupling_conditional: f64,

    /// Minimum change frequency of a volatile token
    pub volatility_floor: f64,

    /// Length of the volatility ranking
    pub volatility_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            deep_nesting_threshold: DEFAULT_DEEP_NESTING_THRESHOLD,
            impact_medium_threshold: DEFAULT_IMPACT_MEDIUM_THRESHOLD,
            impact_high_threshold: DEFAULT_IMPACT_HIGH_THRESHOLD,
            most_referenced_limit: DEFAULT_MOST_REFERENCED_LIMIT,
            max_indirect_depth: DEFAULT_MAX_INDIRECT_DEPTH,
            coupling_significance: DEFAULT_COUPLING_SIGNIFICANCE,
            coupling_always_together: DEFAULT_COUPLING_ALWAYS_TOGETHER,
            coupling_conditional: DEFAULT_COUPLING_CONDITIONAL,
            volatility_floor: DEFAULT_VOLATILITY_FLOOR,
            volatility_limit: DEFAULT_VOLATILITY_LIMIT,
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed YAML, unknown keys, or
    /// thresholds that fail [`AnalysisConfig::validate`].
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document means "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise the same
    /// conditions as [`AnalysisConfig::from_yaml`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "Loaded analysis configuration");
        Ok(config)
    }

    /// Check that the thresholds are mutually consistent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("coupling-significance", self.coupling_significance),
            ("coupling-always-together", self.coupling_always_together),
            ("coupling-conditional", self.coupling_conditional),
            ("volatility-floor", self.volatility_floor),
        ];
        for (key, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{key} must be between 0 and 1, got {value}"
                )));
            }
        }
        if self.coupling_conditional > self.coupling_always_together {
            return Err(Error::Config(
                "coupling-conditional must not exceed coupling-always-together".to_string(),
            ));
        }
        if self.impact_medium_threshold > self.impact_high_threshold {
            return Err(Error::Config(
                "impact-medium-threshold must not exceed impact-high-threshold".to_string(),
            ));
        }
        Ok(())
    }
}
