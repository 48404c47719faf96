//! Lookup from visualization type to transformer.

use super::{
    ChordTransformer, GraphTransformer, TransformInput, Transformer, VisualizationData,
    VisualizationType,
};
use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Routes visualization requests to their transformer.
pub struct TransformerRegistry {
    transformers: BTreeMap<VisualizationType, Box<dyn Transformer>>,
}

impl std::fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("types", &self.transformers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TransformerRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            transformers: BTreeMap::new(),
        }
    }

    /// A registry holding every built-in transformer.
    #[must_use]
    pub fn with_defaults(config: &AnalysisConfig) -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(GraphTransformer::new()));
        registry.register(Box::new(ChordTransformer::new(config.clone())));
        registry
    }

    /// Register a transformer, replacing any previous one of the same type.
    pub fn register(&mut self, transformer: Box<dyn Transformer>) {
        let ty = transformer.visualization_type();
        if self.transformers.insert(ty, transformer).is_some() {
            tracing::debug!(visualization = %ty, "Replaced registered transformer");
        }
    }

    /// Transformer for a type, if registered.
    #[must_use]
    pub fn get(&self, ty: VisualizationType) -> Option<&dyn Transformer> {
        self.transformers.get(&ty).map(|transformer| &**transformer)
    }

    /// Transformer for a registry key such as `"chord-diagram"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVisualization`] if the key is unknown or
    /// nothing is registered under it.
    pub fn get_by_key(&self, key: &str) -> Result<&dyn Transformer> {
        let ty: VisualizationType = key.parse()?;
        self.get(ty)
            .ok_or_else(|| Error::UnknownVisualization(key.to_string()))
    }

    /// Registered types, in key order.
    #[must_use]
    pub fn types(&self) -> Vec<VisualizationType> {
        self.transformers.keys().copied().collect()
    }

    /// Look up `key` and run its transformer.
    ///
    /// # Errors
    ///
    /// Lookup errors from [`TransformerRegistry::get_by_key`], or errors of
    /// the transformer itself.
    pub fn transform(&self, key: &str, input: &TransformInput<'_>) -> Result<VisualizationData> {
        self.get_by_key(key)?.transform(input)
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::with_defaults(&AnalysisConfig::default())
    }
}
