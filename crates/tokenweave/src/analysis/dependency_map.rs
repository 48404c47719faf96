//! Forward and reverse alias maps.
//!
//! ## Edge Direction Convention
//!
//! Edges point from **alias -> target**: if token `A` aliases token `B`,
//! then `B ∈ forward[A]` and `A ∈ reverse[B]`.
//!
//! Both maps use ordered sets, so the maps are identical for identical token
//! collections regardless of token order, and traversals over them are
//! deterministic.

use crate::domain::{Token, TokenId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Alias relation between tokens, in both directions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyMap {
    /// token -> tokens it references
    pub forward: BTreeMap<TokenId, BTreeSet<TokenId>>,
    /// token -> tokens referencing it
    pub reverse: BTreeMap<TokenId, BTreeSet<TokenId>>,
}

impl DependencyMap {
    /// Build both maps from a token collection in a single scan.
    ///
    /// Every token gets an entry in both maps, even when empty. Aliases to
    /// unknown ids are recorded as well; existence is checked by validation.
    #[must_use]
    pub fn build(tokens: &[Token]) -> Self {
        let mut map = Self::default();

        for token in tokens {
            map.forward.entry(token.id.clone()).or_default();
            map.reverse.entry(token.id.clone()).or_default();
        }

        for token in tokens {
            for target in token.alias_targets() {
                map.forward
                    .entry(token.id.clone())
                    .or_default()
                    .insert(target.clone());
                map.reverse
                    .entry(target.clone())
                    .or_default()
                    .insert(token.id.clone());
            }
        }

        tracing::debug!(
            tokens = tokens.len(),
            edges = map.edge_count(),
            "Built dependency map"
        );
        map
    }

    /// Tokens referenced by `id`.
    pub fn dependencies<'a>(
        &'a self,
        id: &TokenId,
    ) -> impl Iterator<Item = &'a TokenId> + use<'a> {
        self.forward.get(id).into_iter().flatten()
    }

    /// Tokens referencing `id`.
    pub fn dependents<'a>(
        &'a self,
        id: &TokenId,
    ) -> impl Iterator<Item = &'a TokenId> + use<'a> {
        self.reverse.get(id).into_iter().flatten()
    }

    /// Number of tokens referenced by `id`.
    #[must_use]
    pub fn dependency_count(&self, id: &TokenId) -> usize {
        self.forward.get(id).map_or(0, BTreeSet::len)
    }

    /// Number of tokens referencing `id`.
    #[must_use]
    pub fn dependent_count(&self, id: &TokenId) -> usize {
        self.reverse.get(id).map_or(0, BTreeSet::len)
    }

    /// Total number of unique (alias, target) pairs.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.forward.values().map(BTreeSet::len).sum()
    }
}
