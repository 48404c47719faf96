//! Immutable per-run analysis context.
//!
//! A [`DependencyContext`] is built once from a token slice and then threaded
//! through every computation of the run. Nothing in it is shared across runs,
//! so two analyses never observe each other's state and a context can be
//! built directly in tests.
//!
//! # Cycles
//!
//! Two related notions are computed here:
//!
//! - **Participation**: a token is circular if it can reach itself through
//!   aliases, i.e. it sits in a strongly connected component of size > 1 or
//!   aliases itself. Computed with Tarjan's SCC over a petgraph `DiGraph`.
//! - **Reported cycles**: colour-marking DFS (white/gray/black) in token
//!   input order. A gray neighbour closes a cycle; the path from that
//!   neighbour's latest occurrence to the current token is reported. The
//!   search continues after each report and never re-explores black tokens.

use super::dependency_map::DependencyMap;
use super::types::CircularDependency;
use crate::domain::{Token, TokenId};
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// DFS colour of a token during cycle search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// On the current DFS path
    Gray,
    /// Fully explored
    Black,
}

/// Everything derived once from the token input of a single run.
#[derive(Debug)]
pub struct DependencyContext<'a> {
    tokens: &'a [Token],
    map: DependencyMap,
    known: HashSet<&'a TokenId>,
    circular: HashSet<TokenId>,
}

impl<'a> DependencyContext<'a> {
    /// Build the maps and cycle participation for `tokens`.
    #[must_use]
    pub fn new(tokens: &'a [Token]) -> Self {
        let map = DependencyMap::build(tokens);
        let known: HashSet<&TokenId> = tokens.iter().map(|token| &token.id).collect();
        let circular = circular_participants(tokens, &map, &known);
        Self {
            tokens,
            map,
            known,
            circular,
        }
    }

    /// Tokens of this run, in input order.
    #[must_use]
    pub fn tokens(&self) -> &'a [Token] {
        self.tokens
    }

    /// Forward and reverse alias maps.
    #[must_use]
    pub fn map(&self) -> &DependencyMap {
        &self.map
    }

    /// Returns `true` if a token with this id exists.
    #[must_use]
    pub fn is_known(&self, id: &TokenId) -> bool {
        self.known.contains(id)
    }

    /// Returns `true` if `id` can reach itself through aliases.
    #[must_use]
    pub fn is_circular(&self, id: &TokenId) -> bool {
        self.circular.contains(id)
    }

    /// Number of cycle-participating tokens.
    #[must_use]
    pub fn circular_count(&self) -> usize {
        self.circular.len()
    }

    /// Run the colour-marking DFS and report every cycle it closes.
    #[must_use]
    pub fn find_cycles(&self) -> Vec<CircularDependency> {
        let mut colors: HashMap<&TokenId, Color> = HashMap::new();
        let mut path: Vec<&TokenId> = Vec::new();
        let mut cycles = Vec::new();

        for token in self.tokens {
            if !colors.contains_key(&token.id) {
                self.visit(&token.id, &mut colors, &mut path, &mut cycles);
            }
        }

        tracing::debug!(cycles = cycles.len(), "Cycle search complete");
        cycles
    }

    fn visit<'m>(
        &'m self,
        id: &'m TokenId,
        colors: &mut HashMap<&'m TokenId, Color>,
        path: &mut Vec<&'m TokenId>,
        cycles: &mut Vec<CircularDependency>,
    ) {
        colors.insert(id, Color::Gray);
        path.push(id);

        for next in self.map.dependencies(id) {
            match colors.get(next) {
                Some(Color::Gray) => {
                    if let Some(start) = path.iter().rposition(|on_path| *on_path == next) {
                        let chain = path[start..].iter().map(|t| (*t).clone()).collect();
                        cycles.push(CircularDependency::new(chain));
                    }
                }
                Some(Color::Black) => {}
                None => self.visit(next, colors, path, cycles),
            }
        }

        path.pop();
        colors.insert(id, Color::Black);
    }

    /// Start a depth computation bound to this context.
    #[must_use]
    pub fn depths(&self) -> DepthCalculator<'_, 'a> {
        DepthCalculator {
            context: self,
            memo: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }
}

/// Memoized alias-depth computation.
///
/// The memo only ever stores completed results. Revisiting a token that is
/// still on the current recursion path returns 0 for that branch without
/// touching the memo, so the computation is total over cyclic input.
/// Cycle participants are pinned to depth 0.
#[derive(Debug)]
pub struct DepthCalculator<'c, 'a> {
    context: &'c DependencyContext<'a>,
    memo: HashMap<TokenId, usize>,
    in_progress: HashSet<TokenId>,
}

impl DepthCalculator<'_, '_> {
    /// Depth of `id`: 0 without aliases, else one more than its deepest target.
    pub fn depth(&mut self, id: &TokenId) -> usize {
        if self.context.is_circular(id) {
            return 0;
        }
        if let Some(&depth) = self.memo.get(id) {
            return depth;
        }
        if !self.in_progress.insert(id.clone()) {
            return 0;
        }

        let targets: Vec<TokenId> = self.context.map.dependencies(id).cloned().collect();
        let depth = targets
            .iter()
            .map(|target| self.depth(target))
            .max()
            .map_or(0, |deepest| deepest + 1);

        self.in_progress.remove(id);
        self.memo.insert(id.clone(), depth);
        depth
    }
}

/// Tokens in a non-trivial strongly connected component, or aliasing themselves.
fn circular_participants(
    tokens: &[Token],
    map: &DependencyMap,
    known: &HashSet<&TokenId>,
) -> HashSet<TokenId> {
    let mut graph: DiGraph<&TokenId, ()> = DiGraph::new();
    let mut node_map: HashMap<&TokenId, NodeIndex> = HashMap::with_capacity(tokens.len());

    for token in tokens {
        node_map.insert(&token.id, graph.add_node(&token.id));
    }

    for token in tokens {
        let source = node_map[&token.id];
        for target in map.dependencies(&token.id) {
            if !known.contains(target) {
                continue;
            }
            graph.add_edge(source, node_map[target], ());
        }
    }

    let mut circular = HashSet::new();
    for component in algo::tarjan_scc(&graph) {
        let is_cycle = component.len() > 1
            || component
                .first()
                .is_some_and(|&node| graph.contains_edge(node, node));
        if is_cycle {
            circular.extend(component.into_iter().map(|node| graph[node].clone()));
        }
    }
    circular
}
