//! Breadth-first shortest-path search over the conversion graph.

use super::ConversionPath;
use crate::graph::{ConversionGraph, SymbolId};
use std::collections::VecDeque;

/// Finds the shortest conversion route between two symbols.
///
/// Edges all weigh one hop, so the first path BFS reaches the target with is
/// a shortest one. Ties are broken by neighbor insertion order, which the
/// graph keeps stable, so the same graph always yields the same route.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'a> {
    graph: &'a ConversionGraph,
}

impl<'a> PathFinder<'a> {
    pub fn new(graph: &'a ConversionGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'a ConversionGraph {
        self.graph
    }

    /// Find a shortest path from `source` to `target`.
    ///
    /// Returns the single-symbol path when `source == target`, and `None`
    /// when the target is unreachable or either symbol is absent from the
    /// graph. `None` means "no viable route", not a failure.
    pub fn find_path(&self, source: &str, target: &str) -> Option<ConversionPath> {
        if source == target {
            return Some(ConversionPath::trivial(source));
        }

        let (source_id, target_id) = match (
            self.graph.find_symbol_id(source),
            self.graph.find_symbol_id(target),
        ) {
            (Ok(s), Ok(t)) => (s, t),
            _ => {
                tracing::debug!(
                    source = source,
                    target = target,
                    "Path lookup for symbol outside the graph"
                );
                return None;
            }
        };

        let predecessors = self.search(source_id, target_id)?;
        let path = self.reconstruct(&predecessors, source_id, target_id);

        tracing::debug!(
            source = source,
            target = target,
            hops = path.hop_count(),
            route = %path,
            "Conversion path found"
        );

        Some(path)
    }

    /// Whether any route connects the two symbols
    pub fn is_reachable(&self, source: &str, target: &str) -> bool {
        self.find_path(source, target).is_some()
    }

    /// Run BFS from `source_id`, returning the predecessor table once
    /// `target_id` is dequeued.
    fn search(&self, source_id: SymbolId, target_id: SymbolId) -> Option<Vec<Option<SymbolId>>> {
        let node_count = self.graph.symbol_count();
        let mut visited = vec![false; node_count];
        let mut predecessors: Vec<Option<SymbolId>> = vec![None; node_count];
        let mut queue = VecDeque::from([source_id]);
        visited[source_id] = true;

        while let Some(node) = queue.pop_front() {
            if node == target_id {
                return Some(predecessors);
            }

            let neighbors = match self.graph.neighbor_ids(node) {
                Ok(neighbors) => neighbors,
                Err(e) => {
                    tracing::warn!(node = node, error = %e, "Failed to read neighbors during search");
                    continue;
                }
            };

            for &next in neighbors {
                if !visited[next] {
                    visited[next] = true;
                    predecessors[next] = Some(node);
                    queue.push_back(next);
                }
            }
        }

        None
    }

    fn reconstruct(
        &self,
        predecessors: &[Option<SymbolId>],
        source_id: SymbolId,
        target_id: SymbolId,
    ) -> ConversionPath {
        let mut ids = vec![target_id];
        let mut current = target_id;
        while current != source_id {
            match predecessors[current] {
                Some(previous) => {
                    ids.push(previous);
                    current = previous;
                }
                None => break,
            }
        }
        ids.reverse();

        let symbols = ids
            .into_iter()
            .filter_map(|id| self.graph.get_symbol(id).ok())
            .map(|node| node.symbol().to_string())
            .collect();

        ConversionPath(symbols)
    }
}
