//! Core conversion graph implementation.
//!
//! This module contains the `ConversionGraph` struct: an undirected graph
//! over asset symbols where an edge exists iff a tradable ticker connects
//! the two symbols.

use super::types::{
    ConversionEdge, RejectedTicker, Symbol, SymbolId, SymbolNode, TickerPolicy, TickerResolution,
};
use crate::errors::{GraphError, Result};
use std::collections::HashMap;

/// Undirected conversion graph over asset symbols.
///
/// The graph is built in one go from a ticker list and a symbol list and is
/// read-only afterwards; a refresh builds a new graph instead of mutating
/// this one. Every configured symbol is a node, even when no ticker touches
/// it, so that "known but unreachable" and "unknown" stay distinguishable.
#[derive(Debug, Clone, Default)]
pub struct ConversionGraph {
    /// All symbol nodes, indexed by `SymbolId`
    nodes: Vec<SymbolNode>,
    /// All undirected edges, one per connected symbol pair
    edges: Vec<ConversionEdge>,
    /// Mapping from symbol to node id for fast lookup
    symbol_to_id: HashMap<Symbol, SymbolId>,
    /// Mapping from (ordered) node pair to edge index, stored in both orders
    pair_to_edge: HashMap<[SymbolId; 2], usize>,
    /// Tickers that produced (or re-confirmed) an edge, in input order
    tradable_tickers: Vec<String>,
    /// Tickers dropped during the build
    rejected_tickers: Vec<RejectedTicker>,
    policy: TickerPolicy,
}

impl ConversionGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // ================================
    // Construction Methods
    // ================================

    /// Build a graph from a ticker list and a symbol list.
    ///
    /// Every ticker matching exactly two symbols as substrings becomes an
    /// edge in both directions; all other tickers are dropped (and logged).
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol list is empty or contains an invalid symbol
    pub fn build<T, S>(tickers: &[T], symbols: &[S]) -> Result<Self>
    where
        T: AsRef<str>,
        S: AsRef<str>,
    {
        Self::build_with_policy(tickers, symbols, TickerPolicy::Substring)
    }

    /// Build a graph using an explicit ticker resolution policy.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The symbol list is empty or contains an invalid symbol
    /// - The policy is `Strict` and a ticker does not resolve to exactly two symbols
    pub fn build_with_policy<T, S>(tickers: &[T], symbols: &[S], policy: TickerPolicy) -> Result<Self>
    where
        T: AsRef<str>,
        S: AsRef<str>,
    {
        if symbols.is_empty() {
            return Err(GraphError::EmptySymbolSet.into());
        }

        let mut graph = Self {
            policy,
            ..Self::default()
        };

        for symbol in symbols {
            graph.add_symbol(symbol.as_ref())?;
        }

        let known: Vec<Symbol> = graph.nodes.iter().map(|n| n.symbol().to_string()).collect();

        for ticker in tickers {
            let ticker = ticker.as_ref().trim();
            match Self::resolve_ticker(ticker, &known, policy) {
                TickerResolution::Pair([src, dst]) => {
                    let src_id = graph.find_symbol_id(&src)?;
                    let dst_id = graph.find_symbol_id(&dst)?;
                    graph.connect([src_id, dst_id], ticker)?;
                    graph.tradable_tickers.push(ticker.to_string());
                }
                TickerResolution::Rejected { matched } => {
                    if policy == TickerPolicy::Strict {
                        tracing::error!(
                            ticker = ticker,
                            matched = ?matched,
                            "Unresolvable ticker under strict policy"
                        );
                        return Err(GraphError::UnresolvableTicker {
                            ticker: ticker.to_string(),
                            matched,
                        }
                        .into());
                    }

                    tracing::warn!(
                        ticker = ticker,
                        matched = ?matched,
                        policy = %policy,
                        "Ticker does not resolve to exactly two symbols, excluding it from the graph"
                    );
                    graph.rejected_tickers.push(RejectedTicker {
                        ticker: ticker.to_string(),
                        matched,
                    });
                }
            }
        }

        tracing::info!(
            symbols = graph.symbol_count(),
            edges = graph.edge_count(),
            tradable_tickers = graph.tradable_tickers.len(),
            rejected_tickers = graph.rejected_tickers.len(),
            policy = %policy,
            "Conversion graph built"
        );

        Ok(graph)
    }

    /// Map a ticker onto the known symbols according to `policy`.
    ///
    /// For the substring policies the matched symbols are reported in the
    /// order of `symbols`.
    pub fn resolve_ticker<S: AsRef<str>>(ticker: &str, symbols: &[S], policy: TickerPolicy) -> TickerResolution {
        match policy {
            TickerPolicy::Substring | TickerPolicy::Strict => {
                let matched: Vec<Symbol> = symbols
                    .iter()
                    .map(AsRef::as_ref)
                    .filter(|symbol| ticker.contains(*symbol))
                    .map(str::to_string)
                    .collect();

                if matched.len() == 2 {
                    TickerResolution::Pair([matched[0].clone(), matched[1].clone()])
                } else {
                    TickerResolution::Rejected { matched }
                }
            }
            TickerPolicy::ExactSplit => {
                let splits: Vec<[Symbol; 2]> = symbols
                    .iter()
                    .map(AsRef::as_ref)
                    .filter_map(|prefix| {
                        let rest = ticker.strip_prefix(prefix)?;
                        let is_known = symbols.iter().any(|s| s.as_ref() == rest);
                        (is_known && rest != prefix).then(|| [prefix.to_string(), rest.to_string()])
                    })
                    .collect();

                match splits.as_slice() {
                    [pair] => TickerResolution::Pair(pair.clone()),
                    _ => TickerResolution::Rejected {
                        matched: splits.into_iter().flatten().collect(),
                    },
                }
            }
        }
    }

    /// Add a symbol node, returning the existing id if already present.
    pub(crate) fn add_symbol(&mut self, symbol: &str) -> Result<SymbolId> {
        let symbol = symbol.trim();
        if !Self::is_valid_symbol(symbol) {
            return Err(GraphError::InvalidSymbol {
                symbol: symbol.to_string(),
            }
            .into());
        }

        if let Some(&existing_id) = self.symbol_to_id.get(symbol) {
            return Ok(existing_id);
        }

        let symbol_id = self.nodes.len();
        self.nodes.push(SymbolNode::new(symbol.to_string()));
        self.symbol_to_id.insert(symbol.to_string(), symbol_id);
        Ok(symbol_id)
    }

    /// Connect two symbols in both directions.
    ///
    /// Re-connecting an already connected pair is a no-op and returns `false`;
    /// the edge keeps the ticker that created it first.
    pub(crate) fn connect(&mut self, symbol_ids: [SymbolId; 2], ticker: &str) -> Result<bool> {
        for &symbol_id in &symbol_ids {
            if symbol_id >= self.nodes.len() {
                return Err(GraphError::InvalidSymbolIndex { index: symbol_id }.into());
            }
        }

        let [src, dst] = symbol_ids;
        if src == dst {
            return Err(GraphError::SelfLoop {
                symbol: self.nodes[src].symbol().to_string(),
            }
            .into());
        }

        if self.pair_to_edge.contains_key(&symbol_ids) {
            tracing::trace!(ticker = ticker, "Symbols already connected, skipping duplicate edge");
            return Ok(false);
        }

        let edge_index = self.edges.len();
        self.edges.push(ConversionEdge::new(symbol_ids, ticker.to_string()));
        self.pair_to_edge.insert([src, dst], edge_index);
        self.pair_to_edge.insert([dst, src], edge_index);
        self.nodes[src].add_neighbor(dst);
        self.nodes[dst].add_neighbor(src);

        tracing::debug!(
            ticker = ticker,
            src = self.nodes[src].symbol(),
            dst = self.nodes[dst].symbol(),
            "Edge added to conversion graph"
        );

        Ok(true)
    }

    // ================================
    // Query Methods
    // ================================

    /// Get the total number of symbols in the graph
    pub fn symbol_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of undirected edges in the graph
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `symbol` is a known symbol of this graph
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbol_to_id.contains_key(symbol)
    }

    /// Find the node id for a symbol
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol is not part of the graph
    pub fn find_symbol_id(&self, symbol: &str) -> Result<SymbolId> {
        self.symbol_to_id.get(symbol).copied().ok_or_else(|| {
            GraphError::SymbolNotFound {
                symbol: symbol.to_string(),
            }
            .into()
        })
    }

    /// Get a symbol node by its id
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid
    pub fn get_symbol(&self, symbol_id: SymbolId) -> Result<&SymbolNode> {
        self.nodes
            .get(symbol_id)
            .ok_or_else(|| GraphError::InvalidSymbolIndex { index: symbol_id }.into())
    }

    /// All known symbols in configuration order
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(SymbolNode::symbol)
    }

    /// All edges of the graph
    pub fn edges(&self) -> &[ConversionEdge] {
        &self.edges
    }

    /// Tickers that resolved to a symbol pair
    pub fn tradable_tickers(&self) -> &[String] {
        &self.tradable_tickers
    }

    /// Tickers dropped while building the graph
    pub fn rejected_tickers(&self) -> &[RejectedTicker] {
        &self.rejected_tickers
    }

    pub fn policy(&self) -> TickerPolicy {
        self.policy
    }

    // ================================
    // Navigation Methods
    // ================================

    /// Symbols directly reachable from `symbol`, in insertion order.
    ///
    /// Unknown and isolated symbols both yield an empty list.
    pub fn neighbors(&self, symbol: &str) -> Vec<&str> {
        match self.symbol_to_id.get(symbol) {
            Some(&id) => self.nodes[id]
                .neighbors()
                .iter()
                .map(|&n| self.nodes[n].symbol())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Neighbor ids of a node
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid
    pub fn neighbor_ids(&self, symbol_id: SymbolId) -> Result<&[SymbolId]> {
        Ok(self.get_symbol(symbol_id)?.neighbors())
    }

    /// Weight of the edge between two symbols, if they are adjacent
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<u32> {
        self.edge_between(a, b).map(ConversionEdge::weight)
    }

    /// Listed ticker connecting two symbols, if they are adjacent
    pub fn ticker_between(&self, a: &str, b: &str) -> Option<&str> {
        self.edge_between(a, b).map(ConversionEdge::ticker)
    }

    pub fn are_adjacent(&self, a: &str, b: &str) -> bool {
        self.edge_between(a, b).is_some()
    }

    // ================================
    // Private Helper Methods
    // ================================

    fn edge_between(&self, a: &str, b: &str) -> Option<&ConversionEdge> {
        let a = *self.symbol_to_id.get(a)?;
        let b = *self.symbol_to_id.get(b)?;
        self.pair_to_edge.get(&[a, b]).map(|&index| &self.edges[index])
    }

    fn is_valid_symbol(symbol: &str) -> bool {
        !symbol.is_empty()
            && symbol
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    }
}
