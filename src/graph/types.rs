//! Core types for the conversion graph.
//!
//! This module contains the fundamental types used throughout the graph system:
//! - Type aliases for symbols and their identifiers
//! - Symbol node and conversion edge representation
//! - Ticker resolution policy and outcome

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An asset ticker string such as `USD` or `XBT`
pub type Symbol = String;

/// Type alias for symbol identifiers within the graph
pub type SymbolId = usize;

/// Cost of traversing one edge. The graph encodes reachability, not price.
pub const HOP_WEIGHT: u32 = 1;

/// Represents an asset node in the conversion graph.
///
/// Neighbors are kept in insertion order so that traversals are reproducible.
#[derive(Debug, Clone)]
pub struct SymbolNode {
    symbol: Symbol,
    neighbors: Vec<SymbolId>,
}

impl SymbolNode {
    /// Create a new isolated node for the given symbol
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            neighbors: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Symbols directly reachable from this node, in insertion order
    pub fn neighbors(&self) -> &[SymbolId] {
        &self.neighbors
    }

    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Add a neighbor (internal use). Returns false if it was already present.
    pub(crate) fn add_neighbor(&mut self, symbol_id: SymbolId) -> bool {
        if self.neighbors.contains(&symbol_id) {
            return false;
        }
        self.neighbors.push(symbol_id);
        true
    }
}

/// An undirected edge created by one tradable ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionEdge {
    symbols: [SymbolId; 2],
    weight: u32,
    ticker: String,
}

impl ConversionEdge {
    pub fn new(symbols: [SymbolId; 2], ticker: String) -> Self {
        Self {
            symbols,
            weight: HOP_WEIGHT,
            ticker,
        }
    }

    pub fn symbols(&self) -> [SymbolId; 2] {
        self.symbols
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// The listed ticker that produced this edge
    pub fn ticker(&self) -> &str {
        &self.ticker
    }
}

/// How tickers are mapped onto symbol pairs while building the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TickerPolicy {
    /// A ticker is tradable iff exactly two known symbols occur in it as
    /// substrings. Anything else is dropped with a warning.
    #[default]
    Substring,
    /// A ticker is tradable iff it is exactly the concatenation of two
    /// distinct known symbols, with a single possible split.
    ExactSplit,
    /// Substring matching, but an unresolvable ticker fails the build.
    Strict,
}

impl TickerPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            TickerPolicy::Substring => "substring",
            TickerPolicy::ExactSplit => "exact-split",
            TickerPolicy::Strict => "strict",
        }
    }
}

impl fmt::Display for TickerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TickerPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(TickerPolicy::Substring),
            "exact-split" | "exact_split" => Ok(TickerPolicy::ExactSplit),
            "strict" => Ok(TickerPolicy::Strict),
            other => Err(format!(
                "unknown ticker policy '{}', expected one of: substring, exact-split, strict",
                other
            )),
        }
    }
}

/// Outcome of mapping one ticker onto the known symbol set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickerResolution {
    /// The ticker connects these two symbols
    Pair([Symbol; 2]),
    /// The ticker matched a number of symbols other than two
    Rejected { matched: Vec<Symbol> },
}

/// A ticker left out of the graph, with the symbols it matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedTicker {
    pub ticker: String,
    pub matched: Vec<Symbol>,
}
