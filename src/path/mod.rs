//! Conversion paths and shortest-path search.
//!
//! A `ConversionPath` is an ordered list of symbols where consecutive symbols
//! are adjacent in the conversion graph. Paths are computed fresh for every
//! request by the [`PathFinder`] and never cached.

pub mod finder;

pub use finder::PathFinder;

use crate::errors::{PathError, Result};
use crate::graph::{ConversionGraph, Symbol};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Deref};

/// An ordered sequence of symbols from source to target.
///
/// A path with a single symbol is the trivial conversion of a symbol into
/// itself and has no hops.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct ConversionPath(Vec<Symbol>);

impl ConversionPath {
    /// Create a path from a symbol sequence.
    ///
    /// Adjacency is not checked here; see [`ConversionPath::validate`].
    ///
    /// # Errors
    ///
    /// Returns an error if `symbols` is empty
    pub fn new(symbols: Vec<Symbol>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(PathError::EmptyPath.into());
        }
        Ok(Self(symbols))
    }

    /// The single-symbol path used when source and target coincide
    pub fn trivial(symbol: &str) -> Self {
        Self(vec![symbol.to_string()])
    }

    pub fn source(&self) -> &str {
        &self.0[0]
    }

    pub fn target(&self) -> &str {
        &self.0[self.0.len() - 1]
    }

    /// Number of edges traversed
    pub fn hop_count(&self) -> usize {
        self.0.len() - 1
    }

    pub fn is_trivial(&self) -> bool {
        self.hop_count() == 0
    }

    /// Consecutive symbol pairs, one per hop
    pub fn hops(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0
            .iter()
            .map(String::as_str)
            .tuple_windows::<(&str, &str)>()
    }

    /// Ticker-style symbol for each hop: the two symbols concatenated in
    /// travel direction, e.g. `USDETH` for the hop USD to ETH.
    pub fn hop_symbols(&self) -> Vec<String> {
        self.hops().map(|(from, to)| format!("{}{}", from, to)).collect()
    }

    /// Check that every symbol is known and every hop is an edge of `graph`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first unknown symbol or non-adjacent hop
    pub fn validate(&self, graph: &ConversionGraph) -> Result<()> {
        if let Some(symbol) = self.0.iter().find(|s| !graph.contains(s)) {
            return Err(PathError::UnknownSymbol {
                symbol: symbol.clone(),
            }
            .into());
        }

        if let Some((from, to)) = self.hops().find(|(from, to)| !graph.are_adjacent(from, to)) {
            return Err(PathError::NotAdjacent {
                from: from.to_string(),
                to: to.to_string(),
            }
            .into());
        }

        Ok(())
    }

    pub fn into_symbols(self) -> Vec<Symbol> {
        self.0
    }
}

impl Deref for ConversionPath {
    type Target = [Symbol];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<Symbol>> for ConversionPath {
    type Error = PathError;

    fn try_from(symbols: Vec<Symbol>) -> std::result::Result<Self, Self::Error> {
        if symbols.is_empty() {
            return Err(PathError::EmptyPath);
        }
        Ok(Self(symbols))
    }
}

impl From<ConversionPath> for Vec<Symbol> {
    fn from(path: ConversionPath) -> Self {
        path.0
    }
}

impl fmt::Display for ConversionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" -> "))
    }
}

impl fmt::Debug for ConversionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionPath")
            .field("hops", &self.hop_count())
            .field("symbols", &self.0)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(symbols: &[&str]) -> ConversionPath {
        ConversionPath::new(symbols.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_path_basic_operations() {
        let p = path(&["USD", "ETH", "XBT"]);

        assert_eq!(p.source(), "USD");
        assert_eq!(p.target(), "XBT");
        assert_eq!(p.hop_count(), 2);
        assert!(!p.is_trivial());
        assert_eq!(p.hops().collect::<Vec<_>>(), vec![("USD", "ETH"), ("ETH", "XBT")]);
        assert_eq!(p.hop_symbols(), vec!["USDETH", "ETHXBT"]);
        assert_eq!(p.to_string(), "USD -> ETH -> XBT");
    }

    #[test]
    fn test_trivial_path() {
        let p = ConversionPath::trivial("USD");

        assert_eq!(p.len(), 1);
        assert!(p.is_trivial());
        assert_eq!(p.source(), p.target());
        assert!(p.hop_symbols().is_empty());
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(ConversionPath::new(Vec::new()).is_err());
        assert!(serde_json::from_str::<ConversionPath>("[]").is_err());
    }

    #[test]
    fn test_validate_against_graph() {
        let graph = ConversionGraph::build(&["ETHUSD", "ETHXBT"], &["USD", "ETH", "XBT"]).unwrap();

        assert!(path(&["USD", "ETH", "XBT"]).validate(&graph).is_ok());
        assert!(path(&["USD", "XBT"]).validate(&graph).is_err());
        assert!(path(&["USD", "SOL"]).validate(&graph).is_err());
    }

    #[test]
    fn test_path_serializes_as_symbol_list() {
        let p = path(&["USD", "ETH"]);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"["USD","ETH"]"#);
        let back: ConversionPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
