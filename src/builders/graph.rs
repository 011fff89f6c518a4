//! Builder pattern for ConversionGraph

use crate::config::ConversionConfig;
use crate::errors::Result;
use crate::graph::{ConversionGraph, Symbol, TickerPolicy};

/// Builder for creating ConversionGraph instances with a fluent API
#[derive(Debug, Clone, Default)]
pub struct ConversionGraphBuilder {
    symbols: Vec<Symbol>,
    tickers: Vec<String>,
    policy: TickerPolicy,
}

impl ConversionGraphBuilder {
    /// Create a new ConversionGraphBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the symbols, tickers and policy of a configuration
    pub fn from_config(config: &ConversionConfig) -> Self {
        Self {
            symbols: config.symbols.clone(),
            tickers: config.tickers.clone(),
            policy: config.ticker_policy,
        }
    }

    /// Add a symbol to the graph
    pub fn add_symbol(mut self, symbol: impl Into<Symbol>) -> Self {
        self.symbols.push(symbol.into());
        self
    }

    /// Add multiple symbols to the graph
    pub fn add_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.symbols.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Add a ticker to resolve into an edge
    pub fn add_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.tickers.push(ticker.into());
        self
    }

    /// Add multiple tickers
    pub fn add_tickers<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tickers.extend(tickers.into_iter().map(Into::into));
        self
    }

    /// Set the ticker resolution policy
    pub fn policy(mut self, policy: TickerPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the ConversionGraph
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol set is empty or invalid, or if a
    /// ticker cannot be resolved under the `Strict` policy
    pub fn build(self) -> Result<ConversionGraph> {
        ConversionGraph::build_with_policy(&self.tickers, &self.symbols, self.policy)
    }
}
