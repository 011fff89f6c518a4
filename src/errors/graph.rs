//! Conversion graph construction errors.

/// Errors that can occur while building or querying the conversion graph
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Symbol not found in graph: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("Invalid symbol index: {index}")]
    InvalidSymbolIndex { index: usize },

    #[error("Invalid symbol {symbol:?}: symbols must be non-empty upper-case ASCII alphanumerics")]
    InvalidSymbol { symbol: String },

    #[error("Cannot connect symbol {symbol} to itself")]
    SelfLoop { symbol: String },

    #[error("Ticker {ticker} cannot be resolved: expected 2 symbols, matched {matched:?}")]
    UnresolvableTicker { ticker: String, matched: Vec<String> },

    #[error("Empty symbol set: no symbols available")]
    EmptySymbolSet,
}
