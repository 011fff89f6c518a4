//! Conversion path errors.

/// Errors that can occur when constructing or validating a conversion path
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("Empty path: a conversion path needs at least one symbol")]
    EmptyPath,

    #[error("Invalid path: {from} and {to} are not directly convertible")]
    NotAdjacent { from: String, to: String },

    #[error("Invalid path: symbol {symbol} is not part of the graph")]
    UnknownSymbol { symbol: String },
}
