//! Error handling for the conversion engine.
//!
//! Each component owns a focused error enum:
//!
//! - **`GraphError`**: conversion graph construction and lookups
//! - **`PathError`**: malformed conversion paths
//! - **`SettlementError`** / **`StoreError`**: balance debits, credits and persistence
//! - **`OracleError`** / **`DispatchError`**: price lookups and hop submission
//! - **`ConfigError`**: environment configuration
//!
//! `ConverterError` wraps all of them for library plumbing that can fail in
//! several ways, while `ConversionError` is the closed set of outcomes the
//! orchestrator hands back to API callers together with a [`FailureKind`].

pub mod config;
pub mod conversion;
pub mod dispatch;
pub mod graph;
pub mod path;
pub mod settlement;

pub use config::ConfigError;
pub use conversion::{ConversionError, FailureKind};
pub use dispatch::{DispatchError, OracleError};
pub use graph::GraphError;
pub use path::PathError;
pub use settlement::{SettlementError, StoreError};

/// Main result type for the library
pub type Result<T> = std::result::Result<T, ConverterError>;

/// Top-level error enum that encompasses all possible errors in the library.
#[derive(Debug, thiserror::Error)]
pub enum ConverterError {
    /// Error in conversion graph construction or lookups.
    #[error("Graph operation failed: {0}")]
    Graph(#[from] GraphError),

    /// Error in conversion path construction or validation.
    #[error("Path operation failed: {0}")]
    Path(#[from] PathError),

    /// Error while debiting, crediting or persisting balances.
    #[error("Settlement failed: {0}")]
    Settlement(#[from] SettlementError),

    /// Error reported by the balance store.
    #[error("Balance store error: {0}")]
    Store(#[from] StoreError),

    /// Error from the price oracle.
    #[error("Price oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// Error while handing a hop to the execution gateway.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Error in configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A conversion failed with one of the typed failure kinds.
    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// JSON serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error for cases not covered by specific error types.
    #[error("Generic error: {0}")]
    Other(#[from] anyhow::Error),
}
