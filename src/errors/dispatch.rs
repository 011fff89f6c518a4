//! Price oracle and execution gateway errors.

/// Errors returned by a price oracle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("Price not available for symbol {symbol}")]
    NotAvailable { symbol: String },

    #[error("Price request for {symbol} timed out after {timeout_ms}ms")]
    Timeout { symbol: String, timeout_ms: u64 },
}

/// Errors that can occur while submitting a hop to the execution gateway
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("Gateway rejected hop {symbol}: {reason}")]
    Rejected { symbol: String, reason: String },

    #[error("Hop task for {symbol} terminated abnormally: {reason}")]
    TaskFailed { symbol: String, reason: String },
}
