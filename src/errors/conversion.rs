//! Typed conversion failures returned to callers of the orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{OracleError, SettlementError, StoreError};

/// Machine-readable failure kind attached to every failed conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    PriceUnavailable,
    InsufficientFunds,
    StoreFailure,
    GatewayTimeout,
    UnknownSymbol,
    NoRoute,
    InvalidAmount,
}

impl FailureKind {
    /// Whether the same request may be submitted again unchanged.
    ///
    /// Nothing is persisted for a store failure and a timeout says nothing
    /// about the request itself. Every other kind needs different inputs.
    pub fn is_retryable(self) -> bool {
        matches!(self, FailureKind::StoreFailure | FailureKind::GatewayTimeout)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::PriceUnavailable => "PRICE_UNAVAILABLE",
            FailureKind::InsufficientFunds => "INSUFFICIENT_FUNDS",
            FailureKind::StoreFailure => "STORE_FAILURE",
            FailureKind::GatewayTimeout => "GATEWAY_TIMEOUT",
            FailureKind::UnknownSymbol => "UNKNOWN_SYMBOL",
            FailureKind::NoRoute => "NO_ROUTE",
            FailureKind::InvalidAmount => "INVALID_AMOUNT",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single `convert` call.
///
/// Every variant maps onto exactly one [`FailureKind`]. The orchestrator never
/// surfaces anything else to its callers.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Price data not available for symbol {symbol}")]
    PriceUnavailable { symbol: String },

    #[error("Insufficient {symbol} funds for conversion: requested {requested}, available {available}")]
    InsufficientFunds {
        symbol: String,
        requested: String,
        available: String,
    },

    #[error("Balance store failure: {reason}")]
    StoreFailure { reason: String },

    #[error("{operation} timed out after {timeout_ms}ms")]
    GatewayTimeout { operation: String, timeout_ms: u64 },

    #[error("Unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("No conversion route from {from} to {to}")]
    NoRoute { from: String, to: String },

    #[error("Invalid amount {value:?}: {reason}")]
    InvalidAmount { value: String, reason: String },
}

impl ConversionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ConversionError::PriceUnavailable { .. } => FailureKind::PriceUnavailable,
            ConversionError::InsufficientFunds { .. } => FailureKind::InsufficientFunds,
            ConversionError::StoreFailure { .. } => FailureKind::StoreFailure,
            ConversionError::GatewayTimeout { .. } => FailureKind::GatewayTimeout,
            ConversionError::UnknownSymbol { .. } => FailureKind::UnknownSymbol,
            ConversionError::NoRoute { .. } => FailureKind::NoRoute,
            ConversionError::InvalidAmount { .. } => FailureKind::InvalidAmount,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

impl From<SettlementError> for ConversionError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::InsufficientFunds {
                symbol,
                requested,
                available,
            } => ConversionError::InsufficientFunds {
                symbol,
                requested: requested.to_string(),
                available: available.to_string(),
            },
            SettlementError::InvalidAmount { value, reason } => {
                ConversionError::InvalidAmount { value, reason }
            }
            err @ SettlementError::AttemptsExhausted { .. } => ConversionError::StoreFailure {
                reason: err.to_string(),
            },
            SettlementError::Store(store_err) => store_err.into(),
        }
    }
}

impl From<StoreError> for ConversionError {
    fn from(err: StoreError) -> Self {
        ConversionError::StoreFailure {
            reason: err.to_string(),
        }
    }
}

impl From<OracleError> for ConversionError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::NotAvailable { symbol } => ConversionError::PriceUnavailable { symbol },
            OracleError::Timeout { symbol, timeout_ms } => ConversionError::GatewayTimeout {
                operation: format!("Price request for {}", symbol),
                timeout_ms,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_only_store_and_timeout_are_retryable() {
        let retryable: Vec<_> = [
            FailureKind::PriceUnavailable,
            FailureKind::InsufficientFunds,
            FailureKind::StoreFailure,
            FailureKind::GatewayTimeout,
            FailureKind::UnknownSymbol,
            FailureKind::NoRoute,
            FailureKind::InvalidAmount,
        ]
        .into_iter()
        .filter(|kind| kind.is_retryable())
        .collect();

        assert_eq!(retryable, vec![FailureKind::StoreFailure, FailureKind::GatewayTimeout]);
    }

    #[test]
    fn test_failure_kind_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&FailureKind::InsufficientFunds).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_FUNDS\"");
        assert_eq!(FailureKind::NoRoute.to_string(), "NO_ROUTE");
    }

    #[test]
    fn test_settlement_errors_map_to_kinds() {
        let insufficient: ConversionError = SettlementError::InsufficientFunds {
            symbol: "USD".to_string(),
            requested: dec!(20),
            available: dec!(15),
        }
        .into();
        assert_eq!(insufficient.kind(), FailureKind::InsufficientFunds);

        let exhausted: ConversionError = SettlementError::AttemptsExhausted {
            user_id: "u1".to_string(),
            attempts: 3,
            source: StoreError::VersionConflict {
                user_id: "u1".to_string(),
                expected: 1,
                actual: 2,
            },
        }
        .into();
        assert_eq!(exhausted.kind(), FailureKind::StoreFailure);

        let unavailable: ConversionError = SettlementError::Store(StoreError::Unavailable {
            reason: "down".to_string(),
        })
        .into();
        assert_eq!(unavailable.kind(), FailureKind::StoreFailure);
    }

    #[test]
    fn test_oracle_timeout_maps_to_gateway_timeout() {
        let err: ConversionError = OracleError::Timeout {
            symbol: "XBT".to_string(),
            timeout_ms: 10,
        }
        .into();
        assert_eq!(err.kind(), FailureKind::GatewayTimeout);
        assert!(err.to_string().contains("XBT"));
    }
}
