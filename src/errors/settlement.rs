//! Balance settlement and balance store errors.

use rust_decimal::Decimal;

/// Errors reported by a balance store implementation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Balance snapshot for user {user_id} changed: expected version {expected}, found {actual}")]
    VersionConflict {
        user_id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Balance store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Errors that can occur while settling a conversion against user balances
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    #[error("Insufficient {symbol} funds: requested {requested}, available {available}")]
    InsufficientFunds {
        symbol: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Invalid amount {value:?}: {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("Settlement for user {user_id} gave up after {attempts} attempts: {source}")]
    AttemptsExhausted {
        user_id: String,
        attempts: u32,
        #[source]
        source: StoreError,
    },

    #[error("Balance store failure: {0}")]
    Store(#[from] StoreError),
}
