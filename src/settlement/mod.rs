//! Balance settlement for a single conversion.
//!
//! Settlement is a read-modify-write cycle against the balance store:
//!
//! 1. Read the user's snapshot (both pools, all symbols) with its version
//! 2. Debit the source symbol, PrimaryExchange before SelfCustody
//! 3. Credit the destination symbol into PrimaryExchange
//! 4. Write the whole snapshot back, conditional on the version read in step 1
//!
//! All arithmetic happens on an in-memory copy, so an insufficient balance
//! fails before the store is written. A version conflict means another
//! settlement for the same user committed in between; the cycle is re-run
//! on fresh balances up to the configured number of attempts.

pub mod ledger;
pub mod types;

pub use types::{BalancePool, BalanceSnapshot, ConversionRequest, PoolDebit, SettlementReceipt};

use crate::adapters::BalanceStore;
use crate::errors::{SettlementError, StoreError};
use crate::utils::{parse_non_negative_amount, parse_positive_amount, DEBIT_SCALE};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Result type for settlement operations
pub type SettlementResult<T> = std::result::Result<T, SettlementError>;

/// Default number of read-modify-write attempts per settlement
pub const DEFAULT_SETTLEMENT_ATTEMPTS: u32 = 3;

/// Debits and credits user balances through a [`BalanceStore`].
#[derive(Clone)]
pub struct BalanceSettlement {
    store: Arc<dyn BalanceStore>,
    max_attempts: u32,
}

impl BalanceSettlement {
    /// Create a settlement service. `max_attempts` below one is treated as one.
    pub fn new(store: Arc<dyn BalanceStore>, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn store(&self) -> &Arc<dyn BalanceStore> {
        &self.store
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Settle one conversion request against the user's balances.
    ///
    /// Symbols are not checked against the graph here; the orchestrator
    /// does that before calling in.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `from_amount` is not a positive decimal with at most eight places,
    ///   or `to_amount` is not a non-negative decimal
    /// - The user's combined balance of `from_symbol` is below `from_amount`
    /// - The store fails, or keeps reporting version conflicts after
    ///   `max_attempts` tries
    ///
    /// In every error case nothing has been persisted.
    pub async fn settle(&self, request: &ConversionRequest) -> SettlementResult<SettlementReceipt> {
        let from_amount = Self::parse_debit_amount(&request.from_amount)?;
        let to_amount = parse_non_negative_amount(&request.to_amount)?;

        let mut attempt = 0;
        loop {
            attempt += 1;

            let snapshot = self.store.get_balances(&request.user_id).await.map_err(|e| {
                tracing::error!(
                    user_id = %request.user_id,
                    store = self.store.name(),
                    error = %e,
                    "Failed to load balances"
                );
                SettlementError::from(e)
            })?;
            let expected_version = snapshot.version();

            let mut updated = snapshot;
            let debits = match ledger::debit(&mut updated, &request.from_symbol, from_amount) {
                Ok(debits) => debits,
                Err(e) => {
                    tracing::info!(
                        user_id = %request.user_id,
                        symbol = %request.from_symbol,
                        requested = %from_amount,
                        error = %e,
                        "Settlement rejected"
                    );
                    return Err(e);
                }
            };
            ledger::credit(&mut updated, &request.to_symbol, to_amount)?;

            match self
                .store
                .put_balances(&request.user_id, &updated, expected_version)
                .await
            {
                Ok(version) => {
                    tracing::info!(
                        user_id = %request.user_id,
                        from_symbol = %request.from_symbol,
                        to_symbol = %request.to_symbol,
                        debited = %from_amount,
                        credited = %to_amount,
                        pools = debits.len(),
                        version = version,
                        attempt = attempt,
                        "Settlement committed"
                    );

                    return Ok(SettlementReceipt {
                        user_id: request.user_id.clone(),
                        from_symbol: request.from_symbol.clone(),
                        to_symbol: request.to_symbol.clone(),
                        debited: from_amount,
                        debits,
                        credited: to_amount,
                        version,
                        attempts: attempt,
                    });
                }
                Err(conflict @ StoreError::VersionConflict { .. }) => {
                    if attempt >= self.max_attempts {
                        tracing::error!(
                            user_id = %request.user_id,
                            attempts = attempt,
                            error = %conflict,
                            "Settlement attempts exhausted"
                        );
                        return Err(SettlementError::AttemptsExhausted {
                            user_id: request.user_id.clone(),
                            attempts: attempt,
                            source: conflict,
                        });
                    }

                    tracing::warn!(
                        user_id = %request.user_id,
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        error = %conflict,
                        "Balance snapshot changed concurrently, retrying settlement"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        user_id = %request.user_id,
                        store = self.store.name(),
                        error = %e,
                        "Failed to persist balances"
                    );
                    return Err(e.into());
                }
            }
        }
    }

    /// Parse a debit amount: a positive decimal with at most eight places.
    ///
    /// # Errors
    ///
    /// Returns `SettlementError::InvalidAmount` for anything else
    pub fn parse_debit_amount(value: &str) -> SettlementResult<Decimal> {
        let amount = parse_positive_amount(value)?;
        if amount.normalize().scale() > DEBIT_SCALE {
            return Err(SettlementError::InvalidAmount {
                value: value.to_string(),
                reason: format!("at most {} decimal places are supported", DEBIT_SCALE),
            });
        }
        Ok(amount)
    }
}

impl std::fmt::Debug for BalanceSettlement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalanceSettlement")
            .field("store", &self.store.name())
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}
