//! Balance and settlement data types.

use crate::graph::Symbol;
use crate::utils::format_debit_amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A custody location holding a user's funds.
///
/// Variant order is settlement priority: `PrimaryExchange` is drained first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalancePool {
    PrimaryExchange,
    SelfCustody,
}

impl BalancePool {
    /// Pools in the order a debit drains them
    pub const DRAIN_ORDER: [BalancePool; 2] = [BalancePool::PrimaryExchange, BalancePool::SelfCustody];

    /// Pool that receives every credit
    pub const CREDIT_POOL: BalancePool = BalancePool::PrimaryExchange;

    pub fn as_str(self) -> &'static str {
        match self {
            BalancePool::PrimaryExchange => "primary_exchange",
            BalancePool::SelfCustody => "self_custody",
        }
    }
}

impl fmt::Display for BalancePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A user's complete balance state as read from, or written to, the store.
///
/// `version` is the store version the snapshot was read at. Symbols without
/// an entry read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    version: u64,
    pools: BTreeMap<BalancePool, BTreeMap<Symbol, Decimal>>,
}

impl BalanceSnapshot {
    /// An empty snapshot at version 0, the state of a user with no balances
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter used when seeding balances
    pub fn with_balance(mut self, pool: BalancePool, symbol: &str, amount: Decimal) -> Self {
        self.set_balance(pool, symbol, amount);
        self
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Balance of `symbol` in `pool`, zero when there is no entry
    pub fn balance(&self, pool: BalancePool, symbol: &str) -> Decimal {
        self.entry(pool, symbol).unwrap_or(Decimal::ZERO)
    }

    /// Stored entry, distinguishing "no entry" from an explicit zero
    pub fn entry(&self, pool: BalancePool, symbol: &str) -> Option<Decimal> {
        self.pools.get(&pool).and_then(|balances| balances.get(symbol)).copied()
    }

    pub fn set_balance(&mut self, pool: BalancePool, symbol: &str, amount: Decimal) {
        self.pools.entry(pool).or_default().insert(symbol.to_string(), amount);
    }

    /// Sum of `symbol` over both pools
    pub fn total(&self, symbol: &str) -> Decimal {
        BalancePool::DRAIN_ORDER
            .iter()
            .map(|&pool| self.balance(pool, symbol))
            .sum()
    }

    /// All entries of one pool, keyed by symbol
    pub fn pool(&self, pool: BalancePool) -> Option<&BTreeMap<Symbol, Decimal>> {
        self.pools.get(&pool)
    }

    pub fn is_empty(&self) -> bool {
        self.pools.values().all(BTreeMap::is_empty)
    }
}

/// A request to convert `from_amount` of one symbol into `to_amount` of another.
///
/// Amounts are decimal strings as received from the caller; they are parsed
/// and validated during settlement. `to_amount` is the amount the caller
/// expects to receive and is credited as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub user_id: String,
    pub from_symbol: Symbol,
    pub to_symbol: Symbol,
    pub from_amount: String,
    pub to_amount: String,
}

impl ConversionRequest {
    pub fn new(
        user_id: impl Into<String>,
        from_symbol: impl Into<Symbol>,
        to_symbol: impl Into<Symbol>,
        from_amount: impl Into<String>,
        to_amount: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            from_symbol: from_symbol.into(),
            to_symbol: to_symbol.into(),
            from_amount: from_amount.into(),
            to_amount: to_amount.into(),
        }
    }
}

/// Amount taken from one pool during a debit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDebit {
    pub pool: BalancePool,
    pub amount: Decimal,
    /// Pool balance after the debit, with at least eight decimal places
    pub remaining_balance: Decimal,
}

impl fmt::Display for PoolDebit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -{} (left {})",
            self.pool,
            format_debit_amount(self.amount),
            format_debit_amount(self.remaining_balance)
        )
    }
}

/// Outcome of a committed settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReceipt {
    pub user_id: String,
    pub from_symbol: Symbol,
    pub to_symbol: Symbol,
    pub debited: Decimal,
    /// Per-pool debits in drain order; pools that gave nothing are omitted
    pub debits: Vec<PoolDebit>,
    pub credited: Decimal,
    /// Store version the new snapshot was committed at
    pub version: u64,
    /// Number of read-modify-write attempts used
    pub attempts: u32,
}
