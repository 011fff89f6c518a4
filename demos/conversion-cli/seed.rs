//! Starting balances and prices for the in-memory adapters.

use anyhow::Context;
use asset_conversion_engine::adapters::{InMemoryBalanceStore, InMemoryPriceOracle, PriceQuote};
use asset_conversion_engine::errors::Result;
use asset_conversion_engine::{BalancePool, BalanceSnapshot};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;

/// Seed file layout:
///
/// ```json
/// {
///   "balances": { "primary_exchange": { "USD": "5" }, "self_custody": { "USD": "10" } },
///   "prices": { "USD": { "price": "1", "spreadPrice": "1" } }
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub balances: BTreeMap<BalancePool, BTreeMap<String, Decimal>>,
    #[serde(default)]
    pub prices: HashMap<String, PriceQuote>,
}

impl Seed {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// USD 5 on the exchange, USD 10 in self custody, and a price for every default symbol
    pub fn builtin() -> Result<Self> {
        let mut balances = BTreeMap::new();
        balances.insert(BalancePool::PrimaryExchange, BTreeMap::from([("USD".to_string(), Decimal::from(5))]));
        balances.insert(BalancePool::SelfCustody, BTreeMap::from([("USD".to_string(), Decimal::from(10))]));

        let table = [
            ("USD", "1", "1"),
            ("USDC", "0.9998", "1.0002"),
            ("USDT", "0.9997", "1.0003"),
            ("XBT", "41250.5", "41310.2"),
            ("XDG", "0.0812", "0.0815"),
            ("ETH", "2250.75", "2253.1"),
            ("SOL", "98.4", "98.6"),
            ("LTC", "71.2", "71.35"),
        ];

        let mut prices = HashMap::new();
        for (symbol, price, spread) in table {
            let quote = PriceQuote::new(
                Decimal::from_str(price).context("Invalid builtin price")?,
                Decimal::from_str(spread).context("Invalid builtin spread price")?,
            );
            prices.insert(symbol.to_string(), quote);
        }

        Ok(Self { balances, prices })
    }

    pub async fn apply(self, user: &str, store: &InMemoryBalanceStore, oracle: &InMemoryPriceOracle) {
        let mut snapshot = BalanceSnapshot::new();
        for (pool, entries) in self.balances {
            for (symbol, amount) in entries {
                snapshot.set_balance(pool, &symbol, amount);
            }
        }
        store.seed(user, snapshot).await;

        for (symbol, quote) in self.prices {
            oracle.set_price(&symbol, quote).await;
        }
    }
}
