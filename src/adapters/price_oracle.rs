//! Price oracle contract and a settable in-memory quote table.

use crate::errors::OracleError;
use crate::graph::Symbol;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Current market and spread price of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub price: Decimal,
    pub spread_price: Decimal,
}

impl PriceQuote {
    pub fn new(price: Decimal, spread_price: Decimal) -> Self {
        Self { price, spread_price }
    }
}

/// Source of live prices.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Quote for `symbol`, or `OracleError::NotAvailable` when there is none
    async fn get_price(&self, symbol: &str) -> Result<PriceQuote, OracleError>;
}

#[derive(Debug, Default)]
pub struct InMemoryPriceOracle {
    quotes: RwLock<HashMap<Symbol, PriceQuote>>,
}

impl InMemoryPriceOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quotes<I>(quotes: I) -> Self
    where
        I: IntoIterator<Item = (Symbol, PriceQuote)>,
    {
        Self {
            quotes: RwLock::new(quotes.into_iter().collect()),
        }
    }

    pub async fn set_price(&self, symbol: &str, quote: PriceQuote) {
        self.quotes.write().await.insert(symbol.to_string(), quote);
    }

    pub async fn remove_price(&self, symbol: &str) -> Option<PriceQuote> {
        self.quotes.write().await.remove(symbol)
    }
}

#[async_trait]
impl PriceOracle for InMemoryPriceOracle {
    async fn get_price(&self, symbol: &str) -> Result<PriceQuote, OracleError> {
        self.quotes
            .read()
            .await
            .get(symbol)
            .copied()
            .ok_or_else(|| OracleError::NotAvailable {
                symbol: symbol.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_quotes_can_be_set_and_removed() {
        let oracle = InMemoryPriceOracle::with_quotes([("USD".to_string(), PriceQuote::new(dec!(1), dec!(1)))]);
        oracle.set_price("XBT", PriceQuote::new(dec!(41250.5), dec!(41300))).await;

        assert_eq!(oracle.get_price("XBT").await.unwrap().price, dec!(41250.5));
        assert!(oracle.get_price("USD").await.is_ok());

        oracle.remove_price("XBT").await;
        assert_eq!(
            oracle.get_price("XBT").await.unwrap_err(),
            OracleError::NotAvailable {
                symbol: "XBT".to_string()
            }
        );
    }
}
