//! Configuration management for the conversion engine.
//!
//! Defaults describe the production listing; every value can be overridden
//! from the environment. Values are validated on load so that a bad
//! deployment fails at startup rather than on the first conversion.

use crate::errors::{ConfigError, Result};
use crate::graph::{Symbol, TickerPolicy};
use crate::settlement::DEFAULT_SETTLEMENT_ATTEMPTS;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Symbols known to the engine when none are configured
pub const DEFAULT_SYMBOLS: [&str; 8] = ["USD", "USDC", "USDT", "XBT", "XDG", "ETH", "SOL", "LTC"];

/// Tickers listed on the primary venue when none are configured
pub const DEFAULT_TICKERS: [&str; 14] = [
    "ETHUSDC", "ETHUSDT", "LTCETH", "LTCUSDT", "SOLETH", "SOLUSD", "SOLUSDT", "SOLXBT", "USDCUSD",
    "USDCUSDT", "XBTUSDC", "XBTUSDT", "XDGUSD", "XDGUSDT",
];

pub const DEFAULT_ORACLE_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_GATEWAY_TIMEOUT_MS: u64 = 5000;

/// Upper bound for `max_settlement_attempts`
pub const MAX_SETTLEMENT_ATTEMPTS: u32 = 10;

/// Main configuration structure for the conversion engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Known asset symbols, in the order ticker matches are reported
    pub symbols: Vec<Symbol>,
    /// Tradable pair identifiers used to build the conversion graph
    pub tickers: Vec<String>,
    /// How tickers are resolved into symbol pairs
    pub ticker_policy: TickerPolicy,
    /// Bound on one price oracle call
    pub oracle_timeout_ms: u64,
    /// Bound on one execution gateway call
    pub gateway_timeout_ms: u64,
    /// Read-modify-write attempts per settlement before giving up on conflicts
    pub max_settlement_attempts: u32,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            tickers: DEFAULT_TICKERS.iter().map(|s| s.to_string()).collect(),
            ticker_policy: TickerPolicy::default(),
            oracle_timeout_ms: DEFAULT_ORACLE_TIMEOUT_MS,
            gateway_timeout_ms: DEFAULT_GATEWAY_TIMEOUT_MS,
            max_settlement_attempts: DEFAULT_SETTLEMENT_ATTEMPTS,
        }
    }
}

impl ConversionConfig {
    /// Create a new configuration from environment variables
    ///
    /// # Environment Variables
    ///
    /// All optional:
    /// - `CONVERTER_SYMBOLS`: comma-separated symbols (default: the production listing)
    /// - `CONVERTER_TICKERS`: comma-separated tickers (default: the production listing)
    /// - `CONVERTER_TICKER_POLICY`: `substring`, `exact-split` or `strict` (default: substring)
    /// - `CONVERTER_ORACLE_TIMEOUT_MS`: price oracle timeout (default: 2000)
    /// - `CONVERTER_GATEWAY_TIMEOUT_MS`: execution gateway timeout (default: 5000)
    /// - `CONVERTER_SETTLEMENT_ATTEMPTS`: settlement attempts, 1 to 10 (default: 3)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A variable is set but cannot be parsed
    /// - The resulting configuration fails [`ConversionConfig::validate`]
    pub fn from_env() -> Result<Self> {
        tracing::info!("Loading conversion configuration from environment");

        let defaults = Self::default();

        let symbols = Self::list_var("CONVERTER_SYMBOLS")?.unwrap_or(defaults.symbols);
        let tickers = Self::list_var("CONVERTER_TICKERS")?.unwrap_or(defaults.tickers);
        let ticker_policy = Self::parsed_var("CONVERTER_TICKER_POLICY")?.unwrap_or(defaults.ticker_policy);
        let oracle_timeout_ms =
            Self::parsed_var("CONVERTER_ORACLE_TIMEOUT_MS")?.unwrap_or(defaults.oracle_timeout_ms);
        let gateway_timeout_ms =
            Self::parsed_var("CONVERTER_GATEWAY_TIMEOUT_MS")?.unwrap_or(defaults.gateway_timeout_ms);
        let max_settlement_attempts =
            Self::parsed_var("CONVERTER_SETTLEMENT_ATTEMPTS")?.unwrap_or(defaults.max_settlement_attempts);

        let config = Self {
            symbols,
            tickers,
            ticker_policy,
            oracle_timeout_ms,
            gateway_timeout_ms,
            max_settlement_attempts,
        };

        config.validate()?;

        tracing::info!(
            symbols = config.symbols.len(),
            tickers = config.tickers.len(),
            ticker_policy = %config.ticker_policy,
            oracle_timeout_ms = config.oracle_timeout_ms,
            gateway_timeout_ms = config.gateway_timeout_ms,
            max_settlement_attempts = config.max_settlement_attempts,
            "Conversion configuration loaded successfully"
        );

        Ok(config)
    }

    /// Check the configuration for values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(Self::invalid("at least one symbol must be configured"));
        }
        if self.tickers.is_empty() {
            return Err(Self::invalid("at least one ticker must be configured"));
        }

        let mut seen = HashSet::new();
        for symbol in &self.symbols {
            if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
                return Err(Self::invalid(format!(
                    "symbol {:?} must be non-empty upper-case ASCII letters or digits",
                    symbol
                )));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(Self::invalid(format!("duplicate symbol {}", symbol)));
            }
        }

        if self.tickers.iter().any(|t| t.trim().is_empty()) {
            return Err(Self::invalid("tickers cannot be empty"));
        }

        if self.oracle_timeout_ms == 0 {
            return Err(Self::invalid("oracle timeout must be greater than zero"));
        }
        if self.gateway_timeout_ms == 0 {
            return Err(Self::invalid("gateway timeout must be greater than zero"));
        }

        if !(1..=MAX_SETTLEMENT_ATTEMPTS).contains(&self.max_settlement_attempts) {
            return Err(Self::invalid(format!(
                "settlement attempts must be between 1 and {}, got {}",
                MAX_SETTLEMENT_ATTEMPTS, self.max_settlement_attempts
            )));
        }

        Ok(())
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway_timeout_ms)
    }

    fn invalid(message: impl Into<String>) -> crate::errors::ConverterError {
        let message = message.into();
        tracing::error!(message = %message, "Invalid conversion configuration");
        ConfigError::Invalid { message }.into()
    }

    /// Comma-separated list variable; `None` when unset
    fn list_var(var: &str) -> Result<Option<Vec<String>>> {
        let Ok(raw) = env::var(var) else {
            tracing::debug!(var = var, "Not set, using default");
            return Ok(None);
        };

        let items: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if items.is_empty() {
            return Err(ConfigError::InvalidVariable {
                var: var.to_string(),
                value: raw,
                reason: "list is empty".to_string(),
            }
            .into());
        }

        tracing::debug!(var = var, count = items.len(), "Loaded list from environment");
        Ok(Some(items))
    }

    /// Single parsed variable; `None` when unset
    fn parsed_var<T>(var: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Ok(raw) = env::var(var) else {
            tracing::debug!(var = var, "Not set, using default");
            return Ok(None);
        };

        raw.trim().parse::<T>().map(Some).map_err(|e| {
            ConfigError::InvalidVariable {
                var: var.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to ensure tests don't interfere with each other's environment variables
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 6] = [
        "CONVERTER_SYMBOLS",
        "CONVERTER_TICKERS",
        "CONVERTER_TICKER_POLICY",
        "CONVERTER_ORACLE_TIMEOUT_MS",
        "CONVERTER_GATEWAY_TIMEOUT_MS",
        "CONVERTER_SETTLEMENT_ATTEMPTS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_config_from_env_defaults() {
        let _guard = TEST_MUTEX.lock().unwrap();
        clear_env();

        let config = ConversionConfig::from_env().unwrap();
        assert_eq!(config, ConversionConfig::default());
        assert_eq!(config.symbols.len(), 8);
        assert_eq!(config.tickers.len(), 14);
        assert_eq!(config.oracle_timeout(), Duration::from_millis(2000));
        assert_eq!(config.gateway_timeout(), Duration::from_millis(5000));
        assert_eq!(config.max_settlement_attempts, 3);
    }

    #[test]
    fn test_config_from_env_overrides() {
        let _guard = TEST_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("CONVERTER_SYMBOLS", "USD, XBT ,ETH");
        env::set_var("CONVERTER_TICKERS", "XBTUSD,ETHUSD");
        env::set_var("CONVERTER_TICKER_POLICY", "exact-split");
        env::set_var("CONVERTER_ORACLE_TIMEOUT_MS", "250");
        env::set_var("CONVERTER_SETTLEMENT_ATTEMPTS", "5");

        let config = ConversionConfig::from_env().unwrap();
        assert_eq!(config.symbols, vec!["USD", "XBT", "ETH"]);
        assert_eq!(config.tickers, vec!["XBTUSD", "ETHUSD"]);
        assert_eq!(config.ticker_policy, TickerPolicy::ExactSplit);
        assert_eq!(config.oracle_timeout_ms, 250);
        assert_eq!(config.gateway_timeout_ms, DEFAULT_GATEWAY_TIMEOUT_MS);
        assert_eq!(config.max_settlement_attempts, 5);

        clear_env();
    }

    #[test]
    fn test_config_from_env_rejects_unparseable_values() {
        let _guard = TEST_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("CONVERTER_GATEWAY_TIMEOUT_MS", "soon");
        let err = ConversionConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("CONVERTER_GATEWAY_TIMEOUT_MS"));

        clear_env();
        env::set_var("CONVERTER_TICKER_POLICY", "fuzzy");
        assert!(ConversionConfig::from_env().is_err());

        clear_env();
        env::set_var("CONVERTER_SYMBOLS", " , ,");
        assert!(ConversionConfig::from_env().is_err());

        clear_env();
    }

    #[test]
    fn test_config_from_env_rejects_out_of_range_attempts() {
        let _guard = TEST_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("CONVERTER_SETTLEMENT_ATTEMPTS", "11");
        let err = ConversionConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("between 1 and 10"));

        clear_env();
    }

    #[test]
    fn test_validate() {
        assert!(ConversionConfig::default().validate().is_ok());

        let invalid = [
            ConversionConfig {
                symbols: vec![],
                ..Default::default()
            },
            ConversionConfig {
                tickers: vec![],
                ..Default::default()
            },
            ConversionConfig {
                symbols: vec!["USD".into(), "usd".into()],
                ..Default::default()
            },
            ConversionConfig {
                symbols: vec!["USD".into(), "USD".into()],
                ..Default::default()
            },
            ConversionConfig {
                oracle_timeout_ms: 0,
                ..Default::default()
            },
            ConversionConfig {
                gateway_timeout_ms: 0,
                ..Default::default()
            },
            ConversionConfig {
                max_settlement_attempts: 0,
                ..Default::default()
            },
        ];

        for config in invalid {
            assert!(config.validate().is_err(), "expected invalid: {:?}", config);
        }
    }
}
