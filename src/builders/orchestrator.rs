//! Builder pattern for ConversionOrchestrator

use crate::adapters::{BalanceStore, ExecutionGateway, PriceOracle};
use crate::builders::ConversionGraphBuilder;
use crate::config::ConversionConfig;
use crate::errors::{ConfigError, Result};
use crate::graph::ConversionGraph;
use crate::orchestrator::ConversionOrchestrator;
use std::sync::Arc;

/// Builder for creating ConversionOrchestrator instances with a fluent API
#[derive(Default)]
pub struct ConversionOrchestratorBuilder {
    config: Option<ConversionConfig>,
    graph: Option<ConversionGraph>,
    store: Option<Arc<dyn BalanceStore>>,
    oracle: Option<Arc<dyn PriceOracle>>,
    gateway: Option<Arc<dyn ExecutionGateway>>,
}

impl ConversionOrchestratorBuilder {
    /// Create a new ConversionOrchestratorBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration. Defaults to [`ConversionConfig::default`].
    pub fn with_config(mut self, config: ConversionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a prebuilt graph instead of building one from the configuration
    pub fn with_graph(mut self, graph: ConversionGraph) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn with_balance_store(mut self, store: Arc<dyn BalanceStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_price_oracle(mut self, oracle: Arc<dyn PriceOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn with_gateway(mut self, gateway: Arc<dyn ExecutionGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Build the ConversionOrchestrator
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The balance store, price oracle or gateway was not provided
    /// - The configuration is invalid
    /// - No graph was provided and building one from the configuration fails
    pub fn build(self) -> Result<ConversionOrchestrator> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let store = self.store.ok_or_else(|| Self::missing("A balance store"))?;
        let oracle = self.oracle.ok_or_else(|| Self::missing("A price oracle"))?;
        let gateway = self.gateway.ok_or_else(|| Self::missing("An execution gateway"))?;

        let graph = match self.graph {
            Some(graph) => graph,
            None => ConversionGraphBuilder::from_config(&config).build()?,
        };

        Ok(ConversionOrchestrator::new(graph, store, oracle, gateway, &config))
    }

    fn missing(what: &str) -> ConfigError {
        ConfigError::Invalid {
            message: format!("{} is required to build ConversionOrchestrator", what),
        }
    }
}
