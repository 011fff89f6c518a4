//! Conversion orchestration.
//!
//! [`ConversionOrchestrator::convert`] is the single entry point for API
//! handlers. It runs a request through validation, routing, pricing and
//! settlement, then hands the route's hops to the execution gateway without
//! waiting for them. Every failure comes back as a [`ConversionError`] with
//! a [`FailureKind`]; nothing is raised past this boundary.

use crate::adapters::{BalanceStore, ExecutionGateway, PriceOracle, PriceQuote};
use crate::builders::ConversionGraphBuilder;
use crate::config::ConversionConfig;
use crate::dispatch::{DispatchHandle, HopDispatcher, HopRequest};
use crate::errors::{ConversionError, FailureKind, OracleError, Result};
use crate::graph::{ConversionGraph, Symbol};
use crate::path::{ConversionPath, PathFinder};
use crate::settlement::{BalanceSettlement, ConversionRequest, SettlementReceipt};
use crate::utils::parse_non_negative_amount;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Outcome of [`ConversionOrchestrator::convert`]
pub type ConversionResult = std::result::Result<ConversionReceipt, ConversionError>;

/// Record of a completed conversion.
///
/// `hops` lists what was handed to the gateway; their execution is not
/// reflected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReceipt {
    pub conversion_id: Uuid,
    pub user_id: String,
    pub from_symbol: Symbol,
    pub to_symbol: Symbol,
    pub from_amount: Decimal,
    pub to_amount: Decimal,
    pub from_price: PriceQuote,
    pub to_price: PriceQuote,
    pub route: ConversionPath,
    pub hops: Vec<HopRequest>,
    pub settlement: SettlementReceipt,
    pub settled_at: DateTime<Utc>,
}

/// Success/failure envelope for API responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<ConversionReceipt>,
}

impl From<ConversionResult> for ConversionEnvelope {
    fn from(result: ConversionResult) -> Self {
        match result {
            Ok(receipt) => Self {
                success: true,
                kind: None,
                retryable: false,
                error: None,
                receipt: Some(receipt),
            },
            Err(e) => Self {
                success: false,
                kind: Some(e.kind()),
                retryable: e.is_retryable(),
                error: Some(e.to_string()),
                receipt: None,
            },
        }
    }
}

/// Composes routing, pricing, settlement and hop dispatch.
///
/// The graph is shared as an immutable snapshot: each conversion works on
/// the `Arc` current when it started, and [`rebuild_graph`] swaps in a new
/// one without disturbing conversions in flight.
///
/// [`rebuild_graph`]: ConversionOrchestrator::rebuild_graph
pub struct ConversionOrchestrator {
    graph: RwLock<Arc<ConversionGraph>>,
    settlement: BalanceSettlement,
    oracle: Arc<dyn PriceOracle>,
    dispatcher: HopDispatcher,
    oracle_timeout: Duration,
}

impl ConversionOrchestrator {
    pub fn new(
        graph: ConversionGraph,
        store: Arc<dyn BalanceStore>,
        oracle: Arc<dyn PriceOracle>,
        gateway: Arc<dyn ExecutionGateway>,
        config: &ConversionConfig,
    ) -> Self {
        Self {
            graph: RwLock::new(Arc::new(graph)),
            settlement: BalanceSettlement::new(store, config.max_settlement_attempts),
            oracle,
            dispatcher: HopDispatcher::new(gateway, config.gateway_timeout()),
            oracle_timeout: config.oracle_timeout(),
        }
    }

    /// The graph conversions currently route over
    pub async fn graph(&self) -> Arc<ConversionGraph> {
        Arc::clone(&*self.graph.read().await)
    }

    /// Swap in a prebuilt graph, returning the one it replaces
    pub async fn replace_graph(&self, graph: ConversionGraph) -> Arc<ConversionGraph> {
        let graph = Arc::new(graph);
        let mut current = self.graph.write().await;
        std::mem::replace(&mut *current, graph)
    }

    /// Build a fresh graph from `config` and swap it in.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation or the graph cannot be
    /// built; the current graph stays in place
    pub async fn rebuild_graph(&self, config: &ConversionConfig) -> Result<Arc<ConversionGraph>> {
        config.validate().map_err(|e| {
            tracing::error!(error = %e, "Rejected graph rebuild with invalid configuration");
            e
        })?;

        let graph = ConversionGraphBuilder::from_config(config).build().map_err(|e| {
            tracing::error!(error = %e, "Graph rebuild failed, keeping current graph");
            e
        })?;

        let graph = Arc::new(graph);
        *self.graph.write().await = Arc::clone(&graph);

        tracing::info!(
            symbols = graph.symbol_count(),
            edges = graph.edge_count(),
            "Conversion graph replaced"
        );

        Ok(graph)
    }

    /// Shortest route between two symbols on the current graph
    pub async fn find_path(&self, source: &str, target: &str) -> Option<ConversionPath> {
        let graph = self.graph().await;
        PathFinder::new(&graph).find_path(source, target)
    }

    /// Convert `from_amount` of `from_symbol` into `to_amount` of `to_symbol`.
    ///
    /// Steps, each failing fast with the kind in brackets:
    /// 1. Validate both amounts (`InvalidAmount`)
    /// 2. Check both symbols are known (`UnknownSymbol`)
    /// 3. Find a route (`NoRoute`)
    /// 4. Price both symbols (`PriceUnavailable`, `GatewayTimeout`)
    /// 5. Settle balances (`InsufficientFunds`, `StoreFailure`)
    /// 6. Dispatch the route's hops for `from_amount`, not awaited
    ///
    /// Balances are only touched in step 5, and only if it succeeds.
    pub async fn convert(&self, request: &ConversionRequest) -> ConversionResult {
        match self.try_convert(request).await {
            Ok(receipt) => Ok(receipt),
            Err(e) => {
                tracing::warn!(
                    user_id = %request.user_id,
                    from_symbol = %request.from_symbol,
                    to_symbol = %request.to_symbol,
                    kind = %e.kind(),
                    retryable = e.is_retryable(),
                    error = %e,
                    "Conversion failed"
                );
                Err(e)
            }
        }
    }

    /// [`convert`](Self::convert) wrapped in a response envelope
    pub async fn convert_envelope(&self, request: &ConversionRequest) -> ConversionEnvelope {
        self.convert(request).await.into()
    }

    /// Hand every hop of `path` to the gateway concurrently, each for the
    /// full `amount`, and return without waiting.
    ///
    /// Hops are independent: a failure or timeout in one is logged and does
    /// not affect the others, earlier hops or any settled balances.
    pub fn execute_multi_hop(&self, path: &ConversionPath, amount: Decimal) -> DispatchHandle {
        if path.is_trivial() {
            return DispatchHandle::empty();
        }

        tracing::info!(
            route = %path,
            hops = path.hop_count(),
            amount = %amount,
            "Dispatching conversion hops"
        );

        self.dispatcher.dispatch(path, amount)
    }

    async fn try_convert(&self, request: &ConversionRequest) -> ConversionResult {
        let from_amount = BalanceSettlement::parse_debit_amount(&request.from_amount)?;
        let to_amount = parse_non_negative_amount(&request.to_amount)?;

        let graph = self.graph().await;
        for symbol in [&request.from_symbol, &request.to_symbol] {
            if !graph.contains(symbol) {
                return Err(ConversionError::UnknownSymbol {
                    symbol: symbol.clone(),
                });
            }
        }

        let route = PathFinder::new(&graph)
            .find_path(&request.from_symbol, &request.to_symbol)
            .ok_or_else(|| ConversionError::NoRoute {
                from: request.from_symbol.clone(),
                to: request.to_symbol.clone(),
            })?;

        let (from_price, to_price) = futures::try_join!(
            self.resolve_price(&request.from_symbol),
            self.resolve_price(&request.to_symbol)
        )?;

        let settlement = self.settlement.settle(request).await?;

        let hops = self.execute_multi_hop(&route, from_amount).detach();

        let receipt = ConversionReceipt {
            conversion_id: Uuid::new_v4(),
            user_id: request.user_id.clone(),
            from_symbol: request.from_symbol.clone(),
            to_symbol: request.to_symbol.clone(),
            from_amount,
            to_amount,
            from_price,
            to_price,
            route,
            hops,
            settlement,
            settled_at: Utc::now(),
        };

        tracing::info!(
            conversion_id = %receipt.conversion_id,
            user_id = %receipt.user_id,
            route = %receipt.route,
            from_amount = %from_amount,
            to_amount = %to_amount,
            hops = receipt.hops.len(),
            "Conversion settled"
        );

        Ok(receipt)
    }

    async fn resolve_price(&self, symbol: &str) -> std::result::Result<PriceQuote, ConversionError> {
        let timeout_ms = self.oracle_timeout.as_millis() as u64;

        match tokio::time::timeout(self.oracle_timeout, self.oracle.get_price(symbol)).await {
            Ok(Ok(quote)) => {
                tracing::debug!(symbol = symbol, price = %quote.price, "Price resolved");
                Ok(quote)
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => {
                let e = OracleError::Timeout {
                    symbol: symbol.to_string(),
                    timeout_ms,
                };
                tracing::warn!(symbol = symbol, error = %e, "Price request timed out");
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for ConversionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionOrchestrator")
            .field("settlement", &self.settlement)
            .field("dispatcher", &self.dispatcher)
            .field("oracle_timeout", &self.oracle_timeout)
            .finish_non_exhaustive()
    }
}
