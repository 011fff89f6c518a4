//! Best-effort, per-hop execution of a conversion route.
//!
//! Every hop of a route is handed to the execution gateway as an independent
//! task, all at once. Hops are not ordered, not awaited by the conversion and
//! never compensated: a failed or timed-out hop is logged and leaves any
//! earlier hop and the committed balance change in place. Callers that want
//! to observe outcomes can [`DispatchHandle::join`] the handle.

pub mod hop;

pub use hop::{HopOperation, HopOutcome, HopReport, HopRequest};

use crate::adapters::ExecutionGateway;
use crate::errors::DispatchError;
use crate::path::ConversionPath;
use futures::future::join_all;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Result type for a single hop submission
pub type DispatchResult<T> = std::result::Result<T, DispatchError>;

/// Default bound on one gateway call
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Submits route hops to an [`ExecutionGateway`].
#[derive(Clone)]
pub struct HopDispatcher {
    gateway: Arc<dyn ExecutionGateway>,
    timeout: Duration,
}

impl HopDispatcher {
    pub fn new(gateway: Arc<dyn ExecutionGateway>, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// One `convert` request per hop of `path`, each for the full `amount`
    pub fn plan(path: &ConversionPath, amount: Decimal) -> Vec<HopRequest> {
        path.hop_symbols()
            .into_iter()
            .enumerate()
            .map(|(index, symbol)| HopRequest::convert(index, symbol, amount))
            .collect()
    }

    /// Spawn one submission task per hop and return immediately.
    ///
    /// A trivial path yields an empty handle.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn dispatch(&self, path: &ConversionPath, amount: Decimal) -> DispatchHandle {
        self.dispatch_hops(Self::plan(path, amount))
    }

    /// Spawn submission tasks for already planned hops.
    pub fn dispatch_hops(&self, hops: Vec<HopRequest>) -> DispatchHandle {
        let tasks = hops
            .iter()
            .cloned()
            .map(|hop| {
                let gateway = Arc::clone(&self.gateway);
                tokio::spawn(submit_with_timeout(gateway, hop, self.timeout))
            })
            .collect();

        tracing::debug!(
            hops = hops.len(),
            gateway = self.gateway.name(),
            timeout_ms = self.timeout.as_millis() as u64,
            "Hops dispatched"
        );

        DispatchHandle { hops, tasks }
    }
}

impl std::fmt::Debug for HopDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HopDispatcher")
            .field("gateway", &self.gateway.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

async fn submit_with_timeout(gateway: Arc<dyn ExecutionGateway>, hop: HopRequest, timeout: Duration) -> HopReport {
    let timeout_ms = timeout.as_millis() as u64;

    let outcome = match tokio::time::timeout(timeout, gateway.submit_hop(&hop)).await {
        Ok(Ok(ack)) => {
            tracing::info!(
                request_id = %hop.request_id,
                hop_index = hop.hop_index,
                symbol = %hop.symbol,
                amount = %hop.amount,
                "Hop accepted by gateway"
            );
            HopOutcome::Accepted(ack)
        }
        Ok(Err(e)) => {
            tracing::error!(
                request_id = %hop.request_id,
                hop_index = hop.hop_index,
                symbol = %hop.symbol,
                error = %e,
                "Hop rejected by gateway"
            );
            HopOutcome::Rejected(e)
        }
        Err(_) => {
            tracing::warn!(
                request_id = %hop.request_id,
                hop_index = hop.hop_index,
                symbol = %hop.symbol,
                timeout_ms = timeout_ms,
                "Hop submission timed out"
            );
            HopOutcome::TimedOut { timeout_ms }
        }
    };

    HopReport { hop, outcome }
}

/// Running hop submissions for one route.
///
/// Dropping or [`detach`](DispatchHandle::detach)ing the handle does not
/// cancel the tasks.
#[derive(Debug)]
pub struct DispatchHandle {
    hops: Vec<HopRequest>,
    tasks: Vec<JoinHandle<HopReport>>,
}

impl DispatchHandle {
    /// A handle with nothing in flight
    pub fn empty() -> Self {
        Self {
            hops: Vec::new(),
            tasks: Vec::new(),
        }
    }

    pub fn hops(&self) -> &[HopRequest] {
        &self.hops
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Let the tasks run on unobserved, keeping the submitted requests
    pub fn detach(self) -> Vec<HopRequest> {
        self.hops
    }

    /// Wait for every hop and report its outcome, in hop order.
    pub async fn join(self) -> Vec<HopReport> {
        let results = join_all(self.tasks).await;

        self.hops
            .into_iter()
            .zip(results)
            .map(|(hop, result)| match result {
                Ok(report) => report,
                Err(e) => {
                    let error = DispatchError::TaskFailed {
                        symbol: hop.symbol.clone(),
                        reason: e.to_string(),
                    };
                    tracing::error!(
                        request_id = %hop.request_id,
                        hop_index = hop.hop_index,
                        error = %error,
                        "Hop task did not complete"
                    );
                    HopReport {
                        hop,
                        outcome: HopOutcome::Aborted(error),
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{HopAck, RecordingGateway};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    /// Gateway that never answers
    struct StalledGateway;

    #[async_trait]
    impl ExecutionGateway for StalledGateway {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn submit_hop(&self, _hop: &HopRequest) -> DispatchResult<HopAck> {
            std::future::pending().await
        }
    }

    fn route(symbols: &[&str]) -> ConversionPath {
        ConversionPath::new(symbols.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_plan_one_request_per_hop_with_full_amount() {
        let hops = HopDispatcher::plan(&route(&["LTC", "ETH", "SOL", "USD"]), dec!(2));

        let symbols: Vec<_> = hops.iter().map(|h| h.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["LTCETH", "ETHSOL", "SOLUSD"]);
        assert!(hops.iter().all(|h| h.amount == dec!(2)));
        assert_eq!(hops.iter().map(|h| h.hop_index).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_all_hops_reach_gateway() {
        let gateway = Arc::new(RecordingGateway::new());
        let dispatcher = HopDispatcher::new(gateway.clone(), Duration::from_secs(1));

        let reports = dispatcher.dispatch(&route(&["USD", "ETH", "XBT"]), dec!(12)).join().await;

        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.outcome.is_accepted()));
        let mut seen: Vec<_> = gateway.submitted().await.into_iter().map(|h| h.symbol).collect();
        seen.sort();
        assert_eq!(seen, vec!["ETHXBT", "USDETH"]);
    }

    #[tokio::test]
    async fn test_rejected_hop_does_not_stop_others() {
        let gateway = Arc::new(RecordingGateway::new());
        gateway.reject("USDETH").await;
        let dispatcher = HopDispatcher::new(gateway.clone(), Duration::from_secs(1));

        let reports = dispatcher.dispatch(&route(&["USD", "ETH", "XBT"]), dec!(12)).join().await;

        assert!(matches!(reports[0].outcome, HopOutcome::Rejected(DispatchError::Rejected { .. })));
        assert!(reports[1].outcome.is_accepted());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_gateway_times_out_per_hop() {
        let dispatcher = HopDispatcher::new(Arc::new(StalledGateway), DEFAULT_GATEWAY_TIMEOUT);
        let started = tokio::time::Instant::now();

        let reports = dispatcher.dispatch(&route(&["USD", "ETH", "XBT"]), dec!(1)).join().await;

        assert_eq!(reports.len(), 2);
        assert!(reports
            .iter()
            .all(|r| r.outcome == HopOutcome::TimedOut { timeout_ms: 5000 }));
        assert!(started.elapsed() >= DEFAULT_GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_trivial_path_dispatches_nothing() {
        let gateway = Arc::new(RecordingGateway::new());
        let dispatcher = HopDispatcher::new(gateway.clone(), Duration::from_secs(1));

        let handle = dispatcher.dispatch(&ConversionPath::trivial("USD"), dec!(1));

        assert!(handle.is_empty());
        assert!(handle.join().await.is_empty());
        assert!(gateway.submitted().await.is_empty());
    }

    #[tokio::test]
    async fn test_detached_hops_still_complete() {
        let gateway = Arc::new(RecordingGateway::new());
        let dispatcher = HopDispatcher::new(gateway.clone(), Duration::from_secs(1));

        let hops = dispatcher.dispatch(&route(&["USD", "ETH", "XBT"]), dec!(3)).detach();
        let seen = gateway.wait_for(2, Duration::from_secs(1)).await;

        assert_eq!(hops.len(), 2);
        assert_eq!(seen.len(), 2);
    }
}
