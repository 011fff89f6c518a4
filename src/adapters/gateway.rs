//! Execution gateway contract and a recording in-memory gateway.

use crate::dispatch::{DispatchResult, HopRequest};
use crate::errors::DispatchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use uuid::Uuid;

/// Acknowledgement that a venue accepted a hop for asynchronous execution.
///
/// Acceptance says nothing about the trade's final outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopAck {
    pub request_id: Uuid,
    /// Venue-side reference for the submitted trade, when the venue gives one
    pub reference: Option<String>,
}

/// Trading venue that performs one conversion leg at a time.
///
/// Delivery is at-least-once: venues are expected to deduplicate on
/// `HopRequest::request_id`.
#[async_trait]
pub trait ExecutionGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn submit_hop(&self, hop: &HopRequest) -> DispatchResult<HopAck>;
}

/// Gateway that accepts and remembers every hop, except for symbols it has
/// been told to reject.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    submitted: Mutex<Vec<HopRequest>>,
    rejected_symbols: Mutex<HashSet<String>>,
    notify: Notify,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent submissions for `symbol` fail with `DispatchError::Rejected`
    pub async fn reject(&self, symbol: &str) {
        self.rejected_symbols.lock().await.insert(symbol.to_string());
    }

    /// Every hop received so far, in arrival order
    pub async fn submitted(&self) -> Vec<HopRequest> {
        self.submitted.lock().await.clone()
    }

    /// Wait until at least `count` hops have arrived or `within` elapses,
    /// then return what arrived.
    pub async fn wait_for(&self, count: usize, within: Duration) -> Vec<HopRequest> {
        let deadline = tokio::time::Instant::now() + within;
        loop {
            // Register before checking so a submission in between is not missed
            let notified = self.notify.notified();
            {
                let submitted = self.submitted.lock().await;
                if submitted.len() >= count {
                    return submitted.clone();
                }
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.submitted().await;
            }
        }
    }
}

#[async_trait]
impl ExecutionGateway for RecordingGateway {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn submit_hop(&self, hop: &HopRequest) -> DispatchResult<HopAck> {
        if self.rejected_symbols.lock().await.contains(&hop.symbol) {
            return Err(DispatchError::Rejected {
                symbol: hop.symbol.clone(),
                reason: "symbol not tradable on venue".to_string(),
            });
        }

        let position = {
            let mut submitted = self.submitted.lock().await;
            submitted.push(hop.clone());
            submitted.len()
        };
        self.notify.notify_waiters();

        Ok(HopAck {
            request_id: hop.request_id,
            reference: Some(format!("rec-{}", position)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_records_and_rejects() {
        let gateway = RecordingGateway::new();
        gateway.reject("USDXDG").await;

        let ok = HopRequest::convert(0, "USDETH", dec!(12));
        let bad = HopRequest::convert(1, "USDXDG", dec!(12));

        let ack = gateway.submit_hop(&ok).await.unwrap();
        assert_eq!(ack.request_id, ok.request_id);
        assert!(matches!(
            gateway.submit_hop(&bad).await,
            Err(DispatchError::Rejected { .. })
        ));
        assert_eq!(gateway.submitted().await, vec![ok]);
    }

    #[tokio::test]
    async fn test_wait_for_returns_partial_after_deadline() {
        let gateway = RecordingGateway::new();
        gateway.submit_hop(&HopRequest::convert(0, "USDETH", dec!(1))).await.unwrap();

        let seen = gateway.wait_for(2, Duration::from_millis(20)).await;
        assert_eq!(seen.len(), 1);
    }
}
