//! Hop request payloads and per-hop outcomes.

use crate::adapters::HopAck;
use crate::errors::DispatchError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Operation requested from the venue for a hop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HopOperation {
    Convert,
}

/// One conversion leg as submitted to the execution gateway.
///
/// Serializes to the venue payload, e.g.
/// `{"request_id":"…","hop_index":0,"operation":"convert","symbol":"USDETH","amount":"12"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopRequest {
    /// Fresh per submission, used by the venue for deduplication
    pub request_id: Uuid,
    pub hop_index: usize,
    pub operation: HopOperation,
    /// Source and destination symbols concatenated in travel direction
    pub symbol: String,
    /// The full conversion amount; it is never split across hops
    pub amount: Decimal,
}

impl HopRequest {
    pub fn convert(hop_index: usize, symbol: impl Into<String>, amount: Decimal) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            hop_index,
            operation: HopOperation::Convert,
            symbol: symbol.into(),
            amount,
        }
    }
}

impl fmt::Display for HopRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hop {} {} {}", self.hop_index, self.symbol, self.amount)
    }
}

/// How a single hop submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HopOutcome {
    Accepted(HopAck),
    Rejected(DispatchError),
    TimedOut { timeout_ms: u64 },
    /// The submission task panicked or was cancelled
    Aborted(DispatchError),
}

impl HopOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, HopOutcome::Accepted(_))
    }
}

/// A hop together with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopReport {
    pub hop: HopRequest,
    pub outcome: HopOutcome,
}
