//! Balance store contract and an in-memory implementation.

use crate::errors::StoreError;
use crate::settlement::BalanceSnapshot;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Persistent per-user balance snapshots with optimistic concurrency.
///
/// Implementations must replace a user's snapshot all-or-nothing and only
/// when the stored version still equals `expected_version`.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Load every pool and symbol for `user_id`.
    ///
    /// A user with no stored balances reads as an empty snapshot at version 0.
    async fn get_balances(&self, user_id: &str) -> Result<BalanceSnapshot, StoreError>;

    /// Replace the user's snapshot, returning the new version.
    ///
    /// # Errors
    ///
    /// - `StoreError::VersionConflict` if the stored version is not `expected_version`
    /// - `StoreError::Unavailable` for any other failure; nothing was written
    async fn put_balances(
        &self,
        user_id: &str,
        snapshot: &BalanceSnapshot,
        expected_version: u64,
    ) -> Result<u64, StoreError>;
}

/// Process-local balance store.
///
/// Each user's snapshot carries a version that increases by one per write.
#[derive(Debug, Default)]
pub struct InMemoryBalanceStore {
    snapshots: RwLock<HashMap<String, BalanceSnapshot>>,
}

impl InMemoryBalanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditionally replace a user's balances, bumping the version
    pub async fn seed(&self, user_id: &str, snapshot: BalanceSnapshot) -> u64 {
        let mut snapshots = self.snapshots.write().await;
        let version = snapshots.get(user_id).map_or(0, BalanceSnapshot::version) + 1;
        let mut snapshot = snapshot;
        snapshot.set_version(version);
        snapshots.insert(user_id.to_string(), snapshot);
        version
    }

    pub async fn user_count(&self) -> usize {
        self.snapshots.read().await.len()
    }
}

#[async_trait]
impl BalanceStore for InMemoryBalanceStore {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    async fn get_balances(&self, user_id: &str) -> Result<BalanceSnapshot, StoreError> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots.get(user_id).cloned().unwrap_or_default())
    }

    async fn put_balances(
        &self,
        user_id: &str,
        snapshot: &BalanceSnapshot,
        expected_version: u64,
    ) -> Result<u64, StoreError> {
        let mut snapshots = self.snapshots.write().await;
        let actual = snapshots.get(user_id).map_or(0, BalanceSnapshot::version);

        if actual != expected_version {
            tracing::debug!(
                user_id = user_id,
                expected = expected_version,
                actual = actual,
                "Rejecting stale balance write"
            );
            return Err(StoreError::VersionConflict {
                user_id: user_id.to_string(),
                expected: expected_version,
                actual,
            });
        }

        let version = actual + 1;
        let mut stored = snapshot.clone();
        stored.set_version(version);
        snapshots.insert(user_id.to_string(), stored);

        tracing::trace!(user_id = user_id, version = version, "Balances stored");
        Ok(version)
    }
}
