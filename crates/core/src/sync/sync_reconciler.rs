//! Drain cycle: pushes locally queued records to the server.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::gateway::FinanceApiTrait;
use crate::session::SessionHandle;
use crate::sync::{LocalRecord, LocalStoreTrait, SyncCollection};

/// Per-collection outcome of one drain cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDrainStats {
    pub attempted: usize,
    pub pushed: usize,
    pub failed: usize,
    /// Pushed records whose synced flag could not be written.
    pub mark_failures: usize,
    pub query_failed: bool,
}

/// Outcome of one drain cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrainReport {
    pub transactions: CollectionDrainStats,
    pub balances: CollectionDrainStats,
    pub duration_ms: i64,
}

impl DrainReport {
    pub fn pushed_count(&self) -> usize {
        self.transactions.pushed + self.balances.pushed
    }

    pub fn failed_count(&self) -> usize {
        self.transactions.failed + self.balances.failed
    }

    /// True when nothing is left behind for the next cycle.
    pub fn is_clean(&self) -> bool {
        [&self.transactions, &self.balances]
            .iter()
            .all(|s| s.failed == 0 && s.mark_failures == 0 && !s.query_failed)
    }

    fn stats_mut(&mut self, collection: SyncCollection) -> &mut CollectionDrainStats {
        match collection {
            SyncCollection::Transactions => &mut self.transactions,
            SyncCollection::Balances => &mut self.balances,
        }
    }
}

/// Pushes unsynced local records through the gateway and flags the accepted ones.
///
/// Cycles are serialized: a trigger that arrives mid-cycle waits for the
/// running cycle and then re-reads the store.
pub struct SyncReconciler {
    store: Arc<dyn LocalStoreTrait>,
    api: Arc<dyn FinanceApiTrait>,
    session: SessionHandle,
    cycle_mutex: Mutex<()>,
}

impl SyncReconciler {
    pub fn new(
        store: Arc<dyn LocalStoreTrait>,
        api: Arc<dyn FinanceApiTrait>,
        session: SessionHandle,
    ) -> Self {
        Self {
            store,
            api,
            session,
            cycle_mutex: Mutex::new(()),
        }
    }

    pub fn is_draining(&self) -> bool {
        self.cycle_mutex.try_lock().is_err()
    }

    /// Runs one drain cycle: transactions first, then balances, one request
    /// in flight at a time.
    pub async fn drain(&self) -> DrainReport {
        let _cycle_guard = self.cycle_mutex.lock().await;
        let started_at = Instant::now();
        let mut report = DrainReport::default();

        for collection in SyncCollection::ALL {
            self.drain_collection(collection, &mut report).await;
        }

        report.duration_ms = started_at.elapsed().as_millis() as i64;
        info!(
            "[Sync] Drain cycle finished in {}ms: transactions {}/{} pushed, balances {}/{} pushed",
            report.duration_ms,
            report.transactions.pushed,
            report.transactions.attempted,
            report.balances.pushed,
            report.balances.attempted
        );
        report
    }

    async fn drain_collection(&self, collection: SyncCollection, report: &mut DrainReport) {
        let pending = match self.store.query_unsynced(collection).await {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    "[Sync] Failed to read unsynced {}: {}",
                    collection.as_str(),
                    err
                );
                report.stats_mut(collection).query_failed = true;
                return;
            }
        };

        if pending.is_empty() {
            debug!("[Sync] No unsynced {}", collection.as_str());
            return;
        }

        for record in pending {
            report.stats_mut(collection).attempted += 1;
            let local_id = record.local_id().to_string();

            let Some(server_id) = self.push(record).await else {
                report.stats_mut(collection).failed += 1;
                continue;
            };
            report.stats_mut(collection).pushed += 1;

            if local_id.is_empty() {
                continue;
            }
            if server_id.is_none() {
                warn!(
                    "[Sync] Server accepted {} record {} without returning an id",
                    collection.as_str(),
                    local_id
                );
            }
            if let Err(err) = self
                .store
                .mark_synced(collection, &local_id, server_id)
                .await
            {
                // The record stays unsynced and is pushed again next cycle.
                warn!(
                    "[Sync] Pushed {} record {} but failed to flag it: {}",
                    collection.as_str(),
                    local_id,
                    err
                );
                report.stats_mut(collection).mark_failures += 1;
            }
        }
    }

    /// Submits one record. `None` means the server did not accept it;
    /// `Some(server_id)` means it did.
    async fn push(&self, record: LocalRecord) -> Option<Option<String>> {
        let fallback_user_id = self.session.user_id();

        match record {
            LocalRecord::Transaction(txn) => {
                let payload = txn.to_create_payload(fallback_user_id.as_deref(), Utc::now());
                let response = self.api.create_transaction(&payload).await;
                if !response.success {
                    debug!(
                        "[Sync] Transaction {} not accepted: {}",
                        txn.local_id, response.message
                    );
                    return None;
                }
                Some(response.data.map(|t| t.id).filter(|id| !id.is_empty()))
            }
            LocalRecord::Balance(balance) => {
                let payload = balance.to_create_payload(fallback_user_id.as_deref());
                let response = self.api.create_balance(&payload).await;
                if !response.success {
                    debug!(
                        "[Sync] Balance {} not accepted: {}",
                        balance.local_id, response.message
                    );
                    return None;
                }
                Some(
                    response
                        .data
                        .and_then(|list| list.into_iter().next())
                        .map(|b| b.id)
                        .filter(|id| !id.is_empty()),
                )
            }
        }
    }
}
