//! Connectivity listener: runs a drain cycle each time the client comes back
//! online.

use std::sync::Arc;

use log::{debug, info, warn};

use fintrack_core::sync::{wait_until_regained, DrainReport, PendingCounts, SyncReconciler};
use fintrack_core::Result;

use crate::context::{ServiceContext, SyncRuntimeState};

/// Spawns the listener unless one is already running.
///
/// The task holds only the reconciler and the runtime state, so it exits once
/// the context, and with it the connectivity monitor, is dropped.
pub async fn ensure_connectivity_listener_started(context: Arc<ServiceContext>) {
    let runtime = context.sync_runtime();
    let mut guard = runtime.background_task.lock().await;
    if let Some(handle) = guard.as_ref() {
        if !handle.is_finished() {
            return;
        }
        guard.take();
    }

    // Subscribe before spawning so a transition right after this call is seen.
    let mut rx = context.connectivity.subscribe();
    let reconciler = context.reconciler();
    let task_runtime = Arc::clone(&runtime);
    let handle = tokio::spawn(async move {
        loop {
            if !wait_until_regained(&mut rx).await {
                debug!("[Sync] Connectivity monitor closed, listener exiting");
                break;
            }
            info!("[Sync] Connectivity regained, draining offline queue");
            drain_and_record(&reconciler, &task_runtime).await;
        }
    });
    *guard = Some(handle);
    debug!("[Sync] Connectivity listener started");
}

pub async fn ensure_connectivity_listener_stopped(context: Arc<ServiceContext>) {
    let runtime = context.sync_runtime();
    let mut guard = runtime.background_task.lock().await;
    if let Some(handle) = guard.take() {
        handle.abort();
        debug!("[Sync] Connectivity listener stopped");
    }
}

/// Reports the platform's connectivity. Returns `true` when this is an
/// offline to online transition, which wakes the listener.
pub fn notify_connectivity(context: &ServiceContext, online: bool) -> bool {
    let regained = context.connectivity.set_online(online);
    if !online {
        debug!("[Sync] Client went offline");
    }
    regained
}

/// Runs one drain cycle immediately and records its report.
pub async fn run_drain_now(context: &ServiceContext) -> DrainReport {
    drain_and_record(&context.reconciler, &context.sync_runtime).await
}

async fn drain_and_record(reconciler: &SyncReconciler, runtime: &SyncRuntimeState) -> DrainReport {
    let report = reconciler.drain().await;
    if !report.is_clean() {
        warn!(
            "[Sync] Drain left work behind: {} failed submission(s)",
            report.failed_count()
        );
    }
    *runtime.last_report.lock().await = Some(report.clone());
    report
}

pub async fn last_drain_report(context: &ServiceContext) -> Option<DrainReport> {
    context.sync_runtime.last_report.lock().await.clone()
}

pub async fn pending_counts(context: &ServiceContext) -> Result<PendingCounts> {
    context.local_store.pending_counts().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use async_trait::async_trait;
    use fintrack_core::balances::{Balance, NewBalance};
    use fintrack_core::gateway::{ApiResponse, Credentials, FinanceApiTrait, LoginResponse};
    use fintrack_core::session::SessionHandle;
    use fintrack_core::transactions::{NewTransaction, SubmitOutcome, Transaction, TransactionKind};
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::tempdir;

    /// Accepts every submission and assigns sequential ids.
    #[derive(Default)]
    struct AcceptingApi {
        transactions: Mutex<Vec<NewTransaction>>,
        balances: Mutex<Vec<NewBalance>>,
    }

    #[async_trait]
    impl FinanceApiTrait for AcceptingApi {
        async fn register(&self, _credentials: &Credentials) -> ApiResponse<Value> {
            ApiResponse::ok(Value::Null)
        }

        async fn login(&self, _credentials: &Credentials) -> ApiResponse<LoginResponse> {
            ApiResponse::ok(LoginResponse {
                token: Some("tok".to_string()),
                user_id: Some("u-1".to_string()),
            })
        }

        async fn list_transactions(&self) -> ApiResponse<Vec<Transaction>> {
            ApiResponse::ok(Vec::new())
        }

        async fn create_transaction(&self, payload: &NewTransaction) -> ApiResponse<Transaction> {
            let mut sent = self.transactions.lock().unwrap();
            sent.push(payload.clone());
            ApiResponse::ok(Transaction {
                id: format!("srv-{}", sent.len()),
                user_id: payload.user_id.clone(),
                kind: payload.kind,
                amount: payload.amount,
                note: Some(payload.note.clone()),
                created_at: payload.created_at.clone(),
            })
        }

        async fn delete_transaction(&self, _id: &str) -> ApiResponse<Value> {
            ApiResponse::ok(Value::Null)
        }

        async fn list_balances(&self) -> ApiResponse<Vec<Balance>> {
            ApiResponse::ok(Vec::new())
        }

        async fn create_balance(&self, payload: &NewBalance) -> ApiResponse<Vec<Balance>> {
            let mut sent = self.balances.lock().unwrap();
            sent.push(payload.clone());
            ApiResponse::ok(vec![Balance {
                id: format!("bal-{}", sent.len()),
                user_id: payload.user_id.clone(),
                amount: payload.amount,
                note: Some(payload.note.clone()),
                created_at: "2026-01-01T00:00:00.000Z".to_string(),
                updated_at: None,
            }])
        }

        async fn delete_balance(&self, _id: &str) -> ApiResponse<Value> {
            ApiResponse::ok(Value::Null)
        }

        async fn get_overview(&self) -> ApiResponse<Value> {
            ApiResponse::ok(Value::Null)
        }
    }

    async fn setup() -> (Arc<ServiceContext>, Arc<AcceptingApi>) {
        let data_dir = tempdir().expect("tempdir").keep();
        let config = RuntimeConfig {
            data_dir,
            ..RuntimeConfig::default()
        };
        let api = Arc::new(AcceptingApi::default());
        let context =
            ServiceContext::initialize_with_gateway(config, SessionHandle::default(), api.clone())
                .await
                .expect("context");
        (context, api)
    }

    async fn wait_for_report(context: &ServiceContext) -> DrainReport {
        for _ in 0..100 {
            if let Some(report) = last_drain_report(context).await {
                return report;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("no drain report recorded");
    }

    #[tokio::test]
    async fn offline_records_drain_when_connectivity_returns() {
        let (context, api) = setup().await;
        context
            .session_service()
            .login(&Credentials::new("a@b.c", "pw"))
            .await;

        notify_connectivity(&context, false);
        let outcome = context
            .transaction_service()
            .create(TransactionKind::Income, dec!(50000), None)
            .await
            .expect("create");
        assert!(matches!(outcome, SubmitOutcome::Queued { .. }));
        context
            .balance_service()
            .create(dec!(1200), Some("cash".to_string()))
            .await
            .expect("create balance");
        assert_eq!(pending_counts(&context).await.expect("counts").total(), 2);

        ensure_connectivity_listener_started(Arc::clone(&context)).await;
        assert!(notify_connectivity(&context, true));

        let report = wait_for_report(&context).await;
        assert_eq!(report.pushed_count(), 2);
        assert!(report.is_clean());
        assert_eq!(pending_counts(&context).await.expect("counts").total(), 0);

        let sent = api.transactions.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_id, "u-1");
        assert_eq!(api.balances.lock().unwrap()[0].note, "cash");

        ensure_connectivity_listener_stopped(context).await;
    }

    #[tokio::test]
    async fn staying_online_does_not_trigger_a_drain() {
        let (context, _api) = setup().await;
        ensure_connectivity_listener_started(Arc::clone(&context)).await;

        assert!(!notify_connectivity(&context, true));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(last_drain_report(&context).await.is_none());
        ensure_connectivity_listener_stopped(context).await;
    }

    #[tokio::test]
    async fn listener_start_is_idempotent_and_stop_clears_it() {
        let (context, _api) = setup().await;

        ensure_connectivity_listener_started(Arc::clone(&context)).await;
        ensure_connectivity_listener_started(Arc::clone(&context)).await;
        assert!(context.sync_runtime.background_task.lock().await.is_some());

        ensure_connectivity_listener_stopped(Arc::clone(&context)).await;
        assert!(context.sync_runtime.background_task.lock().await.is_none());
    }

    #[tokio::test]
    async fn listener_exits_once_the_context_is_dropped() {
        let (context, _api) = setup().await;
        let runtime = context.sync_runtime();
        ensure_connectivity_listener_started(Arc::clone(&context)).await;
        drop(context);

        let mut finished = false;
        for _ in 0..100 {
            let guard = runtime.background_task.lock().await;
            if guard.as_ref().is_some_and(|handle| handle.is_finished()) {
                finished = true;
                break;
            }
            drop(guard);
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(finished, "listener still running after the context was dropped");
    }

    #[tokio::test]
    async fn manual_drain_records_report() {
        let (context, _api) = setup().await;
        let report = run_drain_now(&context).await;
        assert_eq!(report.pushed_count(), 0);
        assert_eq!(last_drain_report(&context).await, Some(report));
    }
}
