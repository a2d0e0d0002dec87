use std::sync::Arc;

use log::{debug, info};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::errors::{Error, Result};
use crate::gateway::{ApiResponse, FinanceApiTrait};
use crate::session::SessionHandle;
use crate::sync::{ConnectivityMonitor, LocalStoreTrait};
use crate::transactions::{
    LocalTransaction, NewTransaction, Transaction, TransactionFilter, TransactionKind,
    TransactionTotals,
};

/// Result of a submission: sent to the server, or queued for the next drain.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<T> {
    Created(ApiResponse<T>),
    Queued { local_id: String },
}

impl<T> SubmitOutcome<T> {
    pub fn is_queued(&self) -> bool {
        matches!(self, SubmitOutcome::Queued { .. })
    }
}

pub struct TransactionService {
    api: Arc<dyn FinanceApiTrait>,
    store: Arc<dyn LocalStoreTrait>,
    connectivity: ConnectivityMonitor,
    session: SessionHandle,
}

impl TransactionService {
    pub fn new(
        api: Arc<dyn FinanceApiTrait>,
        store: Arc<dyn LocalStoreTrait>,
        connectivity: ConnectivityMonitor,
        session: SessionHandle,
    ) -> Self {
        Self {
            api,
            store,
            connectivity,
            session,
        }
    }

    pub async fn list(&self) -> ApiResponse<Vec<Transaction>> {
        self.api.list_transactions().await
    }

    /// Lists transactions, applies the filter and totals what is left.
    pub async fn list_filtered(
        &self,
        filter: &TransactionFilter,
    ) -> ApiResponse<(Vec<Transaction>, TransactionTotals)> {
        self.list().await.map(|all| {
            let kept = filter.apply(&all);
            let totals = TransactionTotals::from_transactions(&kept);
            (kept, totals)
        })
    }

    /// Creates a transaction. Online submissions go straight to the server and
    /// are never stored locally; offline ones are queued unsynced.
    pub async fn create(
        &self,
        kind: TransactionKind,
        amount: Decimal,
        note: Option<String>,
    ) -> Result<SubmitOutcome<Transaction>> {
        if amount.is_sign_negative() {
            return Err(Error::validation("Amount must not be negative"));
        }
        let user_id = self.session.user_id().unwrap_or_default();

        if self.connectivity.is_online() {
            let payload = NewTransaction::new(user_id, kind, amount, note);
            return Ok(SubmitOutcome::Created(
                self.api.create_transaction(&payload).await,
            ));
        }

        let record = LocalTransaction::queued(user_id, kind, amount, note);
        let local_id = record.local_id.clone();
        self.store.upsert(record.into()).await?;
        info!("[Sync] Queued transaction {} while offline", local_id);
        Ok(SubmitOutcome::Queued { local_id })
    }

    /// Deletes on the server. There is no offline path for deletion.
    pub async fn delete(&self, id: &str) -> ApiResponse<Value> {
        debug!("Deleting transaction {}", id);
        self.api.delete_transaction(id).await
    }
}
