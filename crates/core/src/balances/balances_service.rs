use std::sync::Arc;

use log::info;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::balances::{Balance, BalanceSummary, LocalBalance, NewBalance};
use crate::errors::{Error, Result};
use crate::gateway::{ApiResponse, FinanceApiTrait};
use crate::session::SessionHandle;
use crate::sync::{ConnectivityMonitor, LocalStoreTrait};
use crate::transactions::SubmitOutcome;

pub struct BalanceService {
    api: Arc<dyn FinanceApiTrait>,
    store: Arc<dyn LocalStoreTrait>,
    connectivity: ConnectivityMonitor,
    session: SessionHandle,
}

impl BalanceService {
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

    pub async fn list(&self) -> ApiResponse<Vec<Balance>> {
        self.api.list_balances().await
    }

    pub async fn summary(&self) -> ApiResponse<BalanceSummary> {
        self.list()
            .await
            .map(|balances| BalanceSummary::from_balances(&balances))
    }

    /// Records a balance snapshot, queuing it locally while offline.
    pub async fn create(
        &self,
        amount: Decimal,
        note: Option<String>,
    ) -> Result<SubmitOutcome<Vec<Balance>>> {
        if amount.is_sign_negative() {
            return Err(Error::validation("Amount must not be negative"));
        }
        let user_id = self.session.user_id().unwrap_or_default();

        if self.connectivity.is_online() {
            let payload = NewBalance::new(user_id, amount, note);
            return Ok(SubmitOutcome::Created(self.api.create_balance(&payload).await));
        }

        let record = LocalBalance::queued(user_id, amount, note);
        let local_id = record.local_id.clone();
        self.store.upsert(record.into()).await?;
        info!("[Sync] Queued balance {} while offline", local_id);
        Ok(SubmitOutcome::Queued { local_id })
    }

    pub async fn delete(&self, id: &str) -> ApiResponse<Value> {
        self.api.delete_balance(id).await
    }
}
