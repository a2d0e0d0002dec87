//! In-memory fakes of the store and gateway contracts for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::balances::{Balance, NewBalance};
use crate::errors::{DatabaseError, Error, Result};
use crate::gateway::{ApiResponse, Credentials, FinanceApiTrait, LoginResponse};
use crate::session::SessionStore;
use crate::sync::{LocalRecord, LocalStoreTrait, PendingCounts, SyncCollection, SyncFlag};
use crate::transactions::{NewTransaction, Transaction};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap()
}

#[derive(Default)]
pub struct MemoryLocalStore {
    records: Mutex<Vec<LocalRecord>>,
    fail_marks: AtomicBool,
    fail_upserts: AtomicBool,
    fail_queries_for: Mutex<Option<SyncCollection>>,
}

impl MemoryLocalStore {
    pub fn seed(&self, record: LocalRecord) {
        let mut records = lock(&self.records);
        match records
            .iter_mut()
            .find(|r| r.collection() == record.collection() && r.local_id() == record.local_id())
        {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    pub fn get(&self, collection: SyncCollection, local_id: &str) -> Option<LocalRecord> {
        lock(&self.records)
            .iter()
            .find(|r| r.collection() == collection && r.local_id() == local_id)
            .cloned()
    }

    pub fn all(&self, collection: SyncCollection) -> Vec<LocalRecord> {
        lock(&self.records)
            .iter()
            .filter(|r| r.collection() == collection)
            .cloned()
            .collect()
    }

    pub fn query_unsynced_now(&self, collection: SyncCollection) -> Vec<LocalRecord> {
        self.all(collection)
            .into_iter()
            .filter(|r| !r.synced().is_synced())
            .collect()
    }

    pub fn fail_marks(&self, fail: bool) {
        self.fail_marks.store(fail, Ordering::SeqCst);
    }

    pub fn fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_queries_for(&self, collection: Option<SyncCollection>) {
        *lock(&self.fail_queries_for) = collection;
    }

    fn unavailable() -> Error {
        Error::Database(DatabaseError::ConnectionFailed("store unavailable".to_string()))
    }
}

#[async_trait]
impl LocalStoreTrait for MemoryLocalStore {
    async fn upsert(&self, record: LocalRecord) -> Result<()> {
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.seed(record);
        Ok(())
    }

    async fn query_unsynced(&self, collection: SyncCollection) -> Result<Vec<LocalRecord>> {
        if *lock(&self.fail_queries_for) == Some(collection) {
            return Err(Self::unavailable());
        }
        Ok(self.query_unsynced_now(collection))
    }

    async fn mark_synced(
        &self,
        collection: SyncCollection,
        local_id: &str,
        server_id: Option<String>,
    ) -> Result<()> {
        if self.fail_marks.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let mut records = lock(&self.records);
        let Some(record) = records
            .iter_mut()
            .find(|r| r.collection() == collection && r.local_id() == local_id)
        else {
            return Ok(());
        };
        match record {
            LocalRecord::Transaction(txn) => {
                txn.synced = SyncFlag::Synced;
                if server_id.is_some() {
                    txn.server_id = server_id;
                }
            }
            LocalRecord::Balance(balance) => {
                balance.synced = SyncFlag::Synced;
                if server_id.is_some() {
                    balance.server_id = server_id;
                }
            }
        }
        Ok(())
    }

    async fn find(
        &self,
        collection: SyncCollection,
        local_id: &str,
    ) -> Result<Option<LocalRecord>> {
        Ok(self.get(collection, local_id))
    }

    async fn pending_counts(&self) -> Result<PendingCounts> {
        Ok(PendingCounts {
            transactions: self.query_unsynced_now(SyncCollection::Transactions).len(),
            balances: self.query_unsynced_now(SyncCollection::Balances).len(),
        })
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn insert(&self, key: &str, value: &str) {
        lock(&self.values).insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        Ok(self.value(key))
    }

    async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.insert(key, value);
        Ok(())
    }

    async fn delete_value(&self, key: &str) -> Result<()> {
        lock(&self.values).remove(key);
        Ok(())
    }
}

/// Scriptable gateway. Accepts every submission unless told otherwise and
/// remembers what it accepted so list calls return it.
#[derive(Default)]
pub struct FakeApi {
    login_response: Mutex<Option<ApiResponse<LoginResponse>>>,
    transaction_ids: Mutex<VecDeque<String>>,
    balance_ids: Mutex<VecDeque<String>>,
    next_transaction_failures: Mutex<VecDeque<ApiResponse<Transaction>>>,
    all_transactions_fail: Mutex<Option<ApiResponse<Transaction>>>,
    submitted_transactions: Mutex<Vec<NewTransaction>>,
    submitted_balances: Mutex<Vec<NewBalance>>,
    stored_transactions: Mutex<Vec<Transaction>>,
    stored_balances: Mutex<Vec<Balance>>,
    deleted: Mutex<Vec<String>>,
    overview: Mutex<Option<ApiResponse<Value>>>,
    omit_created_ids: AtomicBool,
    delay_ms: AtomicU64,
    sequence: AtomicUsize,
}

impl FakeApi {
    pub fn set_login_response(&self, response: ApiResponse<LoginResponse>) {
        *lock(&self.login_response) = Some(response);
    }

    pub fn push_transaction_id(&self, id: &str) {
        lock(&self.transaction_ids).push_back(id.to_string());
    }

    pub fn push_balance_id(&self, id: &str) {
        lock(&self.balance_ids).push_back(id.to_string());
    }

    pub fn fail_next_transaction(&self, response: ApiResponse<Transaction>) {
        lock(&self.next_transaction_failures).push_back(response);
    }

    pub fn fail_all_transactions(&self, response: ApiResponse<Transaction>) {
        *lock(&self.all_transactions_fail) = Some(response);
    }

    /// Creates succeed with an empty body, so no server id comes back.
    pub fn accept_without_ids(&self) {
        self.omit_created_ids.store(true, Ordering::SeqCst);
    }

    fn accepted_without_body<T>(&self) -> Option<ApiResponse<T>> {
        self.omit_created_ids
            .load(Ordering::SeqCst)
            .then(|| ApiResponse {
                success: true,
                message: "OK".to_string(),
                data: None,
            })
    }

    pub fn set_overview(&self, response: ApiResponse<Value>) {
        *lock(&self.overview) = Some(response);
    }

    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    pub fn created_transactions(&self) -> Vec<NewTransaction> {
        lock(&self.submitted_transactions).clone()
    }

    pub fn created_balances(&self) -> Vec<NewBalance> {
        lock(&self.submitted_balances).clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        lock(&self.deleted).clone()
    }

    async fn simulate_latency(&self) {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }

    fn next_id(&self, queue: &Mutex<VecDeque<String>>, prefix: &str) -> String {
        lock(queue).pop_front().unwrap_or_else(|| {
            format!("{}-{}", prefix, self.sequence.fetch_add(1, Ordering::SeqCst))
        })
    }
}

#[async_trait]
impl FinanceApiTrait for FakeApi {
    async fn register(&self, _credentials: &Credentials) -> ApiResponse<Value> {
        ApiResponse::ok(Value::Null)
    }

    async fn login(&self, _credentials: &Credentials) -> ApiResponse<LoginResponse> {
        lock(&self.login_response)
            .clone()
            .unwrap_or_else(|| ApiResponse::failed("Failed"))
    }

    async fn list_transactions(&self) -> ApiResponse<Vec<Transaction>> {
        ApiResponse::ok(lock(&self.stored_transactions).clone())
    }

    async fn create_transaction(&self, payload: &NewTransaction) -> ApiResponse<Transaction> {
        self.simulate_latency().await;
        lock(&self.submitted_transactions).push(payload.clone());

        if let Some(failure) = lock(&self.all_transactions_fail).clone() {
            return failure;
        }
        if let Some(failure) = lock(&self.next_transaction_failures).pop_front() {
            return failure;
        }
        if let Some(accepted) = self.accepted_without_body() {
            return accepted;
        }

        let created = Transaction {
            id: self.next_id(&self.transaction_ids, "srv-txn"),
            user_id: payload.user_id.clone(),
            kind: payload.kind,
            amount: payload.amount,
            note: Some(payload.note.clone()),
            created_at: payload.created_at.clone(),
        };
        lock(&self.stored_transactions).push(created.clone());
        ApiResponse::ok(created)
    }

    async fn delete_transaction(&self, id: &str) -> ApiResponse<Value> {
        lock(&self.deleted).push(id.to_string());
        lock(&self.stored_transactions).retain(|t| t.id != id);
        ApiResponse::ok(Value::Null)
    }

    async fn list_balances(&self) -> ApiResponse<Vec<Balance>> {
        ApiResponse::ok(lock(&self.stored_balances).clone())
    }

    async fn create_balance(&self, payload: &NewBalance) -> ApiResponse<Vec<Balance>> {
        self.simulate_latency().await;
        lock(&self.submitted_balances).push(payload.clone());
        if let Some(accepted) = self.accepted_without_body() {
            return accepted;
        }

        let created = Balance {
            id: self.next_id(&self.balance_ids, "srv-bal"),
            user_id: payload.user_id.clone(),
            amount: payload.amount,
            note: Some(payload.note.clone()),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: None,
        };
        lock(&self.stored_balances).insert(0, created.clone());
        ApiResponse::ok(vec![created])
    }

    async fn delete_balance(&self, id: &str) -> ApiResponse<Value> {
        lock(&self.deleted).push(id.to_string());
        lock(&self.stored_balances).retain(|b| b.id != id);
        ApiResponse::ok(Value::Null)
    }

    async fn get_overview(&self) -> ApiResponse<Value> {
        lock(&self.overview)
            .clone()
            .unwrap_or_else(ApiResponse::network_error)
    }
}
