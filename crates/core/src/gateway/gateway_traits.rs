use async_trait::async_trait;
use serde_json::Value;

use crate::balances::{Balance, NewBalance};
use crate::gateway::{ApiResponse, Credentials, LoginResponse};
use crate::transactions::{NewTransaction, Transaction};

/// Remote API contract consumed by services and the sync reconciler.
///
/// Implementations never fail: every outcome, including an unreachable server,
/// comes back as an [`ApiResponse`].
#[async_trait]
pub trait FinanceApiTrait: Send + Sync {
    /// POST /auth/register
    async fn register(&self, credentials: &Credentials) -> ApiResponse<Value>;

    /// POST /auth/login
    async fn login(&self, credentials: &Credentials) -> ApiResponse<LoginResponse>;

    /// GET /transactions
    async fn list_transactions(&self) -> ApiResponse<Vec<Transaction>>;

    /// POST /transactions
    async fn create_transaction(&self, payload: &NewTransaction) -> ApiResponse<Transaction>;

    /// DELETE /transactions/:id
    async fn delete_transaction(&self, id: &str) -> ApiResponse<Value>;

    /// GET /balance
    async fn list_balances(&self) -> ApiResponse<Vec<Balance>>;

    /// POST /balance
    ///
    /// The endpoint is collection-typed: a lone inserted record is returned as a
    /// one-element list.
    async fn create_balance(&self, payload: &NewBalance) -> ApiResponse<Vec<Balance>>;

    /// DELETE /balance/:id
    async fn delete_balance(&self, id: &str) -> ApiResponse<Value>;

    /// GET /overview, left untyped so the aggregator can coerce it.
    async fn get_overview(&self) -> ApiResponse<Value>;
}
