//! HTTP gateway to the finance API.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use fintrack_core::balances::{Balance, NewBalance};
use fintrack_core::gateway::{ApiResponse, Credentials, FinanceApiTrait, LoginResponse};
use fintrack_core::session::SessionHandle;
use fintrack_core::transactions::{NewTransaction, Transaction};

use crate::endpoints::Endpoint;
use crate::envelope::to_api_response;
use crate::error::{ApiClientError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_LOG_BODY_CHARS: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Client for the finance REST API.
///
/// Every call returns an envelope; transport failures, error statuses and
/// malformed bodies never surface as `Err`.
#[derive(Debug, Clone)]
pub struct FinanceApiClient {
    client: reqwest::Client,
    base_url: String,
    session: SessionHandle,
}

impl FinanceApiClient {
    pub fn new(config: ApiClientConfig, session: SessionHandle) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(
                    "[Gateway] Failed to build HTTP client ({}), using defaults",
                    e
                );
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    fn log_response(endpoint: Endpoint, status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("[Gateway] {} response status: {}", endpoint.name(), status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!(
            "[Gateway] {} response error ({}): {}",
            endpoint.name(),
            status,
            preview
        );
    }

    /// JSON content type plus the bearer credential when the session has one.
    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.session.token() {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiClientError::InvalidToken)?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    /// Sends one request and returns the status and raw body text of a 2xx
    /// response. Any other status comes back as [`ApiClientError::Rejected`].
    async fn send(
        &self,
        endpoint: Endpoint,
        id: Option<&str>,
        body: Option<Value>,
    ) -> Result<(u16, String)> {
        let url = format!("{}{}", self.base_url, endpoint.path(id));
        debug!("[Gateway] {} {}", endpoint.method(), url);

        let mut request = self
            .client
            .request(endpoint.method(), url.as_str())
            .headers(self.headers()?);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        Self::log_response(endpoint, status, &text);
        if !status.is_success() {
            return Err(ApiClientError::rejected(status.as_u16(), text));
        }
        Ok((status.as_u16(), text))
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        id: Option<&str>,
        body: Option<Value>,
    ) -> ApiResponse<T> {
        match self.send(endpoint, id, body).await {
            Ok((status, text)) => to_api_response(endpoint, status, &text),
            Err(err) => err.into_response(endpoint),
        }
    }

    async fn call_with_body<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        payload: &B,
    ) -> ApiResponse<T> {
        match serde_json::to_value(payload) {
            Ok(body) => self.call(endpoint, None, Some(body)).await,
            Err(e) => ApiClientError::from(e).into_response(endpoint),
        }
    }
}

#[async_trait]
impl FinanceApiTrait for FinanceApiClient {
    async fn register(&self, credentials: &Credentials) -> ApiResponse<Value> {
        self.call_with_body(Endpoint::Register, credentials).await
    }

    async fn login(&self, credentials: &Credentials) -> ApiResponse<LoginResponse> {
        self.call_with_body(Endpoint::Login, credentials).await
    }

    async fn list_transactions(&self) -> ApiResponse<Vec<Transaction>> {
        self.call(Endpoint::ListTransactions, None, None).await
    }

    async fn create_transaction(&self, payload: &NewTransaction) -> ApiResponse<Transaction> {
        self.call_with_body(Endpoint::CreateTransaction, payload)
            .await
    }

    async fn delete_transaction(&self, id: &str) -> ApiResponse<Value> {
        self.call(Endpoint::DeleteTransaction, Some(id), None).await
    }

    async fn list_balances(&self) -> ApiResponse<Vec<Balance>> {
        self.call(Endpoint::ListBalances, None, None).await
    }

    async fn create_balance(&self, payload: &NewBalance) -> ApiResponse<Vec<Balance>> {
        self.call_with_body(Endpoint::CreateBalance, payload).await
    }

    async fn delete_balance(&self, id: &str) -> ApiResponse<Value> {
        self.call(Endpoint::DeleteBalance, Some(id), None).await
    }

    async fn get_overview(&self) -> ApiResponse<Value> {
        self.call(Endpoint::Overview, None, None).await
    }
}
