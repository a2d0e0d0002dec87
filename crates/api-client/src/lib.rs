//! Remote gateway for the fintrack client.
//!
//! Implements [`fintrack_core::gateway::FinanceApiTrait`] over reqwest. Each
//! route declares the response shape it promises, and every call result is
//! folded into the core `ApiResponse` envelope.

mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;

pub use client::{ApiClientConfig, FinanceApiClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use endpoints::{Endpoint, ResponseShape};
pub use error::ApiClientError;
