//! Failures on the gateway's request path.
//!
//! They never leave the public gateway methods: [`ApiClientError::into_response`]
//! folds each one into the core envelope.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use thiserror::Error;

use fintrack_core::gateway::ApiResponse;

use crate::endpoints::Endpoint;
use crate::envelope::to_api_response;

pub type Result<T> = std::result::Result<T, ApiClientError>;

#[derive(Debug, Error)]
pub enum ApiClientError {
    /// No HTTP response was obtained.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request body could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    /// The server answered outside 2xx. The body is kept for the envelope.
    #[error("Server rejected request with status {status}")]
    Rejected { status: u16, body: String },

    #[error("Session token cannot be sent as a header")]
    InvalidToken,
}

impl ApiClientError {
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            body: body.into(),
        }
    }

    /// Folds the failure into the envelope a gateway method returns.
    ///
    /// A rejection still goes through body normalization so the server's
    /// `message` reaches the caller.
    pub fn into_response<T: DeserializeOwned>(self, endpoint: Endpoint) -> ApiResponse<T> {
        match self {
            Self::Rejected { status, body } => {
                debug!("[Gateway] {} rejected with status {}", endpoint.name(), status);
                to_api_response(endpoint, status, &body)
            }
            Self::Transport(err) => {
                debug!("[Gateway] {} network failure: {}", endpoint.name(), err);
                ApiResponse::network_error()
            }
            other => {
                warn!("[Gateway] {} request not sent: {}", endpoint.name(), other);
                ApiResponse::failed(other.to_string())
            }
        }
    }
}
