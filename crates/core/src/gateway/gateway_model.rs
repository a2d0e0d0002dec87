//! Envelope and authentication payloads exchanged with the remote API.

use serde::{Deserialize, Serialize};

/// Message used when no response could be obtained at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";
/// Message used for a 2xx response that carries no message of its own.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "OK";
/// Message used for a non-2xx response that carries no message of its own.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed";

/// Uniform result of every remote API call.
///
/// Transport failures, HTTP errors and malformed bodies are all represented
/// here instead of being raised, so callers only ever branch on `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            data: Some(data),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    pub fn network_error() -> Self {
        Self::failed(NETWORK_ERROR_MESSAGE)
    }

    /// Maps the payload while keeping `success` and `message`.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            message: self.message,
            data: self.data.map(f),
        }
    }
}

/// Email/password pair used by both register and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Body returned by `POST /auth/login`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "_id", default)]
    pub user_id: Option<String>,
}
