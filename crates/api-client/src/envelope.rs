//! Folds raw HTTP outcomes into the uniform response envelope.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use fintrack_core::gateway::{ApiResponse, DEFAULT_FAILURE_MESSAGE, DEFAULT_SUCCESS_MESSAGE};

use crate::endpoints::{Endpoint, ResponseShape};

/// Reads a response body. JSON is parsed; anything else is kept as raw text.
pub fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(text.to_string())),
    }
}

/// The body's `message` field, or the default for the outcome.
pub fn extract_message(body: Option<&Value>, success: bool) -> String {
    body.and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            if success {
                DEFAULT_SUCCESS_MESSAGE
            } else {
                DEFAULT_FAILURE_MESSAGE
            }
            .to_string()
        })
}

/// Unwraps a `data` field when present and applies the endpoint's shape.
pub fn normalize_payload(body: Option<Value>, shape: ResponseShape) -> Option<Value> {
    let payload = match body? {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Null) | None => Value::Object(map),
            Some(inner) => inner,
        },
        other => other,
    };

    match (payload, shape) {
        (Value::Null, _) => None,
        (Value::Object(map), ResponseShape::Collection) => {
            Some(Value::Array(vec![Value::Object(map)]))
        }
        (payload, _) => Some(payload),
    }
}

/// Builds the envelope for one HTTP response.
pub fn to_api_response<T: DeserializeOwned>(
    endpoint: Endpoint,
    status: u16,
    text: &str,
) -> ApiResponse<T> {
    let success = (200..300).contains(&status);
    let body = parse_body(text);
    let message = extract_message(body.as_ref(), success);

    let data = normalize_payload(body, endpoint.response_shape()).and_then(|payload| {
        match serde_json::from_value::<T>(payload) {
            Ok(data) => Some(data),
            Err(e) if success => {
                warn!(
                    "[Gateway] {} returned a payload that does not decode: {}",
                    endpoint.name(),
                    e
                );
                None
            }
            Err(e) => {
                debug!(
                    "[Gateway] {} error payload not decoded: {}",
                    endpoint.name(),
                    e
                );
                None
            }
        }
    });

    ApiResponse {
        success,
        message,
        data,
    }
}
