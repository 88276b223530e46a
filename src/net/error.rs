//! Error vocabulary for backend API calls.
//!
//! ERROR HANDLING
//! ==============
//! Every failure the API client can observe collapses into [`ApiError`]:
//! missing credentials (401, raised before any I/O), backend-reported
//! failures (the response status), and transport or parse failures (500).

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use super::api::Payload;

/// Status used for failures that never produced a usable response.
pub const TRANSPORT_FAILURE_STATUS: u16 = 500;

/// Status used when a request needs a bearer token and none is available.
pub const UNAUTHENTICATED_STATUS: u16 = 401;

const AUTH_REQUIRED_MESSAGE: &str = "Authentication required";
const GENERIC_FAILURE_MESSAGE: &str = "API request failed";
const NETWORK_ERROR_MESSAGE: &str = "Network error";

/// A failed API call: human-readable message plus transport/protocol status.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message} ({status})")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self { message: message.into(), status }
    }

    /// A token was required but the caller had none.
    pub fn unauthenticated() -> Self {
        Self::new(AUTH_REQUIRED_MESSAGE, UNAUTHENTICATED_STATUS)
    }

    /// The transport failed before a response arrived.
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self::new(NETWORK_ERROR_MESSAGE, TRANSPORT_FAILURE_STATUS);
        }
        Self::new(message, TRANSPORT_FAILURE_STATUS)
    }

    /// A payload that declared itself structured could not be decoded.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(message, TRANSPORT_FAILURE_STATUS)
    }

    /// A response outside the 2xx range. Uses the payload's `message` field
    /// when it is a structured object carrying a string there.
    pub fn response(status: u16, payload: &Payload) -> Self {
        let message = payload
            .field("message")
            .and_then(serde_json::Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_FAILURE_MESSAGE);
        Self::new(message, status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == UNAUTHENTICATED_STATUS
    }
}
