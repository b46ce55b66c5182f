//! Normalized error shape for outbound calls.
//!
//! Every adapter call resolves to `Result<T, ApiError>`. Containers never let
//! an `ApiError` escape; they store [`ApiError::user_message`] in their own
//! error field.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors produced by the HTTP adapters.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or a generic description.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// A request URL could not be built from the configured base URL.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

/// Error body shapes the backend uses: `{message}` from the REST API,
/// `{error}` from the catalog proxy.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    /// Build a status error from a response body.
    ///
    /// Prefers the body's `message` field, then `error`, then a generic
    /// `Request failed with status code N`.
    #[must_use]
    pub fn from_body(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));

        Self::Status {
            status: status.as_u16(),
            message,
        }
    }

    /// The message to show the user.
    ///
    /// Server-provided messages are returned unchanged.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status, if the server responded.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
