//! Errors from the REST boundary.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::storage::StorageError;

/// Failure of a single API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response reached us (connect, timeout, TLS...).
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}")]
    Status {
        status: StatusCode,
        /// Human-readable `message` field of the error body, if any.
        message: Option<String>,
    },

    /// A success response whose body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// Reading the stored token failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Message supplied by the server in the error body.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Server message if present, otherwise `fallback`.
    ///
    /// This is the only form in which API failures reach the user.
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Pull a usable `message` out of an error response body.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}
