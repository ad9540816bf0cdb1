//! Errors returned by the REST client.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Backend answered with a non-success status.
    #[error("{method} {path} failed with {status}{}", suffix(.message))]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        /// Backend-provided `detail` or first `non_field_errors` entry.
        message: Option<String>,
    },

    /// HTTP/network or body decoding error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error (bad base URL, token with invalid characters).
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Config(_) => None,
        }
    }

    /// The message the backend wants shown to the user, if it sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Status { .. } => "status",
            Self::Http(e) if e.is_decode() => "decode",
            Self::Http(_) => "http",
            Self::Config(_) => "config",
        }
    }
}

fn suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    #[serde(default)]
    non_field_errors: Vec<String>,
}

/// Pulls `detail`, else the first `non_field_errors` entry, out of an error
/// body. Bodies that are not JSON objects yield `None`.
pub fn extract_backend_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .detail
        .filter(|d| !d.trim().is_empty())
        .or_else(|| parsed.non_field_errors.into_iter().next())
}
