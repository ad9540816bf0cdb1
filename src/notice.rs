//! Transient user-facing messages produced by weighting operations.

use strum::Display;

use crate::settings::Messages;
use crate::weightings::WeightingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Budget and input failures carry their own breakdown. Transport
    /// failures show the backend's message verbatim when it sent one, else
    /// the configured fallback.
    pub fn from_error(err: &WeightingError, messages: &Messages) -> Self {
        let message = match err {
            WeightingError::Api(api) => api
                .backend_message()
                .map(str::to_string)
                .unwrap_or_else(|| messages.fallback_error.clone()),
            other => other.to_string(),
        };
        Self::error(message)
    }
}
