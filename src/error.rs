//! Errors surfaced by the Alert API gateway

use thiserror::Error;

/// Result alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Error that can occur while talking to the Alert API.
///
/// The gateway never retries or reinterprets these; callers decide whether to
/// fall back, surface, or log them.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network failure before a response arrived.
    #[error("transport error during {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response.
    #[error("{operation} failed with HTTP {status}: {body}")]
    HttpStatus {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// The addressed resource does not exist.
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Response body did not match the expected shape.
    #[error("failed to decode {operation} response: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },

    /// Client-side precondition failed; nothing was sent.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Gateway could not be built from the given settings.
    #[error("invalid gateway configuration: {0}")]
    InvalidConfig(String),
}

impl GatewayError {
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::HttpStatus { status, .. } => Some(*status),
            GatewayError::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Whether repeating the same call later could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Transport { .. } => true,
            GatewayError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
