//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors from LLM provider calls
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network-level failure (connect, timeout, TLS)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status from the provider
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Provider asked us to back off
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration problem (missing API key, bad provider)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Whether a caller could reasonably retry the request later.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited { .. } => true,
            Self::ApiError { status, .. } => matches!(status, 408 | 429 | 500 | 502 | 503 | 504),
            Self::InvalidResponse(_) | Self::Config(_) => false,
        }
    }
}
