//! Template source error types

use thiserror::Error;

/// Errors raised by a [`TemplateSource`](super::TemplateSource) fetch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Template source not found: {0}")]
    NotFound(String),

    #[error("HTTP error {status} fetching {source_id}")]
    Status { status: u16, source_id: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid source configuration: {0}")]
    Config(String),
}

impl FetchError {
    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        match self {
            FetchError::NotFound(_) => true,
            FetchError::Status { status, .. } => *status == 404,
            _ => false,
        }
    }

    /// Check if retrying the same fetch could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::NotFound(_) => true,
            FetchError::Status { status, .. } => *status == 404 || *status == 408 || *status == 429 || *status >= 500,
            FetchError::Transport(_) => true,
            FetchError::Config(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}
