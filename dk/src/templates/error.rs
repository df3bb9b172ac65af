//! Template loading error types

use thiserror::Error;

use crate::source::FetchError;

/// Errors that can occur while loading a category's templates
///
/// All variants are recoverable: the caller surfaces the message and, when
/// [`LoadError::is_retryable`] holds, offers a retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Template source '{source_id}' is unavailable: {cause}")]
    SourceUnavailable {
        source_id: String,
        #[source]
        cause: FetchError,
    },

    #[error("Malformed payload from '{source_id}': {reason}")]
    MalformedPayload { source_id: String, reason: String },

    #[error("Template source '{source_id}' contains no templates")]
    EmptyCatalog { source_id: String },
}

impl LoadError {
    /// The source id the failing load was issued for
    pub fn source_id(&self) -> &str {
        match self {
            LoadError::SourceUnavailable { source_id, .. } => source_id,
            LoadError::MalformedPayload { source_id, .. } => source_id,
            LoadError::EmptyCatalog { source_id } => source_id,
        }
    }

    /// Whether re-issuing the same load can succeed without changing config
    ///
    /// Payload problems count as retryable since the source may be edited in
    /// place.
    pub fn is_retryable(&self) -> bool {
        match self {
            LoadError::SourceUnavailable { cause, .. } => cause.is_retryable(),
            LoadError::MalformedPayload { .. } | LoadError::EmptyCatalog { .. } => true,
        }
    }

    /// Short stable name for the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::SourceUnavailable { .. } => "source-unavailable",
            LoadError::MalformedPayload { .. } => "malformed-payload",
            LoadError::EmptyCatalog { .. } => "empty-catalog",
        }
    }
}
