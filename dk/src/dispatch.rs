//! Search destination formatting
//!
//! Turns a final query string into the URL handed to whatever opens it. The
//! query must be fully resolved: no placeholder left and no operator without
//! a value.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::substitute::PLACEHOLDER;

/// Default search endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";

/// Operator keyword followed by nothing (whitespace or end of query)
static DANGLING_OPERATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[\s(\-])(site|inurl|intext|intitle|filetype|ext|related|allintext|allintitle|allinurl):(?:\s|$)")
        .expect("dangling operator pattern is valid")
});

/// Reasons a query cannot be dispatched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Nothing to search: query is empty")]
    EmptyQuery,

    #[error("Query still contains the {{input}} placeholder; enter a subject first")]
    UnresolvedPlaceholder,

    #[error("Operator '{0}:' has no value")]
    DanglingOperator(String),
}

/// Check that a query is ready to hand off
pub fn validate(query: &str) -> Result<(), DispatchError> {
    debug!(%query, "validate: called");
    if query.trim().is_empty() {
        return Err(DispatchError::EmptyQuery);
    }
    if query.contains(PLACEHOLDER) {
        return Err(DispatchError::UnresolvedPlaceholder);
    }
    if let Some(caps) = DANGLING_OPERATOR.captures(query) {
        return Err(DispatchError::DanglingOperator(caps[1].to_lowercase()));
    }
    Ok(())
}

/// Search engine endpoint queries are dispatched to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTarget {
    base_url: String,
}

impl Default for SearchTarget {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_URL)
    }
}

impl SearchTarget {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Destination URL for a query: `<base>?q=<percent-encoded query>`
    pub fn url_for(&self, query: &str) -> Result<String, DispatchError> {
        validate(query)?;
        let url = format!("{}?q={}", self.base_url, urlencoding::encode(query));
        debug!(%url, "SearchTarget::url_for: built");
        Ok(url)
    }
}

/// Destination URL on the default search engine
pub fn search_url(query: &str) -> Result<String, DispatchError> {
    SearchTarget::default().url_for(query)
}
