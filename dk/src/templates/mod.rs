//! Dork templates and loading
//!
//! A template is a parameterized dork pattern: a short label, a query that may
//! contain the [`PLACEHOLDER`](crate::substitute::PLACEHOLDER) token, and a
//! description.

use serde::{Deserialize, Serialize};

mod error;
mod loader;

pub use error::LoadError;
pub use loader::{TemplateLoader, parse_payload};

/// A parameterized dork as loaded from a template source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DorkTemplate {
    /// Short title
    pub label: String,
    /// Query pattern
    pub query: String,
    /// What the query finds
    pub description: String,
}

impl DorkTemplate {
    pub fn new(label: impl Into<String>, query: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            query: query.into(),
            description: description.into(),
        }
    }
}
