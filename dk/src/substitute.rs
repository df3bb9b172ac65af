//! Placeholder substitution
//!
//! Replaces every occurrence of [`PLACEHOLDER`] in each template's query with
//! the trimmed subject. A blank subject leaves queries untouched.

use serde::Serialize;
use tracing::debug;

use crate::templates::DorkTemplate;

/// Token replaced by the subject in a template query
pub const PLACEHOLDER: &str = "{input}";

/// A template whose query has been resolved for a subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedQuery {
    pub label: String,
    pub query: String,
    pub description: String,
}

impl ResolvedQuery {
    /// Whether the query still contains the placeholder token
    pub fn has_placeholder(&self) -> bool {
        self.query.contains(PLACEHOLDER)
    }
}

/// Resolve a single template for a subject
pub fn resolve(template: &DorkTemplate, subject: &str) -> ResolvedQuery {
    let subject = subject.trim();
    let query = if subject.is_empty() {
        template.query.clone()
    } else {
        template.query.replace(PLACEHOLDER, subject)
    };

    ResolvedQuery {
        label: template.label.clone(),
        query,
        description: template.description.clone(),
    }
}

/// Resolve every template for a subject, preserving order and length
pub fn substitute(templates: &[DorkTemplate], subject: &str) -> Vec<ResolvedQuery> {
    debug!(count = templates.len(), subject_len = subject.len(), "substitute: called");
    templates.iter().map(|t| resolve(t, subject)).collect()
}
