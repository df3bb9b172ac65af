//! Selection episode data
//!
//! Pure data describing the live (category, subject, load state) unit. No
//! loading logic here.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::catalog::{Category, DEFAULT_PROMPT};
use crate::filter::filter;
use crate::substitute::ResolvedQuery;
use crate::templates::LoadError;

/// Load state of the current episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// No category chosen
    #[default]
    Idle,
    /// Template fetch in flight
    Loading,
    /// Templates loaded and substituted
    Resolved,
    /// Load failed
    Error,
}

impl LoadPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Resolved => "resolved",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Resolved queries together with the (category, subject) pair they belong to
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSet {
    pub category: Category,
    pub subject: String,
    pub queries: Vec<ResolvedQuery>,
    pub loaded_at: DateTime<Utc>,
}

/// Snapshot of the live selection episode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Episode {
    /// Active category, if any
    pub category: Option<Category>,
    /// Subject as last entered (untrimmed)
    pub subject: String,
    /// Load state
    pub phase: LoadPhase,
    /// Present only in `Resolved`
    pub resolved: Option<ResolvedSet>,
    /// Present only in `Error`
    pub error: Option<LoadError>,
    /// Live filter keyword
    pub keyword: String,
    /// Sequence number of the most recently issued load
    pub seq: u64,
}

impl Episode {
    /// Resolved queries after applying the filter keyword
    pub fn visible(&self) -> Vec<ResolvedQuery> {
        match &self.resolved {
            Some(set) => filter(&set.queries, &self.keyword),
            None => Vec::new(),
        }
    }

    /// Prompt text for the subject input
    pub fn prompt(&self) -> &'static str {
        self.category.map(|c| c.prompt).unwrap_or(DEFAULT_PROMPT)
    }

    /// Trimmed subject, if non-empty
    pub fn target(&self) -> Option<&str> {
        let subject = self.subject.trim();
        if subject.is_empty() { None } else { Some(subject) }
    }
}

/// Outcome of a controller operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A load settled and its result was applied (episode is now `Resolved` or `Error`)
    Applied,
    /// A newer load was issued before this one settled; its result was dropped
    Superseded,
    /// The category requires a subject and none is present; nothing changed
    NeedsSubject,
    /// Queries were re-resolved over the already-loaded templates
    Resubstituted,
    /// Nothing to do in the current state
    Ignored,
}

/// Caller errors from the session controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}
