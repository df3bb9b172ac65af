//! Custom query composer
//!
//! Assembles a free-form dork from individually edited operator fields.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Search operators the composer knows, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Site,
    Inurl,
    Intext,
    Intitle,
    Filetype,
}

impl Operator {
    /// All operators in emission order
    pub const ALL: [Operator; 5] = [
        Operator::Site,
        Operator::Inurl,
        Operator::Intext,
        Operator::Intitle,
        Operator::Filetype,
    ];

    /// Operator keyword as written in a query
    pub fn name(&self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Inurl => "inurl",
            Self::Intext => "intext",
            Self::Intitle => "intitle",
            Self::Filetype => "filetype",
        }
    }

    /// Phrase operators get their value wrapped in double quotes
    pub fn is_quoted(&self) -> bool {
        matches!(self, Self::Intext | Self::Intitle)
    }

    /// Parse an operator keyword
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Operator values for a custom dork
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomDorkSpec {
    pub site: Option<String>,
    pub inurl: Option<String>,
    pub intext: Option<String>,
    pub intitle: Option<String>,
    pub filetype: Option<String>,
}

impl CustomDorkSpec {
    /// Value currently set for an operator
    pub fn get(&self, op: Operator) -> Option<&str> {
        match op {
            Operator::Site => self.site.as_deref(),
            Operator::Inurl => self.inurl.as_deref(),
            Operator::Intext => self.intext.as_deref(),
            Operator::Intitle => self.intitle.as_deref(),
            Operator::Filetype => self.filetype.as_deref(),
        }
    }

    /// Set (or clear, with `None`) the value for an operator
    pub fn set(&mut self, op: Operator, value: Option<String>) {
        let slot = match op {
            Operator::Site => &mut self.site,
            Operator::Inurl => &mut self.inurl,
            Operator::Intext => &mut self.intext,
            Operator::Intitle => &mut self.intitle,
            Operator::Filetype => &mut self.filetype,
        };
        *slot = value;
    }

    /// True when no operator would be emitted
    pub fn is_blank(&self) -> bool {
        Operator::ALL
            .iter()
            .all(|op| self.get(*op).is_none_or(|v| v.trim().is_empty()))
    }
}

/// Build the query string for a custom spec
///
/// Returns an empty string when every field is blank; callers treat that as
/// nothing to execute.
pub fn compose(spec: &CustomDorkSpec) -> String {
    debug!(?spec, "compose: called");
    let parts: Vec<String> = Operator::ALL
        .iter()
        .filter_map(|op| {
            let value = spec.get(*op)?.trim();
            if value.is_empty() {
                return None;
            }
            Some(if op.is_quoted() {
                format!("{}:\"{}\"", op.name(), value)
            } else {
                format!("{}:{}", op.name(), value)
            })
        })
        .collect();

    parts.join(" ")
}
