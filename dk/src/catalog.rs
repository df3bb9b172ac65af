//! Category catalog
//!
//! The fixed table of dork categories. Each category names the template source
//! it loads from and whether a subject must be entered before it can resolve.

use tracing::debug;

/// Prompt shown when no category is selected
pub const DEFAULT_PROMPT: &str = "Enter website, name, or search term...";

const PROMPT_PERSON: &str = "Enter name or username...";
const PROMPT_WEBSITE: &str = "Enter website (e.g., example.com)...";
const PROMPT_COMPANY: &str = "Enter company name...";

/// A dork category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Unique key (e.g., `websites`)
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Template source identifier handed to the [`TemplateSource`](crate::source::TemplateSource)
    pub source_id: &'static str,
    /// Icon shown next to the name
    pub icon: &'static str,
    /// Prompt text for the subject input
    pub prompt: &'static str,
    /// Whether a non-empty subject is required before loading
    pub requires_input: bool,
}

/// Builtin categories, in display order
pub const BUILTIN_CATEGORIES: &[Category] = &[
    Category {
        id: "people-username",
        name: "People & Username",
        source_id: "people-username.json",
        icon: "👤",
        prompt: PROMPT_PERSON,
        requires_input: true,
    },
    Category {
        id: "social-media",
        name: "Social Media",
        source_id: "social-media.json",
        icon: "📱",
        prompt: PROMPT_PERSON,
        requires_input: true,
    },
    Category {
        id: "websites",
        name: "Websites",
        source_id: "websites.json",
        icon: "🌐",
        prompt: PROMPT_WEBSITE,
        requires_input: true,
    },
    Category {
        id: "admin-portals",
        name: "Admin Portals",
        source_id: "admin-portals.json",
        icon: "🔐",
        prompt: PROMPT_WEBSITE,
        requires_input: true,
    },
    Category {
        id: "files",
        name: "Files",
        source_id: "files.json",
        icon: "📁",
        prompt: PROMPT_WEBSITE,
        requires_input: true,
    },
    Category {
        id: "sensitive-info",
        name: "Sensitive Info",
        source_id: "sensitive-info.json",
        icon: "⚠️",
        prompt: PROMPT_WEBSITE,
        requires_input: true,
    },
    Category {
        id: "vulnerabilities",
        name: "Vulnerabilities",
        source_id: "vulnerabilities.json",
        icon: "🛡️",
        prompt: PROMPT_WEBSITE,
        requires_input: true,
    },
    Category {
        id: "company-research",
        name: "Company Research",
        source_id: "company-research.json",
        icon: "🏢",
        prompt: PROMPT_COMPANY,
        requires_input: true,
    },
];

/// Read-only view over a category table
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    categories: &'static [Category],
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// Catalog over the builtin categories
    pub fn builtin() -> Self {
        Self::new(BUILTIN_CATEGORIES)
    }

    /// Catalog over a caller-supplied table
    ///
    /// The table order is the display order. Ids are expected to be unique;
    /// lookup returns the first match.
    pub fn new(categories: &'static [Category]) -> Self {
        debug!(count = categories.len(), "Catalog::new: called");
        Self { categories }
    }

    /// Look up a category by id
    pub fn get(&self, id: &str) -> Option<&'static Category> {
        debug!(%id, "Catalog::get: called");
        self.categories.iter().find(|c| c.id == id)
    }

    /// All categories in display order
    pub fn all(&self) -> &'static [Category] {
        self.categories
    }

    /// Category ids in display order
    pub fn ids(&self) -> Vec<&'static str> {
        self.categories.iter().map(|c| c.id).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
