//! TemplateSource trait definition

use async_trait::async_trait;

use super::FetchError;

/// Fetch capability for dork template payloads
///
/// A source maps a template-source identifier (e.g., `websites.json`) to the
/// raw payload text. Validation of the payload belongs to the loader; a source
/// only reports whether the retrieval itself succeeded.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Retrieve the raw payload for a source identifier
    async fn fetch(&self, source_id: &str) -> Result<String, FetchError>;

    /// Short human-readable description (for logs and status output)
    fn describe(&self) -> String;
}
