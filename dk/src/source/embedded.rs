//! Embedded template source
//!
//! The builtin dork payloads are compiled into the binary from the `dorks/`
//! directory at build time.

use async_trait::async_trait;
use tracing::debug;

use super::{FetchError, TemplateSource};

pub const PEOPLE_USERNAME: &str = include_str!("../../dorks/people-username.json");
pub const SOCIAL_MEDIA: &str = include_str!("../../dorks/social-media.json");
pub const WEBSITES: &str = include_str!("../../dorks/websites.json");
pub const ADMIN_PORTALS: &str = include_str!("../../dorks/admin-portals.json");
pub const FILES: &str = include_str!("../../dorks/files.json");
pub const SENSITIVE_INFO: &str = include_str!("../../dorks/sensitive-info.json");
pub const VULNERABILITIES: &str = include_str!("../../dorks/vulnerabilities.json");
pub const COMPANY_RESEARCH: &str = include_str!("../../dorks/company-research.json");

/// Get the embedded payload by source id
pub fn get_embedded(source_id: &str) -> Option<&'static str> {
    debug!(%source_id, "get_embedded: called");
    match source_id {
        "people-username.json" => Some(PEOPLE_USERNAME),
        "social-media.json" => Some(SOCIAL_MEDIA),
        "websites.json" => Some(WEBSITES),
        "admin-portals.json" => Some(ADMIN_PORTALS),
        "files.json" => Some(FILES),
        "sensitive-info.json" => Some(SENSITIVE_INFO),
        "vulnerabilities.json" => Some(VULNERABILITIES),
        "company-research.json" => Some(COMPANY_RESEARCH),
        _ => {
            debug!(%source_id, "get_embedded: no match found");
            None
        }
    }
}

/// Source backed by the compiled-in payloads
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedSource;

impl EmbeddedSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TemplateSource for EmbeddedSource {
    async fn fetch(&self, source_id: &str) -> Result<String, FetchError> {
        debug!(%source_id, "EmbeddedSource::fetch: called");
        get_embedded(source_id)
            .map(str::to_string)
            .ok_or_else(|| FetchError::NotFound(source_id.to_string()))
    }

    fn describe(&self) -> String {
        "embedded".to_string()
    }
}
