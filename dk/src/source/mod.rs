//! Template sources
//!
//! A template source is the fetch capability the loader calls through. Three
//! implementations ship with the crate:
//!
//! - [`EmbeddedSource`] - builtin payloads compiled into the binary
//! - [`DirectorySource`] - JSON files in a local directory
//! - [`HttpSource`] - JSON files served over HTTP

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

mod directory;
pub mod embedded;
mod error;
pub mod fetch;
mod http;

pub use directory::DirectorySource;
pub use embedded::EmbeddedSource;
pub use error::FetchError;
pub use fetch::TemplateSource;
pub use http::HttpSource;

use crate::config::{SourceConfig, SourceKind};

/// Create a template source from configuration
pub fn create_source(config: &SourceConfig) -> Result<Arc<dyn TemplateSource>, FetchError> {
    debug!(kind = ?config.kind, "create_source: called");
    match config.kind {
        SourceKind::Embedded => {
            debug!("create_source: creating embedded source");
            Ok(Arc::new(EmbeddedSource::new()))
        }
        SourceKind::Directory => {
            let dir = config
                .directory
                .as_ref()
                .ok_or_else(|| FetchError::Config("source.directory is required for kind 'directory'".to_string()))?;
            debug!(?dir, "create_source: creating directory source");
            Ok(Arc::new(DirectorySource::new(dir)))
        }
        SourceKind::Http => {
            let base_url = config
                .base_url
                .as_deref()
                .ok_or_else(|| FetchError::Config("source.base-url is required for kind 'http'".to_string()))?;
            debug!(%base_url, "create_source: creating http source");
            Ok(Arc::new(HttpSource::new(
                base_url,
                Duration::from_millis(config.timeout_ms),
            )?))
        }
    }
}
