//! HTTP template source
//!
//! Fetches `<base-url>/<source_id>` over HTTP, the way a hosted dork
//! collection is served as static files.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{FetchError, TemplateSource};

/// Source backed by a static file server
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    http: Client,
}

impl HttpSource {
    /// Create a source rooted at `base_url` with the given request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        debug!(%base_url, ?timeout, "HttpSource::new: called");
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(FetchError::Config(format!(
                "base-url must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Full URL for a source id
    pub fn url_for(&self, source_id: &str) -> String {
        format!("{}/{}", self.base_url, source_id.trim_start_matches('/'))
    }
}

#[async_trait]
impl TemplateSource for HttpSource {
    async fn fetch(&self, source_id: &str) -> Result<String, FetchError> {
        let url = self.url_for(source_id);
        debug!(%source_id, %url, "HttpSource::fetch: called");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        debug!(%url, status = status.as_u16(), "HttpSource::fetch: response received");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(source_id.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                source_id: source_id.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    fn describe(&self) -> String {
        format!("http {}", self.base_url)
    }
}
