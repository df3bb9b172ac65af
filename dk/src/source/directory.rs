//! Directory template source
//!
//! Reads `<dir>/<source_id>` from disk, so users can maintain their own dork
//! collections next to the builtin ones.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{FetchError, TemplateSource};

/// Source backed by a directory of JSON files
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        debug!(?dir, "DirectorySource::new: called");
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a source id to a path inside the directory
    ///
    /// Ids are plain file names; anything that would step outside the
    /// directory is treated as missing.
    fn path_for(&self, source_id: &str) -> Option<PathBuf> {
        if source_id.is_empty() || source_id.contains(['/', '\\']) || source_id.contains("..") {
            debug!(%source_id, "DirectorySource::path_for: rejecting id");
            return None;
        }
        Some(self.dir.join(source_id))
    }
}

#[async_trait]
impl TemplateSource for DirectorySource {
    async fn fetch(&self, source_id: &str) -> Result<String, FetchError> {
        debug!(%source_id, dir = ?self.dir, "DirectorySource::fetch: called");
        let path = self
            .path_for(source_id)
            .ok_or_else(|| FetchError::NotFound(source_id.to_string()))?;

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                debug!(?path, content_len = content.len(), "DirectorySource::fetch: read file");
                Ok(content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(?path, "DirectorySource::fetch: file not found");
                Err(FetchError::NotFound(source_id.to_string()))
            }
            Err(e) => {
                debug!(?path, error = %e, "DirectorySource::fetch: read failed");
                Err(FetchError::Transport(format!("Failed to read {}: {}", path.display(), e)))
            }
        }
    }

    fn describe(&self) -> String {
        format!("directory {}", self.dir.display())
    }
}
