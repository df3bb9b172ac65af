//! dorkkit configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::dispatch::{DEFAULT_SEARCH_URL, SearchTarget};

/// Project-local config file name
const LOCAL_CONFIG: &str = ".dorkkit.yml";

/// Main dorkkit configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Where dork templates come from
    pub source: SourceConfig,

    /// Search destination
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .dorkkit.yml
        let local_config = PathBuf::from(LOCAL_CONFIG);
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/dorkkit/dorkkit.yml
        if let Some(user_config) = Self::user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialised
    ///
    /// Follows the same fallback chain as [`Config::load`] but never fails:
    /// an unreadable file just yields `None`.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates: Vec<PathBuf> = match config_path {
            Some(path) => vec![path.clone()],
            None => std::iter::once(PathBuf::from(LOCAL_CONFIG))
                .chain(Self::user_config_path())
                .collect(),
        };

        candidates
            .iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dorkkit").join("dorkkit.yml"))
    }
}

/// Kind of template source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Payloads compiled into the binary
    #[default]
    Embedded,
    /// `<directory>/<source-id>` on disk
    Directory,
    /// `<base-url>/<source-id>` over HTTP
    Http,
}

/// Template source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,

    /// Directory holding `<source-id>` files (kind: directory)
    pub directory: Option<PathBuf>,

    /// Base URL payloads are fetched from (kind: http)
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds (kind: http)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Embedded,
            directory: None,
            base_url: None,
            timeout_ms: 10_000,
        }
    }
}

/// Search destination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search endpoint; the query is appended as `?q=...`
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_URL.to_string(),
        }
    }
}

impl SearchConfig {
    pub fn target(&self) -> SearchTarget {
        SearchTarget::new(self.base_url.clone())
    }
}
