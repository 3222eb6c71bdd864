//! Explorer configuration, read from a TOML file.
//!
//! ```toml
//! environment = "mainnet"
//!
//! [search]
//! min_phrase_len = 3
//! quiet_period_ms = 250
//!
//! [view]
//! page_size = 10
//!
//! [log]
//! filter = "info"
//! ```
//!
//! Every key is optional. A missing file means all defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use explorer_network::SearchConfig;
use explorer_protocol::{Environment, DEFAULT_PAGE_SIZE, MIN_SEARCH_PHRASE_LEN, SEARCH_QUIET_PERIOD_MS};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub environment: Environment,
    pub search: SearchSection,
    pub view: ViewSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub min_phrase_len: usize,
    pub quiet_period_ms: u64,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            min_phrase_len: MIN_SEARCH_PHRASE_LEN,
            quiet_period_ms: SEARCH_QUIET_PERIOD_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSection {
    pub page_size: usize,
}

impl Default for ViewSection {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// `tracing_subscriber::EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl ExplorerConfig {
    /// `<config dir>/network-explorer/config.toml`, if the platform has a
    /// config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("network-explorer").join("config.toml"))
    }

    /// Load from `path`. A file that does not exist yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            min_phrase_len: self.search.min_phrase_len,
            quiet_period: Duration::from_millis(self.search.quiet_period_ms),
        }
    }
}
