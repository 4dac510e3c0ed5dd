//! Client config load/save for `~/.album-chat/config.yaml` (api.*, query.*).

use std::path::{Path, PathBuf};

use crate::client::{BASE_URL_ENV, DEFAULT_BASE_URL};
use crate::messages::DEFAULT_RESULT_LIMIT;

/// API section (base_url).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ApiSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Query section (result_limit, the advisory `k` sent with each request).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct QuerySection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_limit: Option<u32>,
}

/// Full client config.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub query: QuerySection,
}

impl Config {
    /// Result limit from config, or the default of 10.
    pub fn result_limit(&self) -> u32 {
        self.query.result_limit.unwrap_or(DEFAULT_RESULT_LIMIT)
    }
}

/// Resolve the backend base URL: `ALBUM_CHAT_API_URL` env var first, then
/// `api.base_url` from config, then the local default. Resolved once at
/// startup; the client holds the result for its lifetime.
pub fn resolve_base_url(config: &Config) -> String {
    if let Ok(url) = std::env::var(BASE_URL_ENV) {
        if !url.is_empty() {
            return url;
        }
    }
    config
        .api
        .base_url
        .clone()
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Returns the default config file path: `~/.album-chat/config.yaml`
/// (platform-specific home directory).
pub fn default_config_path() -> Option<PathBuf> {
    let home = home_dir()?;
    Some(home.join(".album-chat").join("config.yaml"))
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(windows)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(not(any(unix, windows)))]
fn home_dir() -> Option<PathBuf> {
    None
}

/// Load config from a YAML file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Io(e.to_string()))
}

/// Save config to a YAML file. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
    }
    let contents = serde_yaml::to_string(config).map_err(|e| ConfigError::Io(e.to_string()))?;
    std::fs::write(path, contents).map_err(|e| ConfigError::Io(e.to_string()))
}

/// Config load/save error.
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(s) => write!(f, "IO error: {}", s),
        }
    }
}

impl std::error::Error for ConfigError {}
