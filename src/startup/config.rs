//! Client configuration.

use std::path::{Path, PathBuf};

use crate::adapters::default_data_dir;
use crate::api::DEFAULT_SERVER_URL;

/// Environment variable overriding the backend URL.
pub const ENV_SERVER_URL: &str = "THINKTOART_SERVER_URL";
/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "THINKTOART_DATA_DIR";
/// Environment variable holding the tracing filter.
pub const ENV_LOG: &str = "THINKTOART_LOG";

/// Default tracing filter.
pub const DEFAULT_LOG_FILTER: &str = "thinktoart=info";

const LOG_FILE: &str = "thinktoart.log";

/// Where to connect and where to keep local state.
///
/// ```ignore
/// use thinktoart::startup::ClientConfig;
///
/// let config = ClientConfig::from_env().with_server_url("https://api.example.com");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub server_url: String,
    /// Holds `session.json` and the log file.
    pub data_dir: PathBuf,
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            data_dir: default_data_dir().unwrap_or_else(|| PathBuf::from(".thinktoart")),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Defaults overridden by `THINKTOART_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(url) = non_empty(ENV_SERVER_URL) {
            config = config.with_server_url(url);
        }
        if let Some(dir) = non_empty(ENV_DATA_DIR) {
            config = config.with_data_dir(dir);
        }
        if let Some(filter) = non_empty(ENV_LOG) {
            config = config.with_log_filter(filter);
        }
        config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.server_url, "http://localhost:3000");
        assert_eq!(config.log_filter, "thinktoart=info");
        assert!(config.data_dir.ends_with(".thinktoart"));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new()
            .with_server_url("https://api.example.com")
            .with_data_dir("/tmp/tta");
        assert_eq!(config.server_url, "https://api.example.com");
        assert_eq!(config.log_path(), PathBuf::from("/tmp/tta/thinktoart.log"));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_SERVER_URL, "http://remote:4000"),
            (ENV_DATA_DIR, "/var/tta"),
            (ENV_LOG, "   "),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.server_url, "http://remote:4000");
        assert_eq!(config.data_dir, PathBuf::from("/var/tta"));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }
}
