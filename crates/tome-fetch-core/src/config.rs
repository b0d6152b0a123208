//! Client configuration
//!
//! Connection details for the server, read from
//! `<config_dir>/tome-fetch/config.json` with environment overrides. No
//! download setting is ever stored here; those belong to the server.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:4567";

const ENV_SERVER_URL: &str = "TOME_FETCH_SERVER_URL";
const ENV_USERNAME: &str = "TOME_FETCH_USERNAME";
const ENV_PASSWORD: &str = "TOME_FETCH_PASSWORD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            username: None,
            password: None,
            request_timeout_secs: 30,
        }
    }
}

/// Get the config file path
pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tome-fetch")
        .join("config.json")
}

impl ClientConfig {
    /// Load from the default location and apply environment overrides
    pub fn load() -> Result<Self> {
        let path = get_config_path();
        log::info!("Loading configuration from: {:?}", path);

        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply overrides looked up by environment variable name
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVER_URL) {
            self.server_url = url;
        }
        if let Some(user) = lookup(ENV_USERNAME) {
            self.username = Some(user).filter(|s| !s.is_empty());
        }
        if let Some(pass) = lookup(ENV_PASSWORD) {
            self.password = Some(pass).filter(|s| !s.is_empty());
        }
    }

    /// Check the server URL and normalize its trailing slash
    pub fn validate(&mut self) -> Result<()> {
        let url = self.server_url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::InvalidInput(format!(
                "server URL must start with http:// or https://, got {:?}",
                self.server_url
            )));
        }
        self.server_url = url.to_string();
        Ok(())
    }

    /// GraphQL endpoint on the configured server
    pub fn graphql_url(&self) -> String {
        format!("{}/api/graphql", self.server_url.trim_end_matches('/'))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("tome-fetch-test-missing").join("config.json");
        assert_eq!(ClientConfig::load_from(&path).unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = std::env::temp_dir().join(format!("tome-fetch-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"server_url":"https://manga.example.org/"}"#).unwrap();

        let mut config = ClientConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        config.validate().unwrap();
        assert_eq!(config.server_url, "https://manga.example.org");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.graphql_url(), "https://manga.example.org/api/graphql");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let path = std::env::temp_dir().join(format!("tome-fetch-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        let result = ClientConfig::load_from(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        config.apply_overrides(|key| match key {
            "TOME_FETCH_SERVER_URL" => Some("http://nas:4567".to_string()),
            "TOME_FETCH_USERNAME" => Some("reader".to_string()),
            "TOME_FETCH_PASSWORD" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.server_url, "http://nas:4567");
        assert_eq!(config.username.as_deref(), Some("reader"));
        assert_eq!(config.password, None);
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = ClientConfig {
            server_url: "ftp://nas".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidInput(_))));
    }
}
