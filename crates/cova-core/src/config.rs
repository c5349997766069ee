//! Application configuration management.
//!
//! Holds the backend base address, where the credential is kept, the request
//! timeout and the last email used to sign in.
//!
//! Configuration is stored at `~/.config/cova/config.json`. The backend
//! address can be overridden with the `COVA_BACKEND_URL` environment variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::auth::TokenStorage;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "cova";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the backend base address
pub const BACKEND_URL_ENV: &str = "COVA_BACKEND_URL";

/// Backend used when neither the environment nor the config file name one
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: Option<String>,
    pub token_storage: TokenStorage,
    pub request_timeout_secs: u64,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            token_storage: TokenStorage::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            last_email: None,
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Where the session file lives
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Where log files are written
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Resolve the backend base address: environment, then config, then default.
    pub fn backend_url(&self) -> String {
        self.backend_url_with(std::env::var(BACKEND_URL_ENV).ok())
    }

    fn backend_url_with(&self, env_override: Option<String>) -> String {
        let url = env_override
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.backend_url.clone().filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        url.trim().trim_end_matches('/').to_string()
    }

    /// Request timeout; zero falls back to the default
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_url_precedence() {
        let mut config = Config::default();
        assert_eq!(config.backend_url_with(None), DEFAULT_BACKEND_URL);

        config.backend_url = Some("https://api.cova.example/".to_string());
        assert_eq!(config.backend_url_with(None), "https://api.cova.example");

        assert_eq!(
            config.backend_url_with(Some("http://127.0.0.1:9000".to_string())),
            "http://127.0.0.1:9000"
        );

        // Blank override falls through
        assert_eq!(
            config.backend_url_with(Some("  ".to_string())),
            "https://api.cova.example"
        );
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cova").join("config.json");
        let config = Config {
            backend_url: Some("http://localhost:9000".to_string()),
            token_storage: TokenStorage::Keyring,
            request_timeout_secs: 5,
            last_email: Some("ana@example.com".to_string()),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let config: Config = serde_json::from_str(r#"{"request_timeout_secs":0}"#).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));

        let config: Config = serde_json::from_str(r#"{"request_timeout_secs":5}"#).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"last_email":"ana@example.com"}"#).unwrap();
        assert_eq!(config.token_storage, TokenStorage::File);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.last_email.as_deref(), Some("ana@example.com"));
    }
}
