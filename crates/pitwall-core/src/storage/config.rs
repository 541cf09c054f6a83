//! Configuration management
//!
//! Optional settings stored in `~/.config/pitwall/config.toml`.
//! URL priority: CLI argument > PITWALL_URL environment variable > config.toml > default

use super::Result;
use crate::core::browser::{BrowserConfig, DEFAULT_PAGE_SIZE};
use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const URL_ENV_VAR: &str = "PITWALL_URL";
pub const DEFAULT_URL: &str = "http://127.0.0.1:8000";
pub const MAX_PAGE_SIZE: u32 = 200;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DEBOUNCE_MS: u64 = 350;

const APP_DIR: &str = "pitwall";
const CONFIG_FILE: &str = "config.toml";

/// Application configuration
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Dashboard backend URL
    pub url: Option<String>,
    /// Rows per page, 1..=200
    pub page_size: Option<u32>,
    pub timeout_secs: Option<u64>,
    /// Search debounce window in milliseconds
    pub debounce_ms: Option<u64>,
}

impl Config {
    /// Load configuration from file. A missing file yields the defaults.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            log::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to parse {}: {}", config_path.display(), e),
        })
    }

    /// Save configuration to file, creating the parent directory.
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })
    }

    /// `~/.config/pitwall`
    pub fn config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;
        Ok(home_dir.join(".config").join(APP_DIR))
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Config file inside an explicit directory.
    pub fn file_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    /// Resolve the backend URL from the CLI flag, the environment and this file.
    pub fn resolve_url(&self, cli_url: Option<&str>) -> String {
        let env_url = std::env::var(URL_ENV_VAR).ok();
        self.resolve_url_with(cli_url, env_url.as_deref())
    }

    fn resolve_url_with(&self, cli_url: Option<&str>, env_url: Option<&str>) -> String {
        cli_url
            .filter(|s| !s.is_empty())
            .or(env_url.filter(|s| !s.is_empty()))
            .or(self.url.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(DEFAULT_URL)
            .to_string()
    }

    pub fn set_url(&mut self, url: String) {
        self.url = Some(url);
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = Some(page_size);
    }

    /// Effective page size. Out-of-range values fall back to the default.
    pub fn page_size(&self) -> u32 {
        match self.page_size {
            Some(size) if (1..=MAX_PAGE_SIZE).contains(&size) => size,
            Some(size) => {
                log::warn!(
                    "Ignoring page_size {} (must be 1..={}), using {}",
                    size,
                    MAX_PAGE_SIZE,
                    DEFAULT_PAGE_SIZE
                );
                DEFAULT_PAGE_SIZE
            }
            None => DEFAULT_PAGE_SIZE,
        }
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
            .filter(|t| *t > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
    }

    pub fn browser_config(&self) -> BrowserConfig {
        BrowserConfig {
            page_size: self.page_size(),
            debounce: self.debounce(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.url.is_none());
        assert_eq!(config.page_size(), 25);
        assert_eq!(config.timeout_secs(), 30);
        assert_eq!(config.debounce(), Duration::from_millis(350));
    }

    #[test]
    fn test_config_load_save() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set_url("http://dash.example.test".to_string());
        config.set_page_size(50);

        config
            .save(Some(config_path.clone()))
            .expect("Failed to save config");
        let loaded = Config::load(Some(config_path)).expect("Failed to load config");

        assert_eq!(loaded, config);
        assert_eq!(loaded.browser_config().page_size, 50);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load(Some(temp_dir.path().join("missing.toml")))
            .expect("missing file should give defaults");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "page_size = \"many\"").expect("write");

        let err = Config::load(Some(path)).expect_err("should not parse");
        assert!(matches!(err, StorageError::ConfigParseError { .. }));
    }

    #[test]
    fn test_url_priority() {
        let mut config = Config::default();
        assert_eq!(config.resolve_url_with(None, None), DEFAULT_URL);

        config.set_url("http://file.test".to_string());
        assert_eq!(config.resolve_url_with(None, None), "http://file.test");
        assert_eq!(
            config.resolve_url_with(None, Some("http://env.test")),
            "http://env.test"
        );
        assert_eq!(
            config.resolve_url_with(Some("http://cli.test"), Some("http://env.test")),
            "http://cli.test"
        );
        assert_eq!(config.resolve_url_with(Some(""), Some("")), "http://file.test");
    }

    #[test]
    fn test_out_of_range_page_size_falls_back() {
        let mut config = Config::default();
        config.set_page_size(0);
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
        config.set_page_size(201);
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
        config.set_page_size(200);
        assert_eq!(config.page_size(), 200);
    }
}
