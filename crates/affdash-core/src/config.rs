//! Application configuration management.
//!
//! Configuration is stored at `~/.config/affdash/config.json`. The backend
//! location and timeout can be overridden per process with
//! `AFFDASH_API_URL`, `AFFDASH_API_VERSION` and `AFFDASH_TIMEOUT_SECS`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "affdash";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_API_URL: &str = "http://localhost:4000";
pub const DEFAULT_API_VERSION: &str = "/api/v1";
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub api_version: String,
    pub request_timeout_secs: u64,
    /// Where observers are sent once the session cannot be recovered.
    pub login_path: String,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            last_email: None,
        }
    }
}

impl Config {
    /// Load the saved config (or defaults) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        } else {
            Self::default()
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    /// Apply overrides from a variable lookup. Blank values are ignored.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("AFFDASH_API_URL") {
            self.api_url = url;
        }
        if let Some(version) = get("AFFDASH_API_VERSION") {
            self.api_version = version;
        }
        if let Some(secs) = get("AFFDASH_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = secs,
                _ => warn!(value = %secs, "Ignoring invalid AFFDASH_TIMEOUT_SECS"),
            }
        }
        self
    }

    /// Versioned API root, e.g. `http://localhost:4000/api/v1`.
    pub fn base_url(&self) -> String {
        let root = self.api_url.trim_end_matches('/');
        let version = self.api_version.trim_matches('/');
        if version.is_empty() {
            root.to_string()
        } else {
            format!("{}/{}", root, version)
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url(), "http://localhost:4000/api/v1");
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.login_path, "/login");
    }

    #[test]
    fn test_base_url_joins_slashes() {
        let config = Config {
            api_url: "https://admin.example.com/".into(),
            api_version: "api/v2/".into(),
            ..Config::default()
        };
        assert_eq!(config.base_url(), "https://admin.example.com/api/v2");

        let config = Config {
            api_version: String::new(),
            ..Config::default()
        };
        assert_eq!(config.base_url(), "http://localhost:4000");
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_env_overrides(lookup(&[
            ("AFFDASH_API_URL", "https://api.example.com"),
            ("AFFDASH_TIMEOUT_SECS", "30"),
            ("AFFDASH_API_VERSION", "  "),
        ]));
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.api_version, "/api/v1");
    }

    #[test]
    fn test_invalid_timeout_ignored() {
        let config =
            Config::default().with_env_overrides(lookup(&[("AFFDASH_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"last_email": "ops@example.com"}"#).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.last_email.as_deref(), Some("ops@example.com"));
    }
}
