//! Application configuration management.
//!
//! Holds the optional API base URL override and the last viewed tab.
//! Configuration is stored at `~/.config/gummyte/config.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use gummyte_core::RecordKind;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "gummyte";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Production backend
pub const DEFAULT_API_URL: &str = "https://stratum-backend-8hhn.onrender.com/api";

/// Environment variable that overrides the configured API URL
pub const API_URL_ENV: &str = "GUMMYTE_API_URL";

/// Environment variable that seeds the token store at startup
pub const ADMIN_TOKEN_ENV: &str = "GUMMYTE_ADMIN_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    pub last_tab: Option<RecordKind>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the rolling TUI log files
    pub fn log_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join("logs"))
    }

    /// API base URL: environment first, then config file, then the default
    pub fn api_url(&self) -> String {
        Self::resolve_api_url(std::env::var(API_URL_ENV).ok(), self.api_url.as_deref())
    }

    fn resolve_api_url(env_value: Option<String>, configured: Option<&str>) -> String {
        env_value
            .filter(|url| !url.trim().is_empty())
            .or_else(|| {
                configured
                    .filter(|url| !url.trim().is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Tab to open on startup
    pub fn initial_tab(&self) -> RecordKind {
        self.last_tab.unwrap_or(RecordKind::Signups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_api_url_precedence() {
        assert_eq!(Config::resolve_api_url(None, None), DEFAULT_API_URL);
        assert_eq!(
            Config::resolve_api_url(None, Some("http://localhost:5000/api")),
            "http://localhost:5000/api"
        );
        assert_eq!(
            Config::resolve_api_url(
                Some("http://staging/api".to_string()),
                Some("http://localhost:5000/api")
            ),
            "http://staging/api"
        );
        // Blank values fall through
        assert_eq!(
            Config::resolve_api_url(Some("  ".to_string()), Some("")),
            DEFAULT_API_URL
        );
    }

    #[test]
    fn test_config_json_round_trip_uses_slugs() {
        let config = Config {
            api_url: None,
            last_tab: Some(RecordKind::Messages),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"messages\""));

        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.initial_tab(), RecordKind::Messages);
        assert_eq!(Config::default().initial_tab(), RecordKind::Signups);
    }
}
