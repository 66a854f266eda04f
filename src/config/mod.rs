//
//  redmine-api
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Connection settings for the `redmine` CLI, stored as TOML in a
//! platform-specific directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/redmine/config.toml`
//! - **macOS**: `~/Library/Application Support/redmine/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\redmine\config\config.toml`
//!
//! The `REDMINE_CONFIG` environment variable points the CLI at another file.
//!
//! ## Example Configuration File
//!
//! ```toml
//! url = "https://redmine.example.com"
//! api_key = "0123456789abcdef"
//! timeout = 30
//! ```
//!
//! ## Precedence
//!
//! Command-line flags and their environment variables (`REDMINE_URL`,
//! `REDMINE_API_KEY`, `REDMINE_USERNAME`, `REDMINE_PASSWORD`) win over the
//! file, see [`Config::merge`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use redmine_api::config::Config;
//!
//! let mut config = Config::load()?;
//! config.set("url", "https://redmine.example.com".to_string())?;
//! config.save()?;
//!
//! let auth = config.auth();
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::auth::Auth;

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV: &str = "REDMINE_CONFIG";

/// Keys accepted by [`Config::get`] and [`Config::set`].
pub const KEYS: &[&str] = &[
    "url",
    "api_key",
    "username",
    "password",
    "impersonate",
    "timeout",
];

/// Persistent CLI configuration.
///
/// Every field is optional so that a partial file, or no file at all, is a
/// valid configuration.
///
/// # Fields
///
/// * `url` - Base URL of the Redmine instance
/// * `api_key` - API key, preferred over `username`/`password`
/// * `username` / `password` - HTTP Basic credentials
/// * `impersonate` - Login to act as (administrators only)
/// * `timeout` - Request timeout in seconds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impersonate: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// A missing file yields the default (empty) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration directory cannot be determined,
    /// the file cannot be read, or its content is not valid TOML.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Saves the configuration to the default location, creating parent
    /// directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Returns the configuration file path.
    ///
    /// `REDMINE_CONFIG` takes precedence over the platform directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("", "", "redmine")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlays every value that is set in `other`.
    pub fn merge(&mut self, other: Config) {
        let Config {
            url,
            api_key,
            username,
            password,
            impersonate,
            timeout,
        } = other;

        if url.is_some() {
            self.url = url;
        }
        if api_key.is_some() {
            self.api_key = api_key;
        }
        if username.is_some() {
            self.username = username;
        }
        if password.is_some() {
            self.password = password;
        }
        if impersonate.is_some() {
            self.impersonate = impersonate;
        }
        if timeout.is_some() {
            self.timeout = timeout;
        }
    }

    /// Builds the credentials to send.
    ///
    /// An API key wins over a username; a username without password uses an
    /// empty password.
    pub fn auth(&self) -> Auth {
        match (&self.api_key, &self.username) {
            (Some(key), _) if !key.is_empty() => Auth::api_key(key),
            (_, Some(user)) if !user.is_empty() => {
                Auth::basic(user, self.password.as_deref().unwrap_or_default())
            }
            _ => Auth::Anonymous,
        }
    }

    /// Returns the configured Redmine URL.
    ///
    /// # Errors
    ///
    /// Fails when no URL is configured.
    pub fn require_url(&self) -> Result<&str> {
        match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => bail!(
                "No Redmine URL configured. Pass --url, set REDMINE_URL or run 'redmine config set url <URL>'"
            ),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// Returns a value by key. Secrets are returned as stored.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(match key {
            "url" => self.url.clone(),
            "api_key" => self.api_key.clone(),
            "username" => self.username.clone(),
            "password" => self.password.clone(),
            "impersonate" => self.impersonate.clone(),
            "timeout" => self.timeout.map(|t| t.to_string()),
            _ => bail!(unknown_key(key)),
        })
    }

    /// Sets a value by key.
    ///
    /// # Errors
    ///
    /// Fails for unknown keys, a `url` that does not parse, or a
    /// non-numeric `timeout`.
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        match key {
            "url" => {
                url::Url::parse(&value).with_context(|| format!("Invalid URL '{}'", value))?;
                self.url = Some(value);
            }
            "api_key" => self.api_key = Some(value),
            "username" => self.username = Some(value),
            "password" => self.password = Some(value),
            "impersonate" => self.impersonate = Some(value),
            "timeout" => {
                let seconds = value
                    .parse()
                    .with_context(|| format!("Invalid timeout '{}', expected seconds", value))?;
                self.timeout = Some(seconds);
            }
            _ => bail!(unknown_key(key)),
        }
        Ok(())
    }

    /// Clears a value by key.
    pub fn unset(&mut self, key: &str) -> Result<()> {
        match key {
            "url" => self.url = None,
            "api_key" => self.api_key = None,
            "username" => self.username = None,
            "password" => self.password = None,
            "impersonate" => self.impersonate = None,
            "timeout" => self.timeout = None,
            _ => bail!(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown configuration key '{}'. Valid keys: {}",
        key,
        KEYS.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("url", "https://redmine.example.com".to_string()).unwrap();
        config.set("api_key", "secret".to_string()).unwrap();
        config.set("timeout", "15".to_string()).unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.timeout(), Some(Duration::from_secs(15)));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("username"));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "url = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_merge_prefers_set_values() {
        let mut config = Config {
            url: Some("https://a.example.com".to_string()),
            api_key: Some("file-key".to_string()),
            timeout: Some(10),
            ..Default::default()
        };
        config.merge(Config {
            api_key: Some("flag-key".to_string()),
            ..Default::default()
        });

        assert_eq!(config.url.as_deref(), Some("https://a.example.com"));
        assert_eq!(config.api_key.as_deref(), Some("flag-key"));
        assert_eq!(config.timeout, Some(10));
    }

    #[test]
    fn test_auth_selection() {
        let mut config = Config::default();
        assert_eq!(config.auth(), Auth::Anonymous);

        config.username = Some("jsmith".to_string());
        assert_eq!(config.auth(), Auth::basic("jsmith", ""));

        config.api_key = Some("key".to_string());
        assert_eq!(config.auth(), Auth::api_key("key"));
    }

    #[test]
    fn test_get_set_unset() {
        let mut config = Config::default();
        assert!(config.set("colour", "red".to_string()).is_err());
        assert!(config.set("timeout", "soon".to_string()).is_err());
        assert!(config.set("url", "not a url".to_string()).is_err());

        config.set("impersonate", "jsmith".to_string()).unwrap();
        assert_eq!(config.get("impersonate").unwrap().as_deref(), Some("jsmith"));

        config.unset("impersonate").unwrap();
        assert_eq!(config.get("impersonate").unwrap(), None);
        assert!(config.get("colour").is_err());
    }

    #[test]
    fn test_require_url() {
        let mut config = Config::default();
        assert!(config.require_url().is_err());

        config.url = Some("https://redmine.example.com".to_string());
        assert_eq!(config.require_url().unwrap(), "https://redmine.example.com");
    }
}
