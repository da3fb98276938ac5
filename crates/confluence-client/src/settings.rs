//! Client settings: site URL, credentials, timing, default spaces.
//!
//! Settings live as TOML in the user config directory
//! (`confluence-search/config.toml`); every field has a default, so a
//! partial file or no file at all works. `CONFLUENCE_BASE_URL` and
//! `CONFLUENCE_API_TOKEN` override the file, which keeps credentials out
//! of it where that matters.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not read {path}: {message}")]
    Io { path: PathBuf, message: String },
    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Connection and search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Site root, e.g. `https://example.atlassian.net`. No trailing slash.
    pub base_url: String,
    /// `user@example.com:api-token` pair sent as Basic credentials.
    /// Empty means anonymous access.
    pub api_token: String,
    /// Network deadline in seconds. The HTTP client clamps this to 3-30.
    pub timeout_secs: u64,
    /// Result rows requested per search round.
    pub max_results: u32,
    /// Space keys searched when the query carries no `#` sigil.
    pub default_spaces: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://www.example.com".to_string(),
            api_token: String::new(),
            timeout_secs: 10,
            max_results: 10,
            default_spaces: Vec::new(),
        }
    }
}

impl Settings {
    /// Load from the default config path, then apply environment
    /// overrides. A missing file yields the defaults.
    pub fn load() -> Result<Self, SettingsError> {
        let mut settings = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Load from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize settings to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Default settings file location, under the platform config
    /// directory.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("confluence-search").join("config.toml"))
    }

    /// Override file values from `CONFLUENCE_BASE_URL` and
    /// `CONFLUENCE_API_TOKEN` when set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("CONFLUENCE_BASE_URL") {
            if !base_url.is_empty() {
                self.base_url = base_url;
            }
        }
        if let Ok(api_token) = std::env::var("CONFLUENCE_API_TOKEN") {
            if !api_token.is_empty() {
                self.api_token = api_token;
            }
        }
    }

    /// Validate settings values.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| SettingsError::Invalid(format!("base_url: {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(SettingsError::Invalid(
                "base_url must use http or https".to_string(),
            ));
        }
        if self.base_url.ends_with('/') {
            return Err(SettingsError::Invalid(
                "base_url must not end with a slash".to_string(),
            ));
        }
        if self.max_results == 0 {
            return Err(SettingsError::Invalid(
                "max_results must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a comma-separated space list, as entered in a settings UI or
    /// a `--spaces` flag. Entries are trimmed; empty entries are dropped.
    pub fn parse_spaces(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
