//! Configuration management for EatIT

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::i18n::Language;
use crate::session::{MAX_CHECK_INTERVAL, MIN_CHECK_INTERVAL, SessionSettings};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Language of user-facing notices
    #[serde(default)]
    pub language: Language,

    /// Re-authentication entry point shown after a forced logout
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// Seconds between recurring session expiry checks
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,

    /// Session database location (defaults to the platform data directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

fn default_login_url() -> String {
    "/login".to_string()
}

fn default_check_interval_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            login_url: default_login_url(),
            check_interval_secs: default_check_interval_secs(),
            store_path: None,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".eatit").join("config.yaml"))
    }

    /// Resolve an optional override against the default path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        let path = Self::resolve_path(path)?;
        match Self::load_from(&path) {
            Err(crate::error::Error::Config(ConfigError::NotFound)) => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Check values that deserialize fine but make no sense
    pub fn validate(&self) -> Result<()> {
        let allowed = MIN_CHECK_INTERVAL.as_secs()..=MAX_CHECK_INTERVAL.as_secs();
        if !allowed.contains(&self.check_interval_secs) {
            return Err(ConfigError::Invalid(format!(
                "check_interval_secs must be between {} and {}",
                allowed.start(),
                allowed.end()
            ))
            .into());
        }
        if self.login_url.trim().is_empty() {
            return Err(ConfigError::Invalid("login_url must not be empty".to_string()).into());
        }
        Ok(())
    }

    /// Settings for the session manager
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            check_interval: Duration::from_secs(self.check_interval_secs),
            login_url: self.login_url.clone(),
            language: self.language,
        }
    }
}
