//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable that overrides `api.endpoint`.
pub const ENDPOINT_ENV: &str = "APPS_SCRIPT_URL";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote data service settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Result cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Notification settings
    #[serde(default)]
    pub toast: ToastConfig,

    /// Session persistence
    #[serde(default)]
    pub session: SessionConfig,

    /// Admin panel behavior
    #[serde(default)]
    pub admin: AdminConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply environment overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                self.api.endpoint = endpoint.trim().to_string();
            }
        }
        self
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.endpoint.trim().is_empty() {
            return Err(AppError::validation(format!(
                "api.endpoint is empty (set it or {ENDPOINT_ENV})"
            )));
        }
        url::Url::parse(&self.api.endpoint)
            .map_err(|e| AppError::validation(format!("api.endpoint is not a URL: {e}")))?;
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.read_timeout_secs == 0 {
            return Err(AppError::validation("api.read_timeout_secs must be > 0"));
        }
        if self.api.write_timeout_secs == 0 {
            return Err(AppError::validation("api.write_timeout_secs must be > 0"));
        }
        if self.cache.ttl_secs == 0 {
            return Err(AppError::validation("cache.ttl_secs must be > 0"));
        }
        if self.toast.dismiss_secs == 0 {
            return Err(AppError::validation("toast.dismiss_secs must be > 0"));
        }
        Ok(())
    }
}

/// Remote data service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Deployed Apps Script web app URL
    #[serde(default)]
    pub endpoint: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Deadline for read actions in seconds
    #[serde(default = "defaults::read_timeout")]
    pub read_timeout_secs: u64,

    /// Deadline for write actions in seconds (writes may carry encoded images)
    #[serde(default = "defaults::write_timeout")]
    pub write_timeout_secs: u64,
}

impl ApiConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            user_agent: defaults::user_agent(),
            read_timeout_secs: defaults::read_timeout(),
            write_timeout_secs: defaults::write_timeout(),
        }
    }
}

/// Result cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Validity window of a cached aggregate in seconds
    #[serde(default = "defaults::cache_ttl")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: defaults::cache_ttl(),
        }
    }
}

/// Toast notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToastConfig {
    /// Seconds before a toast dismisses itself
    #[serde(default = "defaults::toast_dismiss")]
    pub dismiss_secs: u64,
}

impl ToastConfig {
    pub fn dismiss_after(&self) -> Duration {
        Duration::from_secs(self.dismiss_secs)
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            dismiss_secs: defaults::toast_dismiss(),
        }
    }
}

/// Session persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File holding the persisted admin session
    #[serde(default = "defaults::session_path")]
    pub path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: defaults::session_path(),
        }
    }
}

/// Admin panel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Number of activity log entries shown on the dashboard
    #[serde(default = "defaults::activity_log_limit")]
    pub activity_log_limit: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            activity_log_limit: defaults::activity_log_limit(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // API defaults
    pub fn user_agent() -> String {
        concat!("masjid-site/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn read_timeout() -> u64 {
        30
    }
    pub fn write_timeout() -> u64 {
        60
    }

    // Cache defaults
    pub fn cache_ttl() -> u64 {
        300
    }

    // Toast defaults
    pub fn toast_dismiss() -> u64 {
        3
    }

    // Session defaults
    pub fn session_path() -> PathBuf {
        PathBuf::from(".masjid-site/session.json")
    }

    // Admin defaults
    pub fn activity_log_limit() -> usize {
        10
    }
}
