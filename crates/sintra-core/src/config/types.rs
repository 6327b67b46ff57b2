//! Configuration type definitions for Sintra.
//!
//! These types are serialized/deserialized from TOML config files. Every
//! field is optional so that a project config can override a single value
//! of the user config without restating the rest.
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000/api"
//! timeout_secs = 30
//!
//! [refresh]
//! interval_secs = 5
//! max_backoff_secs = 60
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::defaults::{DEFAULT_API_BASE_URL, DEFAULT_REFRESH_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS};

/// Main configuration loaded from TOML config files and the environment.
///
/// Loaded from (later overrides earlier):
/// 1. User config: `~/.sintra/config.toml`
/// 2. Project config: `./.sintra/config.toml`
/// 3. `SINTRA_API_URL` environment variable
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SintraConfig {
    /// Backend API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Polling behavior for views that refresh on an interval
    #[serde(default)]
    pub refresh: RefreshConfig,
}

/// Backend API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    /// Default: `http://localhost:8000/api`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds.
    /// Default: 30 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

/// Polling configuration.
///
/// Without `max_backoff_secs` every refresh happens on the fixed interval,
/// failures included. With it, consecutive failures double the delay up to
/// the cap.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RefreshConfig {
    /// Seconds between the end of one fetch and the start of the next.
    /// Default: 5 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,

    /// Upper bound for the failure backoff delay, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_backoff_secs: Option<u64>,
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS))
    }

    pub fn backoff_cap(&self) -> Option<Duration> {
        self.max_backoff_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sintra_config_serialization() {
        let config = SintraConfig {
            api: ApiConfig {
                base_url: Some("https://sintra.example.com/api".to_string()),
                timeout_secs: Some(10),
            },
            refresh: RefreshConfig {
                interval_secs: Some(2),
                max_backoff_secs: None,
            },
        };
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: SintraConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
        assert!(!toml_str.contains("max_backoff_secs"));
    }

    #[test]
    fn test_accessors_fall_back_to_defaults() {
        let config = SintraConfig::default();
        assert_eq!(config.api.base_url(), "http://localhost:8000/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.refresh.interval(), Duration::from_secs(5));
        assert_eq!(config.refresh.backoff_cap(), None);
    }

    #[test]
    fn test_partial_file_parses() {
        let config: SintraConfig = toml::from_str("[refresh]\nmax_backoff_secs = 40\n").unwrap();
        assert_eq!(config.api, ApiConfig::default());
        assert_eq!(config.refresh.backoff_cap(), Some(Duration::from_secs(40)));
    }
}
