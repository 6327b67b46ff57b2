//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.sintra/config.toml` (global user preferences)
//! 3. **Project config** - `./.sintra/config.toml` (project-specific overrides)
//! 4. **Environment** - `SINTRA_API_URL`
//! 5. **CLI arguments** - Command-line flags (highest priority, applied by the caller)

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::defaults::{API_URL_ENV_VAR, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::config::types::{ApiConfig, RefreshConfig, SintraConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;

/// Load configuration from the hierarchy of config files and the environment.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed, or
/// if validation fails. Missing config files are not errors.
pub fn load_hierarchy() -> Result<SintraConfig, ConfigError> {
    let mut config = SintraConfig::default();

    for path in [user_config_path(), project_config_path()]
        .into_iter()
        .flatten()
    {
        match load_config_file(&path) {
            Ok(file_config) => config = merge_configs(config, file_config),
            Err(ConfigError::ConfigNotFound { path }) => {
                debug!(event = "core.config.file_skipped", path = %path);
            }
            Err(e) => return Err(e),
        }
    }

    let config = apply_env_overrides(config, |key| std::env::var(key).ok());

    validate_config(&config)?;

    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<SintraConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            ConfigError::IoError { source: e }
        }
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Merge two configurations, with `override_config` taking precedence.
///
/// Override values replace base values only if present.
pub fn merge_configs(base: SintraConfig, override_config: SintraConfig) -> SintraConfig {
    SintraConfig {
        api: ApiConfig {
            base_url: override_config.api.base_url.or(base.api.base_url),
            timeout_secs: override_config.api.timeout_secs.or(base.api.timeout_secs),
        },
        refresh: RefreshConfig {
            interval_secs: override_config
                .refresh
                .interval_secs
                .or(base.refresh.interval_secs),
            max_backoff_secs: override_config
                .refresh
                .max_backoff_secs
                .or(base.refresh.max_backoff_secs),
        },
    }
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Blank values are ignored so that `SINTRA_API_URL=` does not wipe a
/// configured URL.
pub fn apply_env_overrides(
    mut config: SintraConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> SintraConfig {
    if let Some(url) = lookup(API_URL_ENV_VAR).filter(|v| !v.trim().is_empty()) {
        debug!(event = "core.config.env_override_applied", key = API_URL_ENV_VAR);
        config.api.base_url = Some(url.trim().to_string());
    }
    config
}
