//! Configuration validation.

use reqwest::Url;

use crate::config::types::SintraConfig;
use crate::errors::ConfigError;

/// Validate a fully merged configuration.
///
/// # Errors
///
/// - [`ConfigError::InvalidBaseUrl`] when the base URL does not parse or is not http(s)
/// - [`ConfigError::InvalidConfiguration`] for zero timeouts/intervals or a
///   backoff cap below the refresh interval
pub fn validate_config(config: &SintraConfig) -> Result<(), ConfigError> {
    validate_base_url(config.api.base_url())?;

    if config.api.timeout_secs == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "api.timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.refresh.interval_secs == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "refresh.interval_secs must be greater than 0".to_string(),
        });
    }

    if let Some(cap) = config.refresh.backoff_cap()
        && cap < config.refresh.interval()
    {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "refresh.max_backoff_secs ({}) must not be lower than refresh.interval_secs ({})",
                cap.as_secs(),
                config.refresh.interval().as_secs()
            ),
        });
    }

    Ok(())
}

/// Check that `url` is an absolute http(s) URL.
pub fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidBaseUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidBaseUrl {
            url: url.to_string(),
            message: format!("unsupported scheme '{}', expected http or https", other),
        }),
    }
}
