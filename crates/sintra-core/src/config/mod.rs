//! # Configuration System
//!
//! Hierarchical TOML configuration for Sintra hosts.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.sintra/config.toml`
//! 3. **Project config** - `./.sintra/config.toml`
//! 4. **Environment** - `SINTRA_API_URL`
//! 5. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.sintra/config.toml
//! [api]
//! base_url = "https://sintra.example.com/api"
//! timeout_secs = 15
//!
//! [refresh]
//! interval_secs = 5
//! max_backoff_secs = 60
//! ```
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use sintra_core::config::SintraConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SintraConfig::load_hierarchy()?;
//!     println!("talking to {}", config.api.base_url());
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use defaults::DEFAULT_API_BASE_URL;
pub use types::{ApiConfig, RefreshConfig, SintraConfig};
pub use validation::validate_config;

impl SintraConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }

    /// Return a copy with `base_url` replaced, validating the new value.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, crate::errors::ConfigError> {
        validation::validate_base_url(url)?;
        self.api.base_url = Some(url.to_string());
        Ok(self)
    }
}
