use std::sync::Arc;

use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, warn};

use sintra_core::events;
use sintra_core::{ApiClient, Endpoint, PolledResource, SintraConfig, SyncOptions, SyncState};

/// Load config, warning on errors and falling back to defaults.
pub(crate) fn load_config_with_warning() -> SintraConfig {
    match SintraConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.sintra/config.toml, ./.sintra/config.toml and SINTRA_API_URL.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            SintraConfig::default()
        }
    }
}

/// Config from the hierarchy with the `--api-url` flag applied last.
pub(crate) fn resolve_config(
    matches: &ArgMatches,
) -> Result<SintraConfig, Box<dyn std::error::Error>> {
    let config = load_config_with_warning();

    let Some(url) = matches.get_one::<String>("api-url") else {
        return Ok(config);
    };

    match config.with_base_url(url) {
        Ok(config) => Ok(config),
        Err(e) => {
            eprintln!("❌ {}", e);
            error!(event = "cli.config.api_url_invalid", url = %url, error = %e);
            Err(e.into())
        }
    }
}

pub(crate) fn build_client(
    config: &SintraConfig,
) -> Result<Arc<ApiClient>, Box<dyn std::error::Error>> {
    match ApiClient::from_config(&config.api) {
        Ok(client) => Ok(Arc::new(client)),
        Err(e) => {
            eprintln!("❌ Failed to set up the API client: {}", e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

/// Sync a resource once and return the settled state.
///
/// One-shot views use the same sync as the live dashboard, without an interval.
pub(crate) async fn fetch_once<T>(
    client: &Arc<ApiClient>,
    endpoint: Endpoint,
    options: SyncOptions<T>,
) -> SyncState<T>
where
    T: Clone + Send + Sync + 'static,
{
    let sync = PolledResource::start(client.clone(), endpoint, options);
    let state = sync.settled().await;
    sync.stop();
    state
}

/// Error message of a failed state, or `None` when it holds data.
pub(crate) fn failure_message<T>(state: &SyncState<T>) -> Option<String> {
    match (&state.data, &state.error) {
        (Some(_), _) => None,
        (None, Some(message)) => Some(message.clone()),
        (None, None) => Some("No data received".to_string()),
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
