//! Application lifecycle events shared by every Sintra host.

use tracing::{error, info, warn};

use crate::errors::SintraError;

/// Logged once the host has resolved its configuration.
pub fn log_app_startup(api_base_url: &str) {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION"),
        api_base_url = api_base_url
    );
}

pub fn log_app_shutdown(reason: &str) {
    info!(event = "core.app.shutdown_started", reason = reason);
}

/// User errors (bad input, 4xx answers) are warnings; everything else is an error.
pub fn log_app_error(error: &dyn SintraError) {
    if error.is_user_error() {
        warn!(
            event = "core.app.user_error",
            error = %error,
            error_code = error.error_code()
        );
    } else {
        error!(
            event = "core.app.error_occurred",
            error = %error,
            error_code = error.error_code()
        );
    }
}
