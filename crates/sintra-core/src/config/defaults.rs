//! Default values for configuration types.

/// Local development backend (the FastAPI server listens on 8000).
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Dashboard refresh cadence.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 5;

/// How often `create --wait` checks on its task.
pub const DEFAULT_TASK_POLL_INTERVAL_SECS: u64 = 2;

/// How long `create --wait` waits before giving up.
pub const DEFAULT_TASK_WAIT_TIMEOUT_SECS: u64 = 300;

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV_VAR: &str = "SINTRA_API_URL";

/// Directory name used for both user (`~/.sintra`) and project (`./.sintra`) config.
pub const CONFIG_DIR_NAME: &str = ".sintra";

pub const CONFIG_FILE_NAME: &str = "config.toml";
