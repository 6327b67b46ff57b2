//! sintra-core: Core library for the Sintra agent dashboard
//!
//! Loads resources from the Sintra backend API and keeps them fresh for the
//! views that render them. Used by the CLI.
//!
//! # Main Entry Points
//!
//! - [`sync`] - Polled resource synchronization (stale-while-revalidate, fallback, cancellation)
//! - [`api`] - HTTP client and endpoints
//! - [`resources`] - Typed resources and schema validation
//! - [`config`] - Configuration management

pub mod api;
pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod resources;
pub mod sync;

// Re-export commonly used types at crate root for convenience
pub use api::{ApiClient, ApiError, Endpoint};
pub use config::SintraConfig;
pub use errors::{ConfigError, SintraError};
pub use resources::{Agent, AgentStatus, MemorySearch, MemorySnapshot, Resource, Task, TaskStatus};
pub use sync::{
    PolledResource, ResourceFetcher, SyncOptions, SyncOutcome, SyncState, SyncStatus, TaskWait,
    TaskWaitError, wait_for_task,
};

// Re-export logging initialization
pub use logging::init_logging;
