//! Polling-refresh synchronization between a view and one remote resource.
//!
//! A view starts a [`PolledResource`] when it mounts, renders its
//! [`SyncState`], and drops the handle when it unmounts:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sintra_core::api::{ApiClient, endpoint};
//! use sintra_core::config::SintraConfig;
//! use sintra_core::resources::Task;
//! use sintra_core::sync::{PolledResource, SyncOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SintraConfig::load_hierarchy()?;
//! let client = Arc::new(ApiClient::from_config(&config.api)?);
//! let tasks = PolledResource::start(
//!     client,
//!     endpoint::tasks(),
//!     SyncOptions::<Vec<Task>>::new().polling(&config.refresh),
//! );
//! let state = tasks.settled().await;
//! println!("{:?} ({} tasks)", state.status, state.data.map_or(0, |t| t.len()));
//! # Ok(())
//! # }
//! ```
//!
//! Guarantees per instance:
//! - at most one request is outstanding; refreshing while loading joins it
//! - `data` keeps the last good value through loading and failures
//! - once stopped, no outstanding request can change the state
//!
//! [`wait_for_task`] applies the same polling to a single task until it
//! completes or fails.

mod backoff;
mod fetcher;
mod options;
mod poller;
mod state;
mod task_wait;

pub use backoff::Backoff;
pub use fetcher::ResourceFetcher;
pub use options::{ParseFn, SyncOptions};
pub use poller::PolledResource;
pub use state::{SyncOutcome, SyncState, SyncStatus};
pub use task_wait::{TaskWait, TaskWaitError, wait_for_task};
