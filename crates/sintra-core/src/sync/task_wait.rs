//! Following one task until it completes or fails.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::fetcher::ResourceFetcher;
use super::options::SyncOptions;
use super::poller::PolledResource;
use super::state::SyncStatus;
use crate::api::endpoint;
use crate::config::defaults::{DEFAULT_TASK_POLL_INTERVAL_SECS, DEFAULT_TASK_WAIT_TIMEOUT_SECS};
use crate::errors::SintraError;
use crate::resources::{TaskDetail, TaskStatus};

/// How often to check a task and how long to wait for it overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskWait {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for TaskWait {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_TASK_POLL_INTERVAL_SECS),
            timeout: Duration::from_secs(DEFAULT_TASK_WAIT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TaskWaitError {
    #[error("Task '{task_id}' failed: {message}")]
    TaskFailed { task_id: String, message: String },

    #[error("Task '{task_id}' did not finish within {timeout_secs}s")]
    TimedOut { task_id: String, timeout_secs: u64 },

    #[error("Could not check task '{task_id}': {message}")]
    Fetch { task_id: String, message: String },

    #[error("Stopped waiting for task '{task_id}'")]
    Stopped { task_id: String },
}

impl SintraError for TaskWaitError {
    fn error_code(&self) -> &'static str {
        match self {
            TaskWaitError::TaskFailed { .. } => "TASK_FAILED",
            TaskWaitError::TimedOut { .. } => "TASK_WAIT_TIMEOUT",
            TaskWaitError::Fetch { .. } => "TASK_WAIT_FETCH_ERROR",
            TaskWaitError::Stopped { .. } => "TASK_WAIT_STOPPED",
        }
    }
}

/// Poll `GET /tasks/{id}` until the task reaches a terminal status.
///
/// Returns the completed task. A failed task, a failed status check, or
/// running past `wait.timeout` ends the wait with an error.
pub async fn wait_for_task(
    fetcher: Arc<dyn ResourceFetcher>,
    task_id: &str,
    wait: TaskWait,
) -> Result<TaskDetail, TaskWaitError> {
    let sync = PolledResource::start(
        fetcher,
        endpoint::task(task_id),
        SyncOptions::<TaskDetail>::new().interval(wait.interval),
    );
    info!(
        event = "core.task_wait.started",
        endpoint = %sync.endpoint(),
        timeout_secs = wait.timeout.as_secs()
    );

    let mut rx = sync.subscribe();
    let watched = async {
        let mut last_status = None;
        loop {
            {
                let state = rx.borrow_and_update();
                if state.status == SyncStatus::Failed {
                    return Err(TaskWaitError::Fetch {
                        task_id: task_id.to_string(),
                        message: state.error.clone().unwrap_or_default(),
                    });
                }
                if let Some(detail) = &state.data {
                    if last_status != Some(detail.status) {
                        debug!(
                            event = "core.task_wait.status_changed",
                            task_id = task_id,
                            status = %detail.status
                        );
                        last_status = Some(detail.status);
                    }
                    if detail.status.is_terminal() {
                        return Ok(detail.clone());
                    }
                }
            }
            if rx.changed().await.is_err() {
                return Err(TaskWaitError::Stopped {
                    task_id: task_id.to_string(),
                });
            }
        }
    };

    let outcome = tokio::time::timeout(wait.timeout, watched).await;
    sync.stop();

    let result = match outcome {
        Ok(Ok(detail)) if detail.status == TaskStatus::Failed => Err(TaskWaitError::TaskFailed {
            task_id: task_id.to_string(),
            message: detail
                .error
                .unwrap_or_else(|| "Unknown error".to_string()),
        }),
        Ok(result) => result,
        Err(_) => Err(TaskWaitError::TimedOut {
            task_id: task_id.to_string(),
            timeout_secs: wait.timeout.as_secs(),
        }),
    };

    match &result {
        Ok(_) => info!(event = "core.task_wait.completed", task_id = task_id),
        Err(e) => warn!(
            event = "core.task_wait.failed",
            task_id = task_id,
            error = %e,
            error_code = e.error_code()
        ),
    }
    result
}
