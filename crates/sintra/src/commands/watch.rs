use std::io::{self, Write};
use std::time::Duration;

use clap::ArgMatches;
use tracing::{info, warn};

use sintra_core::api::endpoint;
use sintra_core::events;
use sintra_core::resources::sort_newest_first;
use sintra_core::{AgentStatus, PolledResource, SyncOptions, SyncState, SyncStatus, Task};

use super::CommandContext;
use super::status::status_lines;
use crate::table::TableFormatter;

/// Tasks shown on the dashboard.
const RECENT_TASK_LIMIT: usize = 10;

pub(crate) async fn handle_watch_command(
    matches: &ArgMatches,
    ctx: &CommandContext,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut refresh = ctx.config.refresh.clone();
    if let Some(secs) = matches.get_one::<u64>("interval") {
        refresh.interval_secs = Some(*secs);
        // A cap below the new interval would shorten it
        if refresh.max_backoff_secs.is_some_and(|cap| cap < *secs) {
            refresh.max_backoff_secs = Some(*secs);
        }
    }
    let interval = refresh.interval();

    info!(
        event = "cli.watch_started",
        interval_secs = interval.as_secs()
    );

    let status = PolledResource::start(
        ctx.client.clone(),
        endpoint::agent_status(),
        SyncOptions::<AgentStatus>::new().polling(&refresh),
    );
    let tasks = PolledResource::start(
        ctx.client.clone(),
        endpoint::tasks(),
        SyncOptions::<Vec<Task>>::new().polling(&refresh),
    );

    let ctrl_c = tokio::signal::ctrl_c();
    let reason = watch_until(ctrl_c, &status, &tasks, interval).await?;

    status.stop();
    tasks.stop();
    events::log_app_shutdown(reason);
    info!(event = "cli.watch_completed", reason = reason);

    Ok(())
}

/// Redraw on every state change until `shutdown` resolves or a sync closes.
async fn watch_until<S>(
    shutdown: S,
    status: &PolledResource<AgentStatus>,
    tasks: &PolledResource<Vec<Task>>,
    interval: Duration,
) -> Result<&'static str, Box<dyn std::error::Error>>
where
    S: Future<Output = io::Result<()>>,
{
    tokio::pin!(shutdown);
    let mut status_rx = status.subscribe();
    let mut tasks_rx = tasks.subscribe();

    loop {
        render(&status.state(), &tasks.state(), interval)?;

        tokio::select! {
            signal = &mut shutdown => {
                if let Err(e) = signal {
                    warn!(event = "cli.watch_signal_failed", error = %e);
                }
                return Ok("ctrl_c");
            }
            changed = status_rx.changed() => {
                if changed.is_err() {
                    return Ok("status_closed");
                }
            }
            changed = tasks_rx.changed() => {
                if changed.is_err() {
                    return Ok("tasks_closed");
                }
            }
        }
    }
}

fn render(
    status: &SyncState<AgentStatus>,
    tasks: &SyncState<Vec<Task>>,
    interval: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = io::stdout().lock();
    write!(out, "\x1B[2J\x1B[1;1H")?;

    writeln!(out, "SINTRA {}", sync_badge(status))?;
    match &status.data {
        Some(data) => {
            for line in status_lines(data) {
                writeln!(out, "{}", line)?;
            }
        }
        None => writeln!(out, "Agent status unavailable")?,
    }
    if let Some(error) = &status.error {
        writeln!(out, "⚠️  {}", error)?;
    }

    writeln!(out)?;
    writeln!(out, "Recent tasks {}", sync_badge(tasks))?;
    match &tasks.data {
        Some(list) if list.is_empty() => writeln!(out, "No tasks yet.")?,
        Some(list) => {
            let mut recent = list.clone();
            sort_newest_first(&mut recent);
            recent.truncate(RECENT_TASK_LIMIT);
            // The table prints straight to stdout
            out.flush()?;
            TableFormatter::for_tasks(&recent).print_tasks(&recent);
        }
        None => writeln!(out, "Tasks unavailable")?,
    }
    if let Some(error) = &tasks.error {
        writeln!(out, "⚠️  {}", error)?;
    }

    writeln!(
        out,
        "\nRefreshing every {}s. Press Ctrl+C to exit.",
        interval.as_secs()
    )?;
    out.flush()?;
    Ok(())
}

fn sync_badge<T>(state: &SyncState<T>) -> String {
    match state.status {
        SyncStatus::Idle | SyncStatus::Loading if state.data.is_none() => "(loading...)".into(),
        SyncStatus::Loading => "(refreshing...)".into(),
        SyncStatus::Failed => "(offline)".into(),
        _ => state
            .last_fetched_at
            .map(|at| format!("(updated {})", at.format("%H:%M:%S")))
            .unwrap_or_default(),
    }
}
