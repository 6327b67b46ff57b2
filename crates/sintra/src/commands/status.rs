use tracing::{error, info};

use sintra_core::api::endpoint;
use sintra_core::{AgentStatus, SyncOptions};

use super::CommandContext;
use super::helpers::{failure_message, fetch_once};

pub(crate) async fn handle_status_command(
    ctx: &CommandContext,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.status_started");

    let state = fetch_once(
        &ctx.client,
        endpoint::agent_status(),
        SyncOptions::<AgentStatus>::new(),
    )
    .await;

    if let Some(message) = failure_message(&state) {
        eprintln!("❌ Failed to load agent status: {}", message);
        error!(event = "cli.status_failed", error = %message);
        return Err(message.into());
    }
    let Some(status) = state.data else {
        return Err("No data received".into());
    };

    for line in status_lines(&status) {
        println!("{}", line);
    }

    info!(
        event = "cli.status_completed",
        is_running = status.is_running,
        tasks_completed = status.tasks_completed
    );

    Ok(())
}

/// Status bar contents, shared with the live dashboard.
pub(crate) fn status_lines(status: &AgentStatus) -> Vec<String> {
    let running = if status.is_running {
        "🟢 running"
    } else {
        "⚪ idle"
    };

    let mut lines = vec![
        format!("{} ({})  {}", status.name, status.model, running),
        format!(
            "Tasks completed: {}   Memory: {} items ({} working, {} episodic, {} semantic)",
            status.tasks_completed,
            status.memory_size.total(),
            status.memory_size.working,
            status.memory_size.episodic,
            status.memory_size.semantic
        ),
    ];

    if let Some(current) = status.current_task.as_ref().filter(|c| !c.is_null()) {
        let description = current
            .get("description")
            .and_then(|d| d.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| current.to_string());
        lines.push(format!("Current task: {}", description));
    }

    lines
}
