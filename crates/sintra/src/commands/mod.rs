use std::sync::Arc;

use clap::ArgMatches;
use tracing::error;

use sintra_core::events;
use sintra_core::{ApiClient, SintraConfig};

pub mod helpers;

mod agents;
mod completions;
mod core_agent;
mod memory;
mod status;
mod tasks;
mod watch;

/// Resolved configuration and the client every API command shares.
pub(crate) struct CommandContext {
    pub config: SintraConfig,
    pub client: Arc<ApiClient>,
}

pub async fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    // Completions never talk to the backend
    if let Some(("completions", sub_matches)) = matches.subcommand() {
        return completions::handle_completions_command(sub_matches);
    }

    let config = helpers::resolve_config(matches)?;
    events::log_app_startup(config.api.base_url());
    let client = helpers::build_client(&config)?;
    let ctx = CommandContext { config, client };

    match matches.subcommand() {
        Some(("agents", sub_matches)) => agents::handle_agents_command(sub_matches, &ctx).await,
        Some(("agent", sub_matches)) => agents::handle_agent_command(sub_matches, &ctx).await,
        Some(("tasks", sub_matches)) => tasks::handle_tasks_command(sub_matches, &ctx).await,
        Some(("task", sub_matches)) => tasks::handle_task_command(sub_matches, &ctx).await,
        Some(("create", sub_matches)) => tasks::handle_create_command(sub_matches, &ctx).await,
        Some(("delete", sub_matches)) => tasks::handle_delete_command(sub_matches, &ctx).await,
        Some(("memory", _)) => memory::handle_memory_command(&ctx).await,
        Some(("search", sub_matches)) => memory::handle_search_command(sub_matches, &ctx).await,
        Some(("status", _)) => status::handle_status_command(&ctx).await,
        Some(("think", sub_matches)) => core_agent::handle_think_command(sub_matches, &ctx).await,
        Some(("reset", _)) => core_agent::handle_reset_command(&ctx).await,
        Some(("watch", sub_matches)) => watch::handle_watch_command(sub_matches, &ctx).await,
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
