use clap::ArgMatches;
use tracing::{error, info, warn};

use sintra_core::api::endpoint;
use sintra_core::resources::{AGENT_PREVIEW_LIMIT, visible_agents};
use sintra_core::{Agent, SyncOptions};

use super::CommandContext;
use super::helpers::{failure_message, fetch_once, print_json};
use crate::roster;
use crate::table::TableFormatter;

pub(crate) async fn handle_agents_command(
    matches: &ArgMatches,
    ctx: &CommandContext,
) -> Result<(), Box<dyn std::error::Error>> {
    let show_all = matches.get_flag("all");
    let json_output = matches.get_flag("json");

    info!(
        event = "cli.agents_started",
        show_all = show_all,
        json_output = json_output
    );

    let options = SyncOptions::<Vec<Agent>>::new().fallback(roster::default_agents());
    let state = fetch_once(&ctx.client, endpoint::agents(), options).await;
    let agents = state.data.unwrap_or_default();

    // Fallback never stamps a fetch time
    let from_roster = state.last_fetched_at.is_none();
    if from_roster {
        eprintln!("⚠️  Backend unavailable, showing the built-in agent roster.");
        warn!(event = "cli.agents_roster_fallback");
    }

    let visible = visible_agents(&agents, show_all, AGENT_PREVIEW_LIMIT);

    if json_output {
        print_json(&visible)?;
    } else if visible.is_empty() {
        println!("No agents available.");
    } else {
        println!("Agents:");
        TableFormatter::for_agents(visible).print_agents(visible);

        let hidden = agents.len() - visible.len();
        if hidden > 0 {
            println!("... and {} more (use --all to show every agent)", hidden);
        }
    }

    info!(
        event = "cli.agents_completed",
        count = visible.len(),
        total = agents.len(),
        from_roster = from_roster
    );

    Ok(())
}

pub(crate) async fn handle_agent_command(
    matches: &ArgMatches,
    ctx: &CommandContext,
) -> Result<(), Box<dyn std::error::Error>> {
    let agent_id = matches
        .get_one::<String>("id")
        .ok_or("Agent id is required")?;

    info!(event = "cli.agent_started", agent_id = %agent_id);

    let state = fetch_once(
        &ctx.client,
        endpoint::agent(agent_id),
        SyncOptions::<Agent>::new(),
    )
    .await;

    if let Some(message) = failure_message(&state) {
        eprintln!("❌ Failed to load agent '{}': {}", agent_id, message);
        error!(event = "cli.agent_failed", agent_id = %agent_id, error = %message);
        return Err(message.into());
    }
    let Some(agent) = state.data else {
        return Err("No data received".into());
    };

    print_agent(&agent);

    info!(event = "cli.agent_completed", agent_id = %agent_id);

    Ok(())
}

fn print_agent(agent: &Agent) {
    println!("{} {}  ({})", agent.emoji, agent.name, agent.id);
    println!("   {}", agent.role);
    println!();
    println!("{}", agent.description);

    print_list("Specialties", &agent.specialties);
    print_list("Personality", &agent.personality_traits);
    print_list("Tools", &agent.preferred_tools);

    println!();
    println!("Tasks handled: {}", agent.task_count);
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}:", title);
    for item in items {
        println!("  • {}", item);
    }
}
