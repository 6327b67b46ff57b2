use clap::ArgMatches;
use serde_json::Value;
use tracing::{error, info};

use sintra_core::api::endpoint;
use sintra_core::{MemorySearch, MemorySnapshot, SyncOptions};

use super::CommandContext;
use super::helpers::{failure_message, fetch_once};
use crate::table::{format_timestamp, truncate};

pub(crate) async fn handle_memory_command(
    ctx: &CommandContext,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.memory_started");

    let state = fetch_once(
        &ctx.client,
        endpoint::memory(),
        SyncOptions::<MemorySnapshot>::new(),
    )
    .await;

    if let Some(message) = failure_message(&state) {
        eprintln!("❌ Failed to load memory: {}", message);
        error!(event = "cli.memory_failed", error = %message);
        return Err(message.into());
    }
    let Some(snapshot) = state.data else {
        return Err("No data received".into());
    };

    println!("Memory");
    println!("  Working:    {}", snapshot.size.working);
    println!("  Episodic:   {}", snapshot.size.episodic);
    println!("  Semantic:   {}", snapshot.size.semantic);
    println!("  Total:      {}", snapshot.size.total());
    println!();
    println!("Tasks stored:     {}", snapshot.stats.tasks_stored);
    println!("Knowledge items:  {}", snapshot.stats.knowledge_items);
    println!("Retrievals:       {}", snapshot.stats.total_retrievals);

    if !snapshot.recent_memories.is_empty() {
        println!();
        println!("Recent memories:");
        for entry in &snapshot.recent_memories {
            println!("  • {}", memory_line(entry));
        }
    }

    info!(
        event = "cli.memory_completed",
        total = snapshot.size.total(),
        recent = snapshot.recent_memories.len()
    );

    Ok(())
}

pub(crate) async fn handle_search_command(
    matches: &ArgMatches,
    ctx: &CommandContext,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = matches
        .get_one::<String>("query")
        .ok_or("Query is required")?;
    let limit = *matches.get_one::<u32>("limit").unwrap_or(&10);

    let Some(search_endpoint) = endpoint::memory_search(query, limit) else {
        eprintln!("❌ The search query cannot be empty.");
        return Err("Empty search query".into());
    };

    info!(event = "cli.search_started", query = %query.trim(), limit = limit);

    let state = fetch_once(
        &ctx.client,
        search_endpoint,
        SyncOptions::<MemorySearch>::new(),
    )
    .await;

    if let Some(message) = failure_message(&state) {
        eprintln!("❌ Memory search failed: {}", message);
        error!(event = "cli.search_failed", error = %message);
        return Err(message.into());
    }
    let Some(search) = state.data else {
        return Err("No data received".into());
    };

    if search.results.is_empty() {
        println!("No memories match '{}'.", search.query);
    } else {
        println!("{} result(s) for '{}':", search.count, search.query);
        for entry in &search.results {
            println!("  • {}", memory_line(entry));
        }
    }

    info!(event = "cli.search_completed", count = search.count);

    Ok(())
}

/// One-line summary of a memory entry.
///
/// Entries are untyped; task memories carry a description, knowledge items
/// only a category.
fn memory_line(entry: &Value) -> String {
    let field = |name: &str| entry.get(name).and_then(Value::as_str);

    let kind = field("type").or_else(|| field("category")).unwrap_or("memory");
    let summary = field("description")
        .or_else(|| field("id"))
        .map(str::to_string)
        .unwrap_or_else(|| entry.to_string());
    let summary = truncate(&summary, 70);
    let summary = summary.trim_end();

    match field("timestamp") {
        Some(ts) => format!("[{}] {}  {}", kind, format_timestamp(ts), summary),
        None => format!("[{}] {}", kind, summary),
    }
}
