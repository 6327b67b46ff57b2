use std::time::Duration;

use clap::ArgMatches;
use serde_json::Value;
use tracing::{error, info};

use sintra_core::api::endpoint;
use sintra_core::events;
use sintra_core::resources::{CreateTaskRequest, TaskDetail, sort_newest_first};
use sintra_core::{SintraError, SyncOptions, Task, TaskWait, wait_for_task};

use super::CommandContext;
use super::helpers::{failure_message, fetch_once, print_json};
use crate::table::{TableFormatter, format_timestamp};

pub(crate) async fn handle_tasks_command(
    matches: &ArgMatches,
    ctx: &CommandContext,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");

    info!(event = "cli.tasks_started", json_output = json_output);

    let state = fetch_once(&ctx.client, endpoint::tasks(), SyncOptions::<Vec<Task>>::new()).await;

    if let Some(message) = failure_message(&state) {
        eprintln!("❌ Failed to load tasks: {}", message);
        error!(event = "cli.tasks_failed", error = %message);
        return Err(message.into());
    }
    let mut tasks = state.data.unwrap_or_default();
    sort_newest_first(&mut tasks);

    if json_output {
        print_json(&tasks)?;
    } else if tasks.is_empty() {
        println!("No tasks yet. Create one with: sintra create \"<description>\"");
    } else {
        println!("Tasks:");
        TableFormatter::for_tasks(&tasks).print_tasks(&tasks);
    }

    info!(event = "cli.tasks_completed", count = tasks.len());

    Ok(())
}

pub(crate) async fn handle_task_command(
    matches: &ArgMatches,
    ctx: &CommandContext,
) -> Result<(), Box<dyn std::error::Error>> {
    let task_id = matches
        .get_one::<String>("id")
        .ok_or("Task id is required")?;

    info!(event = "cli.task_started", task_id = %task_id);

    let state = fetch_once(
        &ctx.client,
        endpoint::task(task_id),
        SyncOptions::<TaskDetail>::new(),
    )
    .await;

    if let Some(message) = failure_message(&state) {
        eprintln!("❌ Failed to load task '{}': {}", task_id, message);
        error!(event = "cli.task_failed", task_id = %task_id, error = %message);
        return Err(message.into());
    }
    let Some(task) = state.data else {
        return Err("No data received".into());
    };

    println!("Task:       {}", task.task_id);
    println!("Status:     {} {}", task.status.icon(), task.status);
    println!("Created:    {}", format_timestamp(&task.created_at));
    println!("Updated:    {}", format_timestamp(&task.updated_at));
    println!();
    println!("{}", task.description);

    if let Some(result) = &task.result {
        println!();
        println!("Result:");
        println!("{}", render_result(result));
    }
    if let Some(task_error) = &task.error {
        println!();
        println!("Error: {}", task_error);
    }

    info!(
        event = "cli.task_completed",
        task_id = %task_id,
        status = %task.status
    );

    Ok(())
}

pub(crate) async fn handle_create_command(
    matches: &ArgMatches,
    ctx: &CommandContext,
) -> Result<(), Box<dyn std::error::Error>> {
    let description = matches
        .get_one::<String>("description")
        .ok_or("Description is required")?;

    let mut request = CreateTaskRequest::new(description);
    if request.description.is_empty() {
        eprintln!("❌ The task description cannot be empty.");
        return Err("Empty task description".into());
    }
    request.agent_id = matches.get_one::<String>("agent").cloned();
    request.model = matches.get_one::<String>("model").cloned();
    request.autonomous = !matches.get_flag("manual");

    info!(
        event = "cli.create_started",
        agent_id = request.agent_id.as_deref().unwrap_or("auto"),
        autonomous = request.autonomous
    );

    let created = match ctx.client.create_task(&request).await {
        Ok(created) => created,
        Err(e) => {
            eprintln!("❌ Failed to create task: {}", e.user_message());
            error!(event = "cli.create_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };

    println!("✅ Task created");
    println!("   ID:      {}", created.task_id);
    println!("   Status:  {} {}", created.status.icon(), created.status);
    println!("   Created: {}", format_timestamp(&created.created_at));
    info!(event = "cli.create_completed", task_id = %created.task_id);

    if !matches.get_flag("wait") {
        println!();
        println!("Follow it with: sintra task {}", created.task_id);
        return Ok(());
    }

    let wait = task_wait_from(matches);
    println!();
    println!(
        "⏳ Waiting for the task to finish (checking every {}s, up to {}s)...",
        wait.interval.as_secs(),
        wait.timeout.as_secs()
    );

    match wait_for_task(ctx.client.clone(), &created.task_id, wait).await {
        Ok(task) => {
            println!("✅ Task completed");
            if let Some(result) = &task.result {
                println!();
                println!("Result:");
                println!("{}", render_result(result));
            }
            info!(event = "cli.create_wait_completed", task_id = %task.task_id);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            error!(
                event = "cli.create_wait_failed",
                task_id = %created.task_id,
                error_code = e.error_code()
            );
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

/// Wait settings from `--timeout` and `--poll-interval`, defaults otherwise.
fn task_wait_from(matches: &ArgMatches) -> TaskWait {
    let mut wait = TaskWait::default();
    if let Some(secs) = matches.get_one::<u64>("timeout") {
        wait.timeout = Duration::from_secs(*secs);
    }
    if let Some(secs) = matches.get_one::<u64>("poll-interval") {
        wait.interval = Duration::from_secs(*secs);
    }
    wait
}

pub(crate) async fn handle_delete_command(
    matches: &ArgMatches,
    ctx: &CommandContext,
) -> Result<(), Box<dyn std::error::Error>> {
    let task_id = matches
        .get_one::<String>("id")
        .ok_or("Task id is required")?;

    info!(event = "cli.delete_started", task_id = %task_id);

    match ctx.client.delete_task(task_id).await {
        Ok(ack) if ack.success => {
            println!("✅ Task '{}' deleted", task_id);
            info!(event = "cli.delete_completed", task_id = %task_id);
            Ok(())
        }
        Ok(ack) => {
            let message = if ack.message.is_empty() {
                "The server refused to delete the task".to_string()
            } else {
                ack.message
            };
            eprintln!("❌ Failed to delete task '{}': {}", task_id, message);
            error!(event = "cli.delete_failed", task_id = %task_id, error = %message);
            Err(message.into())
        }
        Err(e) => {
            eprintln!("❌ Failed to delete task '{}': {}", task_id, e.user_message());
            error!(event = "cli.delete_failed", task_id = %task_id, error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

/// Task results are free-form; strings print as-is, anything else as JSON.
fn render_result(result: &Value) -> String {
    match result {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
