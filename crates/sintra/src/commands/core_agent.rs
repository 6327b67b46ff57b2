use clap::ArgMatches;
use tracing::{error, info};

use sintra_core::events;
use sintra_core::resources::ThinkRequest;

use super::CommandContext;

pub(crate) async fn handle_think_command(
    matches: &ArgMatches,
    ctx: &CommandContext,
) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = matches
        .get_one::<String>("prompt")
        .ok_or("Prompt is required")?;

    let request = ThinkRequest::new(prompt);
    if request.prompt.is_empty() {
        eprintln!("❌ The prompt cannot be empty.");
        return Err("Empty prompt".into());
    }

    info!(event = "cli.think_started", prompt_len = request.prompt.len());

    match ctx.client.think(&request).await {
        Ok(reply) => {
            println!("{}", reply.response);
            info!(event = "cli.think_completed", success = reply.success);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ The agent could not answer: {}", e.user_message());
            error!(event = "cli.think_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

pub(crate) async fn handle_reset_command(
    ctx: &CommandContext,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.reset_started");

    match ctx.client.reset_agent().await {
        Ok(ack) => {
            // No running agent is reported with success = false
            let icon = if ack.success { "✅" } else { "ℹ️ " };
            let message = if ack.message.is_empty() {
                reset_fallback_message(ack.success)
            } else {
                ack.message
            };
            println!("{} {}", icon, message);
            info!(event = "cli.reset_completed", success = ack.success);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to reset the agent: {}", e.user_message());
            error!(event = "cli.reset_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

fn reset_fallback_message(success: bool) -> String {
    if success {
        "Agent reset".to_string()
    } else {
        "No agent was running".to_string()
    }
}
