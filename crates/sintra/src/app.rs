use clap::{Arg, ArgAction, Command};
use clap_complete::Shell;

pub fn build_cli() -> Command {
    Command::new("sintra")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Create tasks for specialized AI agents and watch their progress")
        .long_about("SINTRA routes tasks to specialized agents (social media, support, SEO, data, business, email, copywriting). This CLI talks to a running SINTRA backend: it lists agents and tasks, creates, follows and deletes tasks, asks the core agent questions, browses agent memory and watches the dashboard live.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Backend API base URL (overrides config and SINTRA_API_URL)")
                .value_name("URL")
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("agents")
                .about("List the specialized agents")
                .arg(
                    Arg::new("all")
                        .long("all")
                        .short('a')
                        .help("Show every agent instead of the first few")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("agent")
                .about("Show one agent in detail")
                .arg(
                    Arg::new("id")
                        .help("Agent identifier (e.g. soshie, penn)")
                        .required(true)
                        .index(1)
                )
        )
        .subcommand(
            Command::new("tasks")
                .about("List task history, newest first")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("task")
                .about("Show the status of one task")
                .arg(
                    Arg::new("id")
                        .help("Task identifier")
                        .required(true)
                        .index(1)
                )
        )
        .subcommand(
            Command::new("create")
                .about("Create a new task")
                .arg(
                    Arg::new("description")
                        .help("What the agent should do")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("agent")
                        .long("agent")
                        .short('a')
                        .help("Specialized agent to route the task to (default: chosen by the server)")
                )
                .arg(
                    Arg::new("model")
                        .long("model")
                        .short('m')
                        .help("Model to run the task with (default: server setting)")
                )
                .arg(
                    Arg::new("manual")
                        .long("manual")
                        .help("Do not let the agent run autonomously")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("wait")
                        .long("wait")
                        .short('w')
                        .help("Wait for the task to complete and print its result")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .help("Give up waiting after this many seconds (default: 300)")
                        .value_name("SECONDS")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .requires("wait")
                )
                .arg(
                    Arg::new("poll-interval")
                        .long("poll-interval")
                        .help("Seconds between status checks while waiting (default: 2)")
                        .value_name("SECONDS")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .requires("wait")
                )
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a task")
                .arg(
                    Arg::new("id")
                        .help("Task identifier")
                        .required(true)
                        .index(1)
                )
        )
        .subcommand(
            Command::new("memory")
                .about("Show the agent memory overview")
        )
        .subcommand(
            Command::new("search")
                .about("Search the agent memory")
                .arg(
                    Arg::new("query")
                        .help("Search terms")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .short('n')
                        .help("Maximum number of results (default: 10)")
                        .value_parser(clap::value_parser!(u32).range(1..))
                        .default_value("10")
                )
        )
        .subcommand(
            Command::new("status")
                .about("Show the core agent status")
        )
        .subcommand(
            Command::new("think")
                .about("Ask the core agent a question and print its answer")
                .arg(
                    Arg::new("prompt")
                        .help("Question or problem to reason about")
                        .required(true)
                        .index(1)
                )
        )
        .subcommand(
            Command::new("reset")
                .about("Reset the core agent")
        )
        .subcommand(
            Command::new("watch")
                .about("Live dashboard: agent status and recent tasks, refreshed until Ctrl-C")
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .short('i')
                        .help("Refresh interval in seconds (default: refresh.interval_secs, 5)")
                        .value_name("SECONDS")
                        .value_parser(clap::value_parser!(u64).range(1..))
                )
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for")
                        .required(true)
                        .index(1)
                        .value_parser(clap::value_parser!(Shell))
                )
        )
}
