use sintra_core::init_logging;

mod app;
mod commands;
mod roster;
mod table;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = app::build_cli();
    let matches = app.get_matches();

    // Logs stay quiet unless asked for; stdout is reserved for command output
    let verbose = matches.get_flag("verbose");
    init_logging(!verbose);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(commands::run_command(&matches))?;

    Ok(())
}
