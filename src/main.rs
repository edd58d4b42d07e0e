use std::path::Path;

use clap::Parser;
use task_monitor::cli::commands::Cli;
use task_monitor::cli::handlers;
use task_monitor::io::config_io::load_config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the tracing subscriber.
///
/// The board owns the terminal, so it only logs when given a file.
/// Subcommands log to stderr.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<(), std::io::Error> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "task_monitor=info".into());

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else if !interactive {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(cli.config.as_deref())?;
    handlers::apply_overrides(&cli, &mut config);
    init_tracing(config.log_file.as_deref(), cli.command.is_none())?;

    match cli.command {
        // No subcommand → launch the board
        None => task_monitor::tui::run(config).await,
        Some(command) => handlers::dispatch(command, &config).await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
