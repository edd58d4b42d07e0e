use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tmon",
    about = concat!("tmon v", env!("CARGO_PKG_VERSION"), " - a live board for task-master projects"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: .tmon.toml in the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Structured task file to try before the configured candidates
    #[arg(long = "tasks-file", global = true)]
    pub tasks_file: Option<PathBuf>,

    /// External task tool binary
    #[arg(long, global = true)]
    pub program: Option<String>,

    /// Seconds between automatic refreshes
    #[arg(long, global = true)]
    pub interval: Option<u64>,

    /// Write logs to this file
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    /// Disable mouse capture in the board
    #[arg(long = "no-mouse", global = true)]
    pub no_mouse: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve tasks once and print them
    List(ListArgs),
    /// Print the recommended next task
    Next(JsonArgs),
    /// Print the project progress roll-up
    Progress(JsonArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (done, in-progress, pending)
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by priority (high, medium, low)
    #[arg(long)]
    pub priority: Option<String>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct JsonArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
