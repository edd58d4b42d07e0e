use std::sync::Arc;

use crate::cli::commands::{Cli, Commands, JsonArgs, ListArgs};
use crate::cli::output::{
    ProgressJson, TaskListJson, format_progress, format_task_list, next_to_json, task_to_json,
};
use crate::io::command::ProcessRunner;
use crate::model::config::MonitorConfig;
use crate::model::snapshot::Snapshot;
use crate::model::task::{Priority, Status, Task};
use crate::ops::resolve::SourceResolver;
use crate::tui::format::recommendation_lines;

/// Fold command-line overrides into the loaded config
pub fn apply_overrides(cli: &Cli, config: &mut MonitorConfig) {
    if let Some(path) = &cli.tasks_file {
        config.source.task_files.insert(0, path.clone());
    }
    if let Some(program) = &cli.program {
        config.source.program = program.clone();
    }
    if let Some(secs) = cli.interval {
        config.ui.refresh_interval_secs = secs;
    }
    if let Some(path) = &cli.log_file {
        config.log_file = Some(path.clone());
    }
    if cli.no_mouse {
        config.ui.mouse = false;
    }
}

/// Run a non-interactive subcommand
pub async fn dispatch(
    command: Commands,
    config: &MonitorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::List(args) => cmd_list(args, config).await,
        Commands::Next(args) => cmd_next(args, config).await,
        Commands::Progress(args) => cmd_progress(args, config).await,
    }
}

/// One pass through the source chain
async fn resolve_once(config: &MonitorConfig) -> Snapshot {
    let runner = Arc::new(ProcessRunner::new(&config.source.program));
    SourceResolver::from_config(&config.source, runner)
        .resolve(1)
        .await
}

async fn cmd_list(args: ListArgs, config: &MonitorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let status = args
        .status
        .as_deref()
        .map(|s| Status::parse(s).ok_or_else(|| format!("unknown status '{s}'")))
        .transpose()?;
    let priority = args
        .priority
        .as_deref()
        .map(|s| Priority::parse(s).ok_or_else(|| format!("unknown priority '{s}'")))
        .transpose()?;

    let snapshot = resolve_once(config).await;
    let tasks: Vec<&Task> = snapshot
        .tasks
        .iter()
        .filter(|t| priority.is_none_or(|p| t.priority == p))
        .filter(|t| status.is_none_or(|s| t.status == s))
        .collect();

    if args.json {
        let out = TaskListJson {
            source: snapshot.source.label(),
            tasks: tasks.iter().map(|t| task_to_json(t)).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if tasks.is_empty() {
        println!("no tasks ({})", snapshot.source.label());
    } else {
        println!("{}", format_task_list(&tasks, config.ui.title_width));
    }
    Ok(())
}

async fn cmd_next(args: JsonArgs, config: &MonitorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = resolve_once(config).await;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&next_to_json(&snapshot.recommendation))?
        );
    } else {
        for line in recommendation_lines(&snapshot.recommendation, &config.source.program) {
            println!("{line}");
        }
    }
    Ok(())
}

async fn cmd_progress(
    args: JsonArgs,
    config: &MonitorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = resolve_once(config).await;
    if args.json {
        let out = ProgressJson {
            source: snapshot.source.label(),
            progress: &snapshot.progress,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", format_progress(&snapshot));
    }
    Ok(())
}
