use std::path::PathBuf;
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::io::command::CommandRunner;
use crate::io::task_file::{find_task_file, parse_task_file};
use crate::model::progress::ProjectProgress;
use crate::model::recommendation::RecommendedTask;
use crate::model::snapshot::SourceKind;
use crate::model::task::Task;
use crate::ops::demo::demo_tasks;
use crate::parse::{parse_recommendation_section, parse_subtasks, parse_summary, parse_table};

/// Why a source could not produce tasks. Every variant means "try the next one".
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("no task file at any candidate path")]
    NoTaskFile,
    #[error("could not read {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed task file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("`{program}` is not installed or not on PATH")]
    MissingProgram { program: String },
    #[error("could not run `{command}`: {source}")]
    SpawnError {
        command: String,
        source: std::io::Error,
    },
    #[error("`{command}` timed out after {after_secs}s")]
    Timeout { command: String, after_secs: u64 },
    #[error("`{command}` failed ({status})")]
    CommandFailed { command: String, status: ExitStatus },
    #[error("{0} produced no tasks")]
    Empty(&'static str),
    #[error("no recommended task in `{0}` output")]
    NoRecommendation(String),
}

/// What one provider produced
#[derive(Debug, Clone)]
pub struct SourceOutput {
    pub kind: SourceKind,
    pub tasks: Vec<Task>,
    /// Roll-up reported by the source itself; `None` means aggregate locally
    pub progress: Option<ProjectProgress>,
    /// A recommendation the source states explicitly
    pub recommendation: Option<RecommendedTask>,
}

impl SourceOutput {
    fn tasks(kind: SourceKind, tasks: Vec<Task>) -> Self {
        SourceOutput {
            kind,
            tasks,
            progress: None,
            recommendation: None,
        }
    }
}

/// One entry in the ordered fallback chain
#[async_trait]
pub trait TaskSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn try_resolve(&self) -> Result<SourceOutput, SourceError>;

    /// Sources that only ever report a recommendation. The resolver asks
    /// them again when the winning task list came without one.
    fn recommends_only(&self) -> bool {
        false
    }
}

/// The structured task file at the first existing candidate path
pub struct TaskFileSource {
    candidates: Vec<PathBuf>,
}

impl TaskFileSource {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        TaskFileSource { candidates }
    }
}

#[async_trait]
impl TaskSource for TaskFileSource {
    fn name(&self) -> &'static str {
        "task file"
    }

    async fn try_resolve(&self) -> Result<SourceOutput, SourceError> {
        let path = find_task_file(&self.candidates).ok_or(SourceError::NoTaskFile)?;
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SourceError::ReadError {
                path: path.clone(),
                source: e,
            })?;
        let tasks = parse_task_file(&text).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed task file");
            SourceError::Malformed {
                path: path.clone(),
                source: e,
            }
        })?;
        if tasks.is_empty() {
            return Err(SourceError::Empty("task file"));
        }
        Ok(SourceOutput::tasks(SourceKind::TaskFile(path), tasks))
    }
}

/// The external tool's listing table, with its summary lines
pub struct ListCommandSource {
    runner: Arc<dyn CommandRunner>,
    limit: Duration,
}

impl ListCommandSource {
    pub fn new(runner: Arc<dyn CommandRunner>, limit: Duration) -> Self {
        ListCommandSource { runner, limit }
    }
}

#[async_trait]
impl TaskSource for ListCommandSource {
    fn name(&self) -> &'static str {
        "list command"
    }

    async fn try_resolve(&self) -> Result<SourceOutput, SourceError> {
        let output = self.runner.run(&["list"], self.limit).await?;
        let tasks = parse_table(&output);
        if tasks.is_empty() {
            return Err(SourceError::Empty("list command"));
        }
        Ok(SourceOutput {
            kind: SourceKind::ListCommand,
            tasks,
            progress: Some(parse_summary(&output)),
            recommendation: parse_recommendation_section(&output).filter(|r| r.has_id()),
        })
    }
}

/// The external "next task" report. Yields a recommendation but no tasks.
pub struct NextCommandSource {
    runner: Arc<dyn CommandRunner>,
    limit: Duration,
}

impl NextCommandSource {
    pub fn new(runner: Arc<dyn CommandRunner>, limit: Duration) -> Self {
        NextCommandSource { runner, limit }
    }
}

#[async_trait]
impl TaskSource for NextCommandSource {
    fn name(&self) -> &'static str {
        "next command"
    }

    fn recommends_only(&self) -> bool {
        true
    }

    async fn try_resolve(&self) -> Result<SourceOutput, SourceError> {
        let output = self.runner.run(&["next"], self.limit).await?;
        let recommendation = parse_recommendation_section(&output)
            .filter(|r| r.has_id())
            .ok_or_else(|| SourceError::NoRecommendation(format!("{} next", self.runner.program())))?;
        Ok(SourceOutput {
            kind: SourceKind::NextCommand,
            tasks: Vec::new(),
            progress: None,
            recommendation: Some(recommendation),
        })
    }
}

/// Hardcoded demonstration tasks. Never fails.
pub struct DemoSource;

#[async_trait]
impl TaskSource for DemoSource {
    fn name(&self) -> &'static str {
        "demo data"
    }

    async fn try_resolve(&self) -> Result<SourceOutput, SourceError> {
        Ok(DemoSource::output())
    }
}

impl DemoSource {
    pub fn output() -> SourceOutput {
        SourceOutput::tasks(SourceKind::Demo, demo_tasks())
    }
}

/// Fetch a task's subtasks from the external detail report
pub async fn lookup_subtasks(
    runner: &dyn CommandRunner,
    task_id: &str,
    limit: Duration,
) -> Result<Vec<Task>, SourceError> {
    let output = runner.run(&["show", task_id], limit).await?;
    Ok(parse_subtasks(&output))
}
