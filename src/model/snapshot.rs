use std::path::PathBuf;

use super::progress::ProjectProgress;
use super::recommendation::Recommendation;
use super::task::Task;

/// Which provider produced a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Structured task file at this path
    TaskFile(PathBuf),
    /// The external listing command's table
    ListCommand,
    /// The external "next task" report
    NextCommand,
    /// Hardcoded demonstration data
    Demo,
}

impl SourceKind {
    pub fn label(&self) -> String {
        match self {
            SourceKind::TaskFile(path) => path.display().to_string(),
            SourceKind::ListCommand => "list command".to_string(),
            SourceKind::NextCommand => "next command".to_string(),
            SourceKind::Demo => "demo data".to_string(),
        }
    }
}

/// One immutable refresh result. Replaced wholesale on the next cycle.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Stamp of the refresh cycle that produced this snapshot
    pub generation: u64,
    pub source: SourceKind,
    pub tasks: Vec<Task>,
    pub progress: ProjectProgress,
    pub recommendation: Recommendation,
}

impl Snapshot {
    /// Find a top-level task by id (string comparison)
    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}
