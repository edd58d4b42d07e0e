use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::Deserialize;

use crate::model::task::{Priority, Status, Task};

/// First candidate path that exists, in order
pub fn find_task_file(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

/// Parse a structured task file.
///
/// Accepts `{"tasks": [...]}` and the tagged layout `{"<tag>": {"tasks": [...]}}`,
/// preferring the `master` tag.
pub fn parse_task_file(text: &str) -> Result<Vec<Task>, serde_json::Error> {
    let file: RawFile = serde_json::from_str(text)?;
    let raw = match file {
        RawFile::Flat { tasks } => tasks,
        RawFile::Tagged(mut tags) => tags
            .shift_remove("master")
            .or_else(|| tags.into_values().next())
            .map(|t| t.tasks)
            .unwrap_or_default(),
    };
    Ok(raw.into_iter().map(|t| t.into_task(None)).collect())
}

/// Which directories to watch for the given candidates
pub fn watch_dirs(candidates: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs: IndexSet<PathBuf> = IndexSet::new();
    for candidate in candidates {
        let dir = match candidate.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if dir.is_dir() {
            dirs.insert(dir);
        }
    }
    dirs.into_iter().collect()
}

/// Whether a changed path could be one of the candidate files
pub fn is_task_file_event(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFile {
    Flat { tasks: Vec<RawTask> },
    Tagged(indexmap::IndexMap<String, RawTagged>),
}

#[derive(Deserialize)]
struct RawTagged {
    #[serde(default)]
    tasks: Vec<RawTask>,
}

/// Ids show up as either numbers or strings
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Num(u64),
    Str(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Num(n) => n.to_string(),
            RawId::Str(s) => s,
        }
    }
}

#[derive(Deserialize)]
struct RawTask {
    id: RawId,
    title: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    dependencies: Vec<RawId>,
    #[serde(default)]
    subtasks: Vec<RawTask>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    complexity: Option<serde_json::Value>,
}

impl RawTask {
    /// `parent` is set for subtasks, whose bare ids and sibling
    /// dependencies are qualified as `parent.n`
    fn into_task(self, parent: Option<&str>) -> Task {
        let id = qualify(self.id.into_string(), parent);
        let status = self
            .status
            .as_deref()
            .map(Status::from_label)
            .unwrap_or(Status::Pending);
        let priority = self
            .priority
            .as_deref()
            .map(Priority::from_label)
            .unwrap_or_default();

        let dependencies = self
            .dependencies
            .into_iter()
            .map(|dep| match dep {
                RawId::Num(n) => qualify(n.to_string(), parent),
                RawId::Str(s) => s,
            })
            .collect();
        let subtasks = self
            .subtasks
            .into_iter()
            .map(|s| s.into_task(Some(id.as_str())))
            .collect();
        let complexity = self.complexity.and_then(|v| match v {
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        });

        Task {
            id,
            title: self.title,
            status,
            priority,
            dependencies,
            subtasks,
            description: self.description.filter(|d| !d.trim().is_empty()),
            complexity,
        }
    }
}

fn qualify(id: String, parent: Option<&str>) -> String {
    match parent {
        Some(parent) if !id.contains('.') => format!("{parent}.{id}"),
        _ => id,
    }
}
