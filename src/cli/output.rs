use serde::Serialize;

use crate::model::progress::ProjectProgress;
use crate::model::recommendation::{Recommendation, RecommendationOrigin, RecommendedTask};
use crate::model::snapshot::Snapshot;
use crate::model::task::{Priority, Status, Task};
use crate::tui::format::{RowLayout, format_row, progress_bar};
use crate::util::unicode::display_width;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub status: Status,
    pub priority: Priority,
    pub progress: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<TaskJson<'a>>,
}

#[derive(Serialize)]
pub struct TaskListJson<'a> {
    pub source: String,
    pub tasks: Vec<TaskJson<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NextJson<'a> {
    Task {
        origin: RecommendationOrigin,
        task: &'a RecommendedTask,
    },
    AllComplete,
    Demo {
        task: &'a RecommendedTask,
    },
}

#[derive(Serialize)]
pub struct ProgressJson<'a> {
    pub source: String,
    #[serde(flatten)]
    pub progress: &'a ProjectProgress,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson<'_> {
    TaskJson {
        id: &task.id,
        title: &task.title,
        status: task.status,
        priority: task.priority,
        progress: task.progress(),
        dependencies: task.dependencies.iter().map(String::as_str).collect(),
        subtasks: task.subtasks.iter().map(task_to_json).collect(),
    }
}

pub fn next_to_json(rec: &Recommendation) -> NextJson<'_> {
    match rec {
        Recommendation::Task { task, origin } => NextJson::Task {
            origin: *origin,
            task,
        },
        Recommendation::AllComplete => NextJson::AllComplete,
        Recommendation::Demo(task) => NextJson::Demo { task },
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One formatted row per task, subtasks indented beneath
pub fn format_task_list(tasks: &[&Task], title_width: usize) -> String {
    let top = RowLayout::for_tasks(tasks.iter().copied(), title_width);
    // subtask rows are indented by two, so both id columns share one right edge
    let sub_ids = tasks
        .iter()
        .copied()
        .flat_map(|t| &t.subtasks)
        .map(|s| display_width(&s.id) + 2)
        .max()
        .unwrap_or(0);
    let id_width = top.id_width.max(sub_ids);
    let layout = RowLayout { id_width, ..top };
    let sub_layout = RowLayout {
        id_width: id_width - 2,
        ..top
    };

    let mut lines = Vec::new();
    for task in tasks {
        lines.push(format_row(task, layout));
        for sub in &task.subtasks {
            lines.push(format!("  {}", format_row(sub, sub_layout)));
        }
    }
    lines.join("\n")
}

/// `?` stands in for anything the source did not report
pub fn format_progress(snapshot: &Snapshot) -> String {
    fn or_unknown<T: ToString>(v: Option<T>) -> String {
        v.map_or_else(|| "?".to_string(), |v| v.to_string())
    }

    let p = &snapshot.progress;
    let task_bar = p.tasks.percentage.map(progress_bar).unwrap_or_default();
    let sub_bar = p.subtasks.percentage.map(progress_bar).unwrap_or_default();
    let counts = p.tasks.counts;
    let subs = p.subtasks.counts;
    [
        format!("Source:   {}", snapshot.source.label()),
        format!(
            "Tasks:    {task_bar} {}%  done {}  in-progress {}  pending {}",
            or_unknown(p.tasks.percentage),
            or_unknown(counts.map(|c| c.done)),
            or_unknown(counts.map(|c| c.in_progress)),
            or_unknown(counts.map(|c| c.pending)),
        ),
        format!(
            "Subtasks: {sub_bar} {}%  {}/{} done",
            or_unknown(p.subtasks.percentage),
            or_unknown(subs.map(|c| c.completed)),
            or_unknown(subs.map(|c| c.total)),
        ),
    ]
    .join("\n")
}
