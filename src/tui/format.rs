use chrono::{DateTime, Local};

use crate::model::progress::ProjectProgress;
use crate::model::recommendation::{Recommendation, RecommendedTask};
use crate::model::task::{Priority, Status, Task};
use crate::ops::progress::{count_statuses, percentage};
use crate::util::unicode::{display_width, fit_to_width, pad_to_width};

use super::view_model::DetailState;

/// Narrowest id column; wider ids grow it
pub const MIN_ID_WIDTH: usize = 4;
/// Glyph, space and the longest label (`in-progress`)
pub const STATUS_WIDTH: usize = 13;
pub const PRIORITY_WIDTH: usize = 6;
pub const BAR_CELLS: usize = 10;

/// `[█████     ]`, one cell per 10%
pub fn progress_bar(pct: u8) -> String {
    let filled = ((pct.min(100) as f64) / 10.0).round() as usize;
    format!(
        "[{}{}]",
        "█".repeat(filled),
        " ".repeat(BAR_CELLS - filled)
    )
}

pub fn status_cell(status: Status) -> String {
    format!("{} {}", status.glyph(), status.label())
}

/// Columns after the id and around the title, with their separating spaces
const FIXED_COLUMNS: usize = 1 + 1 + STATUS_WIDTH + 1 + PRIORITY_WIDTH + 1 + BAR_CELLS + 2 + 1 + 4;

/// Column widths shared by every row of one list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    pub id_width: usize,
    pub title_width: usize,
}

impl RowLayout {
    /// Id column wide enough for the longest id in `tasks`
    pub fn for_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>, title_width: usize) -> Self {
        let id_width = tasks
            .into_iter()
            .map(|t| display_width(&t.id))
            .max()
            .unwrap_or(0)
            .max(MIN_ID_WIDTH);
        RowLayout {
            id_width,
            title_width,
        }
    }

    /// Shrink the title so a row fits `available` cells, never below 10
    pub fn fit(self, available: usize) -> Self {
        let room = available.saturating_sub(self.id_width + FIXED_COLUMNS);
        RowLayout {
            title_width: self.title_width.min(room).max(10),
            ..self
        }
    }
}

/// One task row split into its padded columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCells {
    pub id: String,
    pub title: String,
    pub status: String,
    pub priority: String,
    /// Bar and percentage
    pub progress: String,
}

pub fn row_cells(task: &Task, layout: RowLayout) -> RowCells {
    RowCells {
        id: pad_to_width(&task.id, layout.id_width),
        title: fit_to_width(&task.title, layout.title_width),
        status: pad_to_width(&status_cell(task.status), STATUS_WIDTH),
        priority: pad_to_width(task.priority.label(), PRIORITY_WIDTH),
        progress: format!("{} {:>3}%", progress_bar(task.progress()), task.progress()),
    }
}

/// Fixed-width columns: id, title, status, priority, bar, percentage
pub fn format_row(task: &Task, layout: RowLayout) -> String {
    let c = row_cells(task, layout);
    format!("{} {} {} {} {}", c.id, c.title, c.status, c.priority, c.progress)
}

pub fn filter_label(priority: Option<Priority>, status: Option<Status>) -> String {
    let mut out = String::new();
    if let Some(p) = priority {
        out.push_str(&format!("(Priority: {}) ", p.label()));
    }
    out.push_str(&format!(
        "(Status: {})",
        status.map_or("all", |s| s.label())
    ));
    out
}

/// First header line: clock, filters, source and progress bars
pub fn header_title(
    now: DateTime<Local>,
    filters: &str,
    source: Option<&str>,
    progress: Option<&ProjectProgress>,
) -> String {
    let mut parts = vec![format!("Task Monitor - {} {}", now.format("%H:%M:%S"), filters)];
    if let Some(source) = source {
        parts.push(format!("Source: {source}"));
    }
    if let Some(pct) = progress.and_then(|p| p.tasks.percentage) {
        parts.push(format!("Tasks: {} {pct}%", progress_bar(pct)));
    }
    if let Some(pct) = progress.and_then(|p| p.subtasks.percentage) {
        parts.push(format!("Subtasks: {} {pct}%", progress_bar(pct)));
    }
    parts.join("  |  ")
}

/// Second header line: counts (or a plain total when unknown) and rows shown
pub fn header_counts(progress: Option<&ProjectProgress>, total_tasks: usize, displaying: usize) -> String {
    let mut parts = Vec::new();
    match progress.and_then(|p| p.tasks.counts) {
        Some(c) => parts.push(format!(
            "Done: {}   In Progress: {}   Pending: {}   Total: {}",
            c.done,
            c.in_progress,
            c.pending,
            c.total()
        )),
        None => parts.push(format!("Total Tasks: {total_tasks}")),
    }
    if let Some(c) = progress.and_then(|p| p.subtasks.counts) {
        parts.push(format!("Subtasks: {}/{} done", c.completed, c.total));
    }
    parts.push(format!("Displaying: {displaying} tasks"));
    parts.join("  |  ")
}

/// Text block for the recommendation panel
pub fn recommendation_lines(rec: &Recommendation, program: &str) -> Vec<String> {
    match rec {
        Recommendation::Task { task, .. } => recommended_task_lines(task, program),
        Recommendation::Demo(task) => {
            let mut lines = vec!["All sources unavailable, showing demo data".to_string()];
            lines.extend(recommended_task_lines(task, program));
            lines
        }
        Recommendation::AllComplete => vec![
            "All work complete".to_string(),
            "No in-progress or pending tasks remain.".to_string(),
        ],
    }
}

fn recommended_task_lines(task: &RecommendedTask, program: &str) -> Vec<String> {
    let id = task.id.as_deref().unwrap_or("?");
    let mut lines = vec![format!(
        "🔥 Recommended Task: #{id} {}",
        task.title.as_deref().unwrap_or_default()
    )
    .trim_end()
    .to_string()];

    let mut facts = Vec::new();
    if let Some(p) = task.priority {
        facts.push(format!("Priority: {}", p.label()));
    }
    if let Some(s) = task.status {
        facts.push(status_cell(s));
    }
    if let Some(d) = task.dependencies.as_deref().filter(|d| !d.is_empty()) {
        facts.push(format!("Dependencies: {d}"));
    }
    if let Some(c) = &task.complexity {
        facts.push(format!("Complexity: {c}"));
    }
    if !facts.is_empty() {
        lines.push(facts.join("  |  "));
    }

    match task.description.as_deref() {
        Some(desc) => lines.push(desc.to_string()),
        None => lines.push(format!("Details: {program} show {id}")),
    }
    lines
}

/// Panel title for the detail block
pub fn detail_title(detail: &DetailState) -> String {
    match detail {
        DetailState::NoSelection => " Selected Task Subtasks ".to_string(),
        DetailState::NotFound(id)
        | DetailState::Loading(id)
        | DetailState::NoSubtasks(id)
        | DetailState::Subtasks { task_id: id, .. } => format!(" Task #{id} Subtasks "),
    }
}

/// Text block for the detail panel, at most `max_lines` long and `width` wide
pub fn detail_lines(
    detail: &DetailState,
    title_width: usize,
    width: usize,
    max_lines: usize,
) -> Vec<String> {
    match detail {
        DetailState::NoSelection => vec!["Select a task to display its subtasks.".to_string()],
        DetailState::NotFound(id) => vec![format!("Task #{id} not found in the current list.")],
        DetailState::Loading(id) => vec![format!("Loading subtasks for #{id}…")],
        DetailState::NoSubtasks(id) => vec![format!("No subtasks found for task #{id}.")],
        DetailState::Subtasks { subtasks, .. } => {
            let layout = RowLayout::for_tasks(subtasks, title_width).fit(width);
            subtask_lines(subtasks, layout, max_lines)
        }
    }
}

fn subtask_lines(subtasks: &[Task], layout: RowLayout, max_lines: usize) -> Vec<String> {
    let counts = count_statuses(subtasks);
    let mut lines = vec![format!(
        "Done: {}   In Progress: {}   Pending: {}   {} {}%",
        counts.done,
        counts.in_progress,
        counts.pending,
        progress_bar(percentage(counts.done, counts.total())),
        percentage(counts.done, counts.total())
    )];

    let room = max_lines.saturating_sub(1);
    if subtasks.len() <= room {
        lines.extend(subtasks.iter().map(|t| format_row(t, layout)));
    } else {
        let shown = room.saturating_sub(1);
        lines.extend(subtasks[..shown].iter().map(|t| format_row(t, layout)));
        lines.push(format!("… and {} more", subtasks.len() - shown));
    }
    lines
}
