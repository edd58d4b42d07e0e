use std::sync::LazyLock;

use regex::Regex;

use crate::model::progress::{
    CompletionCounts, ProjectProgress, StatusCounts, SubtaskProgress, TaskProgress,
};
use crate::model::task::{Priority, Status, Task, parse_dependency_list};

/// Column separator used by the listing table
pub const COLUMN_SEP: char = '│';

/// Corner and junction glyphs that only appear on decorative border lines
const BORDER_GLYPHS: &[char] = &[
    '┌', '┐', '└', '┘', '├', '┤', '┬', '┴', '┼', '╭', '╮', '╰', '╯', '╞', '╡', '╪',
];

/// Header cell that marks the column-title row
const HEADER_TOKEN: &str = "ID";

/// Minimum `│`-delimited pieces (including the empty outer ones) for a row
const MIN_SEGMENTS: usize = 6;

/// Minimum non-empty cells: id, title, status, priority, dependencies
const MIN_CELLS: usize = 5;

static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)%").unwrap());
static STATUS_COUNTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Done:\s*(\d+)\W*In Progress:\s*(\d+)\W*Pending:\s*(\d+)").unwrap()
});
static COMPLETED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Completed:\s*(\d+)\s*/\s*(\d+)").unwrap());

/// Extract task rows from the listing command's box-drawn table.
///
/// Rows that do not split into at least five non-empty cells are dropped.
/// Titles, priorities and dependency cells pass through without validation
/// beyond the lenient enum mapping.
pub fn parse_table(text: &str) -> Vec<Task> {
    text.lines()
        .filter(|line| is_table_row(line))
        .filter_map(parse_row)
        .collect()
}

/// Whether a line is structurally a data row of the table
pub fn is_table_row(line: &str) -> bool {
    if !line.contains(COLUMN_SEP) || line.contains(BORDER_GLYPHS) {
        return false;
    }
    if line.split(COLUMN_SEP).count() < MIN_SEGMENTS {
        return false;
    }
    !line
        .split(COLUMN_SEP)
        .any(|cell| cell.trim() == HEADER_TOKEN)
}

fn parse_row(line: &str) -> Option<Task> {
    let cells: Vec<&str> = line
        .split(COLUMN_SEP)
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect();
    if cells.len() < MIN_CELLS {
        return None;
    }

    let mut task = Task::new(
        cells[0],
        cells[1],
        Status::from_table_cell(cells[2]),
        Priority::from_label(cells[3]),
    );
    task.dependencies = parse_dependency_list(cells[4]);
    task.complexity = cells
        .get(5)
        .map(|c| c.trim_matches(|ch: char| !ch.is_ascii_alphanumeric()).to_string())
        .filter(|c| !c.is_empty() && c != "N/A");
    Some(task)
}

/// Read the two optional summary blocks that accompany the table.
///
/// Each block has a labeled header line carrying the percentage; the counts
/// follow either on the same line or on the next one. A block that cannot be
/// matched leaves its part of the result as `None`.
pub fn parse_summary(text: &str) -> ProjectProgress {
    let lines: Vec<&str> = text.lines().collect();
    let mut progress = ProjectProgress::unknown();

    if let Some(idx) = lines.iter().position(|l| l.contains("Tasks Progress:")) {
        progress.tasks = TaskProgress {
            percentage: capture_percent(lines[idx]),
            counts: match_inline_or_next(&lines, idx, capture_status_counts),
        };
    }

    if let Some(idx) = lines.iter().position(|l| l.contains("Subtasks Progress:")) {
        progress.subtasks = SubtaskProgress {
            percentage: capture_percent(lines[idx]),
            counts: match_inline_or_next(&lines, idx, capture_completion),
        };
    }

    progress
}

fn match_inline_or_next<T>(lines: &[&str], idx: usize, f: fn(&str) -> Option<T>) -> Option<T> {
    f(lines[idx]).or_else(|| lines.get(idx + 1).and_then(|next| f(next)))
}

fn capture_percent(line: &str) -> Option<u8> {
    PERCENT_RE
        .captures(line)
        .and_then(|c| c[1].parse::<u32>().ok())
        .map(|p| p.min(100) as u8)
}

fn capture_status_counts(line: &str) -> Option<StatusCounts> {
    let caps = STATUS_COUNTS_RE.captures(line)?;
    Some(StatusCounts {
        done: caps[1].parse().ok()?,
        in_progress: caps[2].parse().ok()?,
        pending: caps[3].parse().ok()?,
    })
}

fn capture_completion(line: &str) -> Option<CompletionCounts> {
    let caps = COMPLETED_RE.captures(line)?;
    Some(CompletionCounts {
        completed: caps[1].parse().ok()?,
        total: caps[2].parse().ok()?,
    })
}
