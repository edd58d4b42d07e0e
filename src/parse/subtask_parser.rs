use std::sync::LazyLock;

use regex::Regex;

use crate::model::task::{Priority, Status, Task};

/// Headers that open the subtask section of a detail report
const SECTION_HEADERS: &[&str] = &["Subtasks:", "서브테스크:"];

static SUBTASK_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+\.\d+)\s*([✓○►]?)\s*(.+)").unwrap());

/// Parse the subtask lines (`3.1 ✓ Title`) from a task detail report.
///
/// The section runs from its header to the first blank line or rule.
/// Lines inside that don't look like subtasks are skipped.
pub fn parse_subtasks(text: &str) -> Vec<Task> {
    let mut lines = text.lines();
    if lines
        .by_ref()
        .find(|line| SECTION_HEADERS.iter().any(|h| line.contains(h)))
        .is_none()
    {
        return Vec::new();
    }

    let mut subtasks = Vec::new();
    for line in lines {
        let clean = line.replace('│', " ");
        if let Some(caps) = SUBTASK_LINE_RE.captures(&clean) {
            let status = Status::from_glyph(caps[2].chars().next());
            subtasks.push(Task::new(
                &caps[1],
                caps[3].trim(),
                status,
                Priority::Medium,
            ));
        } else if clean.trim().is_empty() || clean.contains("───") {
            break;
        }
    }
    subtasks
}
