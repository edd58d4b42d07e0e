use std::sync::LazyLock;

use regex::Regex;

use crate::model::recommendation::RecommendedTask;
use crate::model::task::{Priority, Status};

/// Spellings of the section title seen across task-master releases
const START_MARKERS: &[&str] = &[
    "⚡ RECOMMENDED NEXT TASK ⚡",
    "RECOMMENDED NEXT TASK",
    "Recommended Next Task",
];

/// Box-drawing glyphs stripped from every section line before matching
const BOX_GLYPHS: &[char] = &[
    '│', '╭', '╮', '╯', '╰', '─', '┌', '┐', '└', '┘', '├', '┤', '┬', '┴', '┼',
];

const LEAD_IN: &str = "Next Task to Work On:";
const LEAD_IN_GLYPH: &str = "🔥";

/// Lines that close the description even though they carry no colon
const FOOTER_PHRASES: &[&str] = &["Subtasks:", "Start working:", "View details:"];

/// Continuation lines shorter than this are decoration, not prose
const MIN_CONTINUATION_CHARS: usize = 10;

static NEXT_TASK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Next Task to Work On:\s*#?(\d+(?:\.\d+)?)\s*-\s*(.+)").unwrap()
});
static PRIORITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Priority:\s*(\w+)").unwrap());
static STATUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Status:\s*[►○✓]?\s*(\w+(?:-\w+)?)").unwrap());
static DEPENDENCIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Dependencies:\s*(.+)").unwrap());
static DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Description:\s*(.+)").unwrap());
static COMPLEXITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Complexity:\s*[●○◐]?\s*(\S+)").unwrap());

/// Extract the recommended task from a free-text report.
///
/// Returns `None` when no section start marker is present. Inside the section
/// fields that never appear stay `None`; the caller decides what to fall back to.
pub fn parse_recommendation_section(text: &str) -> Option<RecommendedTask> {
    let mut lines = text.lines();
    lines.by_ref().find(|line| is_section_start(line))?;

    let mut rec = RecommendedTask::default();
    for line in lines {
        if is_section_end(line) {
            break;
        }
        let clean = strip_box_glyphs(line);
        if clean.is_empty() {
            continue;
        }
        apply_line(&mut rec, &clean);
    }
    Some(rec)
}

fn apply_line(rec: &mut RecommendedTask, clean: &str) {
    if clean.contains(LEAD_IN) {
        if let Some(caps) = NEXT_TASK_RE.captures(clean) {
            rec.id = Some(caps[1].to_string());
            rec.title = Some(caps[2].trim().to_string());
        }
    } else if clean.contains("Priority:") && clean.contains("Status:") {
        if let Some(caps) = PRIORITY_RE.captures(clean) {
            rec.priority = Some(Priority::from_label(&caps[1]));
        }
        if let Some(caps) = STATUS_RE.captures(clean) {
            rec.status = Some(Status::from_label(&caps[1]));
        }
        capture_complexity(rec, clean);
    } else if clean.contains("Dependencies:") && !clean.contains("Priority:") {
        if let Some(caps) = DEPENDENCIES_RE.captures(clean) {
            let value = caps[1]
                .split("Complexity:")
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            rec.dependencies = Some(value);
        }
        capture_complexity(rec, clean);
    } else if clean.contains("Description:") {
        if let Some(caps) = DESCRIPTION_RE.captures(clean) {
            rec.description = Some(caps[1].trim().to_string());
        }
    } else if clean.contains("Complexity:") {
        capture_complexity(rec, clean);
    } else if let Some(desc) = rec.description.as_mut()
        && is_description_continuation(clean)
    {
        desc.push(' ');
        desc.push_str(clean);
    }
}

fn capture_complexity(rec: &mut RecommendedTask, clean: &str) {
    if let Some(caps) = COMPLEXITY_RE.captures(clean) {
        rec.complexity = Some(caps[1].to_string());
    }
}

fn is_description_continuation(clean: &str) -> bool {
    !clean.contains(':')
        && !FOOTER_PHRASES.iter().any(|p| clean.contains(p))
        && !clean.contains(LEAD_IN_GLYPH)
        && clean.chars().count() > MIN_CONTINUATION_CHARS
}

fn is_section_start(line: &str) -> bool {
    START_MARKERS.iter().any(|m| line.contains(m))
}

/// The closing border: a bottom corner and mostly box glyphs
fn is_section_end(line: &str) -> bool {
    if !line.contains(['╰', '└']) {
        return false;
    }
    let visible: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    let glyphs = visible.iter().filter(|c| BOX_GLYPHS.contains(c)).count();
    glyphs * 2 > visible.len()
}

fn strip_box_glyphs(line: &str) -> String {
    line.chars()
        .filter(|c| !BOX_GLYPHS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}
