use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Canonical task status. External vocabularies (glyphs, localized words)
/// are mapped onto these three at the parsing boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Done,
    InProgress,
    Pending,
}

impl Status {
    /// Completion percentage implied by the status. This is the only place
    /// task progress comes from.
    pub fn progress(self) -> u8 {
        match self {
            Status::Done => 100,
            Status::InProgress => 50,
            Status::Pending => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Done => "done",
            Status::InProgress => "in-progress",
            Status::Pending => "pending",
        }
    }

    /// Glyph used by task-master and by our own rows
    pub fn glyph(self) -> char {
        match self {
            Status::Done => '✓',
            Status::InProgress => '►',
            Status::Pending => '○',
        }
    }

    /// Strict parse of a canonical label. Case-insensitive.
    pub fn parse(s: &str) -> Option<Status> {
        match s.trim().to_ascii_lowercase().as_str() {
            "done" => Some(Status::Done),
            "in-progress" | "in_progress" | "inprogress" => Some(Status::InProgress),
            "pending" => Some(Status::Pending),
            _ => None,
        }
    }

    /// Lenient parse: anything unrecognized is pending.
    pub fn from_label(s: &str) -> Status {
        Status::parse(s).unwrap_or(Status::Pending)
    }

    /// Normalize a status cell from the listing table. Substring match,
    /// first rule wins in the order done, pending, in-progress.
    pub fn from_table_cell(cell: &str) -> Status {
        if cell.contains('✓') || cell.contains("done") {
            Status::Done
        } else if cell.contains('○') || cell.contains("pending") {
            Status::Pending
        } else if cell.contains('►') || cell.contains("progress") {
            Status::InProgress
        } else {
            Status::Pending
        }
    }

    /// Map a single status glyph. Unknown or missing glyphs are pending.
    pub fn from_glyph(glyph: Option<char>) -> Status {
        match glyph {
            Some('✓') => Status::Done,
            Some('►') => Status::InProgress,
            _ => Status::Pending,
        }
    }

    /// Next value of the status filter: all → in-progress → pending → done → all
    pub fn cycle_filter(current: Option<Status>) -> Option<Status> {
        match current {
            None => Some(Status::InProgress),
            Some(Status::InProgress) => Some(Status::Pending),
            Some(Status::Pending) => Some(Status::Done),
            Some(Status::Done) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort weight: high=3, medium=2, low=1
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    /// Lenient parse: missing or unknown priorities are medium.
    pub fn from_label(s: &str) -> Priority {
        Priority::parse(s).unwrap_or(Priority::Medium)
    }

    /// Next value of the priority filter: all → high → medium → low → all
    pub fn cycle_filter(current: Option<Priority>) -> Option<Priority> {
        match current {
            None => Some(Priority::High),
            Some(Priority::High) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::Low),
            Some(Priority::Low) => None,
        }
    }
}

/// A task in the canonical list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique within one snapshot. Subtasks use `parent.n`.
    pub id: String,
    /// Full title; truncation happens only when rendering
    pub title: String,
    pub status: Status,
    pub priority: Priority,
    /// Ids this task waits on, in source order
    #[serde(default)]
    pub dependencies: IndexSet<String>,
    #[serde(default)]
    pub subtasks: Vec<Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: Status, priority: Priority) -> Self {
        Task {
            id: id.into(),
            title: title.into(),
            status,
            priority,
            dependencies: IndexSet::new(),
            subtasks: Vec::new(),
            description: None,
            complexity: None,
        }
    }

    /// Builder-style helper for dependency lists
    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subtasks(mut self, subtasks: Vec<Task>) -> Self {
        self.subtasks = subtasks;
        self
    }

    /// Derived from status, never stored
    pub fn progress(&self) -> u8 {
        self.status.progress()
    }
}

/// Split a dependency cell or report value (`"1, 2"`, `"None"`, `"-"`) into ids.
/// Status glyphs decorating ids (`3 ✓`) are dropped.
pub fn parse_dependency_list(s: &str) -> IndexSet<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") || trimmed == "-" {
        return IndexSet::new();
    }
    trimmed
        .split(',')
        .map(|part| {
            part.trim()
                .trim_matches(|c: char| matches!(c, '✓' | '►' | '○' | '#'))
                .trim()
                .to_string()
        })
        .filter(|id| !id.is_empty())
        .collect()
}
