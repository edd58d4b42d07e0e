use serde::Serialize;

/// Counts of top-level tasks by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub done: usize,
    pub in_progress: usize,
    pub pending: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.done + self.in_progress + self.pending
    }
}

/// Completed/total pair for subtasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompletionCounts {
    pub completed: usize,
    pub total: usize,
}

/// Task roll-up. `None` means the source did not report it, which the
/// header renders differently from zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskProgress {
    pub percentage: Option<u8>,
    pub counts: Option<StatusCounts>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubtaskProgress {
    pub percentage: Option<u8>,
    pub counts: Option<CompletionCounts>,
}

/// Project-wide roll-up, rebuilt from scratch every refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectProgress {
    pub tasks: TaskProgress,
    pub subtasks: SubtaskProgress,
}

impl ProjectProgress {
    /// Nothing known at all
    pub fn unknown() -> Self {
        ProjectProgress::default()
    }
}
