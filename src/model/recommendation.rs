use serde::Serialize;

use super::task::{Priority, Status, Task};

/// A recommended task as parsed from a report or projected from a `Task`.
/// Fields a report did not mention stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecommendedTask {
    pub id: Option<String>,
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    /// Raw dependency text, e.g. `"18, 19"`
    pub dependencies: Option<String>,
    pub description: Option<String>,
    pub complexity: Option<String>,
}

impl RecommendedTask {
    pub fn from_task(task: &Task) -> Self {
        let dependencies = if task.dependencies.is_empty() {
            None
        } else {
            Some(
                task.dependencies
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        };
        RecommendedTask {
            id: Some(task.id.clone()),
            title: Some(task.title.clone()),
            priority: Some(task.priority),
            status: Some(task.status),
            dependencies,
            description: task.description.clone(),
            complexity: task.complexity.clone(),
        }
    }

    /// A parsed section is only usable if it named a task
    pub fn has_id(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Where a recommendation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationOrigin {
    /// Parsed from the external tool's own report
    Reported,
    /// Selected locally over the canonical list
    Computed,
}

/// What the recommendation panel shows for one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    Task {
        task: RecommendedTask,
        origin: RecommendationOrigin,
    },
    /// No in-progress or pending task remains
    AllComplete,
    /// Every real source failed; the task shown is demonstration data
    Demo(RecommendedTask),
}

impl Recommendation {
    pub fn task(&self) -> Option<&RecommendedTask> {
        match self {
            Recommendation::Task { task, .. } | Recommendation::Demo(task) => Some(task),
            Recommendation::AllComplete => None,
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, Recommendation::Demo(_))
    }
}
