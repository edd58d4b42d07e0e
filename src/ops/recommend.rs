use std::collections::HashMap;

use crate::model::task::{Priority, Status, Task};

/// Pick the task to work on next.
///
/// 1. An in-progress task, high priority first.
/// 2. A pending task whose dependencies are all done, highest priority first.
///    A dependency id missing from the list counts as unmet.
/// 3. Any pending task, high priority first.
/// 4. Nothing: every task is done.
///
/// Ties keep input order.
pub fn recommend(tasks: &[Task]) -> Option<&Task> {
    let in_progress: Vec<&Task> = with_status(tasks, Status::InProgress).collect();
    if let Some(task) = first_high_or_first(&in_progress) {
        return Some(task);
    }

    let by_id: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();
    let pending: Vec<&Task> = with_status(tasks, Status::Pending).collect();

    let mut ready: Vec<&Task> = pending
        .iter()
        .copied()
        .filter(|t| dependencies_satisfied(t, &by_id))
        .collect();
    // sort_by_key is stable
    ready.sort_by_key(|t| std::cmp::Reverse(t.priority.weight()));
    if let Some(&task) = ready.first() {
        return Some(task);
    }

    first_high_or_first(&pending)
}

/// Whether every dependency resolves to a done task
pub fn dependencies_satisfied(task: &Task, by_id: &HashMap<&str, &Task>) -> bool {
    task.dependencies
        .iter()
        .all(|dep| by_id.get(dep.as_str()).is_some_and(|d| d.status == Status::Done))
}

fn with_status(tasks: &[Task], status: Status) -> impl Iterator<Item = &Task> {
    tasks.iter().filter(move |t| t.status == status)
}

fn first_high_or_first<'a>(tasks: &[&'a Task]) -> Option<&'a Task> {
    tasks
        .iter()
        .find(|t| t.priority == Priority::High)
        .or_else(|| tasks.first())
        .copied()
}
