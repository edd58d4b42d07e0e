use crate::model::progress::{
    CompletionCounts, ProjectProgress, StatusCounts, SubtaskProgress, TaskProgress,
};
use crate::model::task::{Status, Task};

/// `round(part / total * 100)`, 0 when `total` is 0
pub fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round().min(100.0) as u8
}

/// Count top-level tasks by status
pub fn count_statuses(tasks: &[Task]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for task in tasks {
        match task.status {
            Status::Done => counts.done += 1,
            Status::InProgress => counts.in_progress += 1,
            Status::Pending => counts.pending += 1,
        }
    }
    counts
}

/// Completed/total over the subtasks of every task, one level deep
pub fn count_subtasks(tasks: &[Task]) -> CompletionCounts {
    tasks
        .iter()
        .flat_map(|t| t.subtasks.iter())
        .fold(CompletionCounts::default(), |mut acc, sub| {
            acc.total += 1;
            if sub.status == Status::Done {
                acc.completed += 1;
            }
            acc
        })
}

/// Build the full roll-up from a canonical task list.
///
/// Every field is known afterwards, including the zero cases.
pub fn aggregate(tasks: &[Task]) -> ProjectProgress {
    let counts = count_statuses(tasks);
    let subs = count_subtasks(tasks);
    ProjectProgress {
        tasks: TaskProgress {
            percentage: Some(percentage(counts.done, counts.total())),
            counts: Some(counts),
        },
        subtasks: SubtaskProgress {
            percentage: Some(percentage(subs.completed, subs.total)),
            counts: Some(subs),
        },
    }
}
