use std::collections::HashMap;

use crate::model::snapshot::{Snapshot, SourceKind};
use crate::model::task::{Priority, Status, Task};

/// What the detail panel shows for the current selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DetailState {
    #[default]
    NoSelection,
    /// The selected id does not resolve in the current snapshot
    NotFound(String),
    /// Waiting on the external detail report
    Loading(String),
    Subtasks {
        task_id: String,
        subtasks: Vec<Task>,
    },
    NoSubtasks(String),
}

/// A detail lookup the event loop should run. Results carry the stamp back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtaskLookup {
    pub task_id: String,
    pub stamp: u64,
}

/// Filter and selection state, plus the last snapshot it was applied to.
///
/// `rows` is rebuilt whenever the snapshot or a filter changes, and the
/// selected id is re-checked against it every time. Index-based selection
/// is only valid against the current `rows`.
#[derive(Debug, Default)]
pub struct ViewModel {
    filter_priority: Option<Priority>,
    filter_status: Option<Status>,
    selected_id: Option<String>,
    snapshot: Option<Snapshot>,
    rows: Vec<Task>,
    detail: DetailState,
    /// Subtasks fetched for the current snapshot, by task id
    subtask_cache: HashMap<String, Vec<Task>>,
    lookup_stamp: u64,
    pending_lookup: Option<SubtaskLookup>,
}

impl ViewModel {
    pub fn new() -> Self {
        ViewModel::default()
    }

    pub fn filter_priority(&self) -> Option<Priority> {
        self.filter_priority
    }

    pub fn filter_status(&self) -> Option<Status> {
        self.filter_status
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// The filtered list, in display order
    pub fn rows(&self) -> &[Task] {
        &self.rows
    }

    pub fn detail(&self) -> &DetailState {
        &self.detail
    }

    /// Row index of the selected task
    pub fn cursor(&self) -> Option<usize> {
        let id = self.selected_id.as_deref()?;
        self.rows.iter().position(|t| t.id == id)
    }

    /// Replace the snapshot wholesale and re-validate the selection
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        // lookups started against the previous snapshot no longer apply
        self.subtask_cache.clear();
        self.lookup_stamp += 1;
        self.snapshot = Some(snapshot);
        self.rebuild_rows();
        self.refresh_detail();
    }

    pub fn cycle_priority_filter(&mut self) {
        self.filter_priority = Priority::cycle_filter(self.filter_priority);
        self.rebuild_rows();
        self.refresh_detail();
    }

    pub fn cycle_status_filter(&mut self) {
        self.filter_status = Status::cycle_filter(self.filter_status);
        self.rebuild_rows();
        self.refresh_detail();
    }

    /// Select the task at `index` in the current rows. Out of range is a no-op.
    pub fn select_index(&mut self, index: usize) -> bool {
        let Some(task) = self.rows.get(index) else {
            return false;
        };
        if self.selected_id.as_deref() == Some(task.id.as_str()) {
            return false;
        }
        self.selected_id = Some(task.id.clone());
        self.refresh_detail();
        true
    }

    /// Move the selection by `delta` rows, clamped to the list
    pub fn move_by(&mut self, delta: isize) -> bool {
        if self.rows.is_empty() {
            return false;
        }
        let last = self.rows.len() - 1;
        let target = match self.cursor() {
            Some(c) => c.saturating_add_signed(delta).min(last),
            None => 0,
        };
        self.select_index(target)
    }

    pub fn select_first(&mut self) -> bool {
        self.select_index(0)
    }

    pub fn select_last(&mut self) -> bool {
        match self.rows.len() {
            0 => false,
            n => self.select_index(n - 1),
        }
    }

    /// Re-select the current row, discarding any cached detail for it
    pub fn confirm(&mut self) {
        if let Some(id) = &self.selected_id {
            self.subtask_cache.remove(id);
        }
        self.refresh_detail();
    }

    /// Detail lookup requested by the last selection change, if any
    pub fn take_lookup(&mut self) -> Option<SubtaskLookup> {
        self.pending_lookup.take()
    }

    /// Store a detail lookup result. Returns false for a superseded lookup.
    pub fn apply_subtasks(&mut self, task_id: &str, stamp: u64, subtasks: Vec<Task>) -> bool {
        if stamp != self.lookup_stamp {
            tracing::debug!(task_id, stamp, current = self.lookup_stamp, "discarding stale lookup");
            return false;
        }
        self.subtask_cache.insert(task_id.to_string(), subtasks);
        if self.selected_id.as_deref() == Some(task_id) {
            self.refresh_detail();
        }
        true
    }

    fn matches_filters(&self, task: &Task) -> bool {
        self.filter_priority.is_none_or(|p| task.priority == p)
            && self.filter_status.is_none_or(|s| task.status == s)
    }

    fn rebuild_rows(&mut self) {
        self.rows = match &self.snapshot {
            Some(snapshot) => snapshot
                .tasks
                .iter()
                .filter(|t| self.matches_filters(t))
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        let still_visible = self
            .selected_id
            .as_deref()
            .is_some_and(|id| self.rows.iter().any(|t| t.id == id));
        if !still_visible {
            self.selected_id = auto_select(&self.rows).map(|t| t.id.clone());
        }
    }

    fn refresh_detail(&mut self) {
        self.pending_lookup = None;
        let (Some(id), Some(snapshot)) = (self.selected_id.clone(), self.snapshot.as_ref()) else {
            self.detail = DetailState::NoSelection;
            return;
        };

        self.detail = match snapshot.find_task(&id) {
            None => DetailState::NotFound(id),
            Some(task) if !task.subtasks.is_empty() => DetailState::Subtasks {
                task_id: id,
                subtasks: task.subtasks.clone(),
            },
            Some(_) if snapshot.source != SourceKind::ListCommand => DetailState::NoSubtasks(id),
            Some(_) => match self.subtask_cache.get(&id) {
                Some(subs) if subs.is_empty() => DetailState::NoSubtasks(id),
                Some(subs) => DetailState::Subtasks {
                    task_id: id,
                    subtasks: subs.clone(),
                },
                None => {
                    self.lookup_stamp += 1;
                    self.pending_lookup = Some(SubtaskLookup {
                        task_id: id.clone(),
                        stamp: self.lookup_stamp,
                    });
                    DetailState::Loading(id)
                }
            },
        };
    }
}

/// First in-progress task, else the first row
fn auto_select(rows: &[Task]) -> Option<&Task> {
    rows.iter()
        .find(|t| t.status == Status::InProgress)
        .or_else(|| rows.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::progress::ProjectProgress;
    use crate::model::recommendation::Recommendation;

    fn task(id: &str, status: Status, priority: Priority) -> Task {
        Task::new(id, format!("Task {id}"), status, priority)
    }

    fn snapshot(generation: u64, source: SourceKind, tasks: Vec<Task>) -> Snapshot {
        Snapshot {
            generation,
            source,
            tasks,
            progress: ProjectProgress::unknown(),
            recommendation: Recommendation::AllComplete,
        }
    }

    fn file_snapshot(generation: u64, tasks: Vec<Task>) -> Snapshot {
        snapshot(generation, SourceKind::TaskFile("tasks.json".into()), tasks)
    }

    #[test]
    fn auto_selects_first_in_progress() {
        let mut vm = ViewModel::new();
        vm.apply_snapshot(file_snapshot(
            1,
            vec![
                task("1", Status::Done, Priority::High),
                task("2", Status::InProgress, Priority::Low),
            ],
        ));
        assert_eq!(vm.selected_id(), Some("2"));
        assert_eq!(vm.cursor(), Some(1));
    }

    #[test]
    fn auto_selects_first_row_without_in_progress() {
        let mut vm = ViewModel::new();
        vm.apply_snapshot(file_snapshot(
            1,
            vec![
                task("4", Status::Pending, Priority::High),
                task("5", Status::Done, Priority::Low),
            ],
        ));
        assert_eq!(vm.selected_id(), Some("4"));
    }

    #[test]
    fn selection_follows_id_not_index() {
        let mut vm = ViewModel::new();
        vm.apply_snapshot(file_snapshot(
            1,
            vec![
                task("3", Status::Pending, Priority::High),
                task("7", Status::Pending, Priority::High),
            ],
        ));
        assert!(vm.select_index(1));
        assert_eq!(vm.selected_id(), Some("7"));

        vm.apply_snapshot(file_snapshot(
            2,
            vec![
                task("9", Status::Pending, Priority::High),
                task("8", Status::Pending, Priority::High),
                task("7", Status::Pending, Priority::High),
            ],
        ));
        assert_eq!(vm.selected_id(), Some("7"));
        assert_eq!(vm.cursor(), Some(2));
        assert_eq!(vm.detail(), &DetailState::NoSubtasks("7".into()));
    }

    #[test]
    fn filtered_out_selection_is_re_anchored() {
        let mut vm = ViewModel::new();
        vm.apply_snapshot(file_snapshot(
            1,
            vec![
                task("1", Status::Pending, Priority::High),
                task("7", Status::Done, Priority::High)
                    .with_subtasks(vec![task("7.1", Status::Done, Priority::Medium)]),
            ],
        ));
        vm.select_index(1);
        assert!(matches!(vm.detail(), DetailState::Subtasks { task_id, .. } if task_id == "7"));

        // all → in-progress → pending
        vm.cycle_status_filter();
        vm.cycle_status_filter();
        assert_eq!(vm.filter_status(), Some(Status::Pending));
        assert_eq!(vm.selected_id(), Some("1"));
        assert_ne!(
            vm.detail(),
            &DetailState::Subtasks {
                task_id: "7".into(),
                subtasks: vec![task("7.1", Status::Done, Priority::Medium)],
            }
        );
    }

    #[test]
    fn empty_rows_clear_selection() {
        let mut vm = ViewModel::new();
        vm.apply_snapshot(file_snapshot(1, vec![task("1", Status::Done, Priority::Low)]));
        vm.cycle_priority_filter();
        assert_eq!(vm.filter_priority(), Some(Priority::High));
        assert!(vm.rows().is_empty());
        assert_eq!(vm.selected_id(), None);
        assert_eq!(vm.detail(), &DetailState::NoSelection);
    }

    #[test]
    fn movement_is_clamped() {
        let mut vm = ViewModel::new();
        vm.apply_snapshot(file_snapshot(
            1,
            (1..=5)
                .map(|i| task(&i.to_string(), Status::Pending, Priority::Medium))
                .collect(),
        ));
        assert_eq!(vm.cursor(), Some(0));
        assert!(!vm.move_by(-1));
        vm.move_by(3);
        assert_eq!(vm.selected_id(), Some("4"));
        vm.move_by(10);
        assert_eq!(vm.selected_id(), Some("5"));
        vm.select_first();
        assert_eq!(vm.selected_id(), Some("1"));
        vm.select_last();
        assert_eq!(vm.selected_id(), Some("5"));
        assert!(!vm.select_index(99));
    }

    #[test]
    fn list_source_requests_lookup_and_drops_stale_results() {
        let mut vm = ViewModel::new();
        vm.apply_snapshot(snapshot(
            1,
            SourceKind::ListCommand,
            vec![
                task("1", Status::InProgress, Priority::High),
                task("2", Status::Pending, Priority::High),
            ],
        ));
        let first = vm.take_lookup().unwrap();
        assert_eq!(first.task_id, "1");
        assert_eq!(vm.detail(), &DetailState::Loading("1".into()));

        vm.select_index(1);
        let second = vm.take_lookup().unwrap();
        assert_eq!(second.task_id, "2");

        assert!(!vm.apply_subtasks("1", first.stamp, vec![]));
        assert!(vm.apply_subtasks(
            "2",
            second.stamp,
            vec![task("2.1", Status::Done, Priority::Medium)]
        ));
        assert!(matches!(vm.detail(), DetailState::Subtasks { subtasks, .. } if subtasks.len() == 1));

        // cached: no new lookup when coming back
        vm.select_index(0);
        vm.take_lookup();
        vm.select_index(1);
        assert!(vm.take_lookup().is_none());
    }

    #[test]
    fn failed_lookup_shows_no_subtasks() {
        let mut vm = ViewModel::new();
        vm.apply_snapshot(snapshot(
            1,
            SourceKind::ListCommand,
            vec![task("1", Status::InProgress, Priority::High)],
        ));
        let lookup = vm.take_lookup().unwrap();
        vm.apply_subtasks(&lookup.task_id, lookup.stamp, Vec::new());
        assert_eq!(vm.detail(), &DetailState::NoSubtasks("1".into()));
    }

    #[test]
    fn confirm_forces_a_fresh_lookup() {
        let mut vm = ViewModel::new();
        vm.apply_snapshot(snapshot(
            1,
            SourceKind::ListCommand,
            vec![task("1", Status::InProgress, Priority::High)],
        ));
        let lookup = vm.take_lookup().unwrap();
        vm.apply_subtasks(&lookup.task_id, lookup.stamp, Vec::new());
        vm.confirm();
        assert!(vm.take_lookup().is_some());
    }

    #[test]
    fn lookup_from_previous_snapshot_is_rejected() {
        let mut vm = ViewModel::new();
        vm.apply_snapshot(snapshot(
            1,
            SourceKind::ListCommand,
            vec![task("1", Status::InProgress, Priority::High)],
        ));
        let lookup = vm.take_lookup().unwrap();

        vm.apply_snapshot(file_snapshot(2, vec![task("1", Status::InProgress, Priority::High)]));
        assert!(!vm.apply_subtasks(
            &lookup.task_id,
            lookup.stamp,
            vec![task("1.1", Status::Done, Priority::Medium)]
        ));
        assert_eq!(vm.detail(), &DetailState::NoSubtasks("1".into()));
        assert!(vm.take_lookup().is_none());
    }

    #[test]
    fn list_refresh_reissues_lookup_for_selection() {
        let mut vm = ViewModel::new();
        let tasks = vec![task("1", Status::InProgress, Priority::High)];
        vm.apply_snapshot(snapshot(1, SourceKind::ListCommand, tasks.clone()));
        let first = vm.take_lookup().unwrap();

        vm.apply_snapshot(snapshot(2, SourceKind::ListCommand, tasks));
        let second = vm.take_lookup().unwrap();
        assert!(!vm.apply_subtasks("1", first.stamp, vec![]));
        assert!(vm.apply_subtasks("1", second.stamp, vec![]));
        assert_eq!(vm.detail(), &DetailState::NoSubtasks("1".into()));
    }
}
