use std::path::PathBuf;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::io::task_file::{is_task_file_event, watch_dirs};

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug)]
pub enum FileEvent {
    /// One or more structured task files changed on disk.
    Changed(Vec<PathBuf>),
}

/// Watches the directories of the task file candidates.
///
/// Dropping the watcher stops it.
pub struct TaskFileWatcher {
    _watcher: RecommendedWatcher,
}

impl TaskFileWatcher {
    /// Start watching. Events arrive on `tx`; a closed receiver is ignored.
    ///
    /// Returns `Ok(None)` when none of the candidate directories exist yet.
    pub fn start(
        candidates: &[PathBuf],
        tx: mpsc::UnboundedSender<FileEvent>,
    ) -> Result<Option<Self>, notify::Error> {
        let dirs = watch_dirs(candidates);
        if dirs.is_empty() {
            return Ok(None);
        }

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                let relevant: Vec<PathBuf> = event
                    .paths
                    .into_iter()
                    .filter(|p| is_task_file_event(p))
                    .collect();

                if !relevant.is_empty() {
                    let _ = tx.send(FileEvent::Changed(relevant));
                }
            },
            Config::default(),
        )?;

        for dir in &dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
        }
        tracing::debug!(dirs = dirs.len(), "watching task file directories");
        Ok(Some(TaskFileWatcher { _watcher: watcher }))
    }
}
