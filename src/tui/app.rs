use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::io::command::{CommandRunner, ProcessRunner};
use crate::io::sources::{SourceError, lookup_subtasks};
use crate::io::watcher::{FileEvent, TaskFileWatcher};
use crate::model::config::MonitorConfig;
use crate::model::snapshot::Snapshot;
use crate::model::task::Task;
use crate::ops::resolve::SourceResolver;

use super::input::{Action, map_key, map_mouse};
use super::refresh::RefreshGate;
use super::render;
use super::theme::Theme;
use super::view_model::{SubtaskLookup, ViewModel};
use super::viewport::ListViewport;

/// Background work requested by the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Resolve { generation: u64 },
    LookupSubtasks(SubtaskLookup),
}

/// Results of background work, delivered back to the event loop
#[derive(Debug)]
pub enum AppMessage {
    Resolved(Snapshot),
    Subtasks {
        task_id: String,
        stamp: u64,
        result: Result<Vec<Task>, SourceError>,
    },
}

/// Main application state
pub struct App {
    pub view: ViewModel,
    pub viewport: ListViewport,
    pub theme: Theme,
    pub title_width: usize,
    /// External tool name, shown in hints
    pub program: String,
    pub now: DateTime<Local>,
    pub should_quit: bool,
    /// Inner area of the task list from the last draw, for pointer hit-testing
    pub list_area: Option<Rect>,
    gate: RefreshGate,
    jobs: Vec<Job>,
}

impl App {
    pub fn new(config: &MonitorConfig) -> Self {
        App {
            view: ViewModel::new(),
            viewport: ListViewport::default(),
            theme: Theme::from_config(&config.ui),
            title_width: config.ui.title_width,
            program: config.source.program.clone(),
            now: Local::now(),
            should_quit: false,
            list_area: None,
            gate: RefreshGate::new(),
            jobs: Vec::new(),
        }
    }

    /// Start a refresh cycle, or queue one behind the cycle in flight
    pub fn request_refresh(&mut self) {
        if let Some(generation) = self.gate.request() {
            self.jobs.push(Job::Resolve { generation });
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.gate.is_busy()
    }

    /// Drain the work queued since the last call
    pub fn take_jobs(&mut self) -> Vec<Job> {
        std::mem::take(&mut self.jobs)
    }

    pub fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Resolved(snapshot) => {
                let done = self.gate.complete(snapshot.generation);
                if done.apply {
                    tracing::info!(
                        generation = snapshot.generation,
                        source = %snapshot.source.label(),
                        tasks = snapshot.tasks.len(),
                        "snapshot applied"
                    );
                    self.view.apply_snapshot(snapshot);
                    self.viewport.reveal(self.view.cursor());
                }
                if let Some(generation) = done.next {
                    self.jobs.push(Job::Resolve { generation });
                }
            }
            AppMessage::Subtasks {
                task_id,
                stamp,
                result,
            } => {
                let subtasks = result.unwrap_or_else(|e| {
                    tracing::warn!(task_id = %task_id, error = %e, "subtask lookup failed");
                    Vec::new()
                });
                self.view.apply_subtasks(&task_id, stamp, subtasks);
            }
        }
        self.queue_lookup();
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::CyclePriorityFilter => {
                self.view.cycle_priority_filter();
                self.viewport.reveal(self.view.cursor());
                self.request_refresh();
            }
            Action::CycleStatusFilter => {
                self.view.cycle_status_filter();
                self.viewport.reveal(self.view.cursor());
                self.request_refresh();
            }
            Action::Refresh => self.request_refresh(),
            Action::Confirm => self.view.confirm(),
            Action::Move(delta) | Action::Scroll(delta) => self.move_and_reveal(delta),
            Action::Page(pages) => {
                let page = self.viewport.height.max(1) as isize;
                self.move_and_reveal(pages * page);
            }
            Action::First => {
                self.view.select_first();
                self.viewport.reveal(self.view.cursor());
            }
            Action::Last => {
                self.view.select_last();
                self.viewport.reveal(self.view.cursor());
            }
            // the row is on screen already, so the window stays put
            Action::Click(index) | Action::Hover(index) => {
                self.view.select_index(index);
            }
        }
        self.queue_lookup();
    }

    pub fn handle_event(&mut self, event: Event) {
        let action = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key),
            Event::Mouse(mouse) => self.list_area.and_then(|area| {
                let len = self.view.rows().len();
                let viewport = self.viewport;
                map_mouse(mouse, area, |line| viewport.row_at(line, len))
            }),
            _ => None,
        };
        if let Some(action) = action {
            self.handle_action(action);
        }
    }

    fn move_and_reveal(&mut self, delta: isize) {
        self.view.move_by(delta);
        self.viewport.reveal(self.view.cursor());
    }

    fn queue_lookup(&mut self) {
        if let Some(lookup) = self.view.take_lookup() {
            self.jobs.push(Job::LookupSubtasks(lookup));
        }
    }
}

/// Shared handles the spawned jobs need
struct Workers {
    resolver: Arc<SourceResolver>,
    runner: Arc<dyn CommandRunner>,
    lookup_timeout: Duration,
    tx: mpsc::UnboundedSender<AppMessage>,
    /// The detail lookup still running, if any
    lookup: Option<JoinHandle<()>>,
}

impl Workers {
    fn new(
        resolver: Arc<SourceResolver>,
        runner: Arc<dyn CommandRunner>,
        lookup_timeout: Duration,
        tx: mpsc::UnboundedSender<AppMessage>,
    ) -> Self {
        Workers {
            resolver,
            runner,
            lookup_timeout,
            tx,
            lookup: None,
        }
    }

    fn spawn(&mut self, job: Job) {
        let tx = self.tx.clone();
        match job {
            Job::Resolve { generation } => {
                let resolver = self.resolver.clone();
                tokio::spawn(async move {
                    let snapshot = resolver.resolve(generation).await;
                    let _ = tx.send(AppMessage::Resolved(snapshot));
                });
            }
            Job::LookupSubtasks(lookup) => {
                // a newer selection supersedes it; dropping the future kills the child
                if let Some(previous) = self.lookup.take() {
                    previous.abort();
                }
                let runner = self.runner.clone();
                let limit = self.lookup_timeout;
                self.lookup = Some(tokio::spawn(async move {
                    let result = lookup_subtasks(runner.as_ref(), &lookup.task_id, limit).await;
                    let _ = tx.send(AppMessage::Subtasks {
                        task_id: lookup.task_id,
                        stamp: lookup.stamp,
                        result,
                    });
                }));
            }
        }
    }
}

/// Run the TUI application
pub async fn run(config: MonitorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner::new(&config.source.program));
    let resolver = Arc::new(SourceResolver::from_config(&config.source, runner.clone()));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut workers = Workers::new(resolver, runner, config.source.lookup_timeout(), tx);

    let (file_tx, mut file_rx) = mpsc::unbounded_channel();
    let _watcher = match TaskFileWatcher::start(&config.source.task_files, file_tx) {
        Ok(w) => w,
        Err(e) => {
            tracing::warn!(error = %e, "file watching disabled");
            None
        }
    };

    let mut app = App::new(&config);
    app.request_refresh();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if config.ui.mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(
        &mut terminal,
        &mut app,
        &mut workers,
        &mut rx,
        &mut file_rx,
        config.ui.refresh_interval(),
    )
    .await;

    // Restore terminal
    disable_raw_mode()?;
    if config.ui.mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    workers: &mut Workers,
    rx: &mut mpsc::UnboundedReceiver<AppMessage>,
    file_rx: &mut mpsc::UnboundedReceiver<FileEvent>,
    period: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut clock = tokio::time::interval(Duration::from_secs(1));
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut events = EventStream::new();

    loop {
        for job in app.take_jobs() {
            workers.spawn(job);
        }
        terminal.draw(|frame| render::render(frame, app))?;
        if app.should_quit {
            return Ok(());
        }

        tokio::select! {
            _ = ticker.tick() => app.request_refresh(),
            _ = clock.tick() => {
                app.now = Local::now();
            }
            Some(msg) = rx.recv() => app.handle_message(msg),
            Some(FileEvent::Changed(paths)) = file_rx.recv() => {
                tracing::debug!(?paths, "task file changed");
                app.request_refresh();
            }
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => app.handle_event(event),
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
        }
    }
}
