use chrono::{Local, TimeZone};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::config::MonitorConfig;
use crate::model::recommendation::Recommendation;
use crate::model::snapshot::{Snapshot, SourceKind};
use crate::model::task::Task;
use crate::ops::progress::aggregate;
use crate::tui::app::App;

pub const TERM_W: u16 = 100;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An app at a fixed clock time with `tasks` applied from `source`
pub fn app_with(source: SourceKind, tasks: Vec<Task>) -> App {
    let mut app = App::new(&MonitorConfig::default());
    app.now = Local.with_ymd_and_hms(2024, 5, 1, 14, 30, 0).unwrap();
    app.view.apply_snapshot(Snapshot {
        generation: 1,
        source,
        progress: aggregate(&tasks),
        tasks,
        recommendation: Recommendation::AllComplete,
    });
    app
}
