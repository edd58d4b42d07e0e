use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::format::{filter_label, header_counts, header_title};

/// Two header lines: clock, filters and progress, then counts
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let view = &app.view;
    let snapshot = view.snapshot();
    let filters = filter_label(view.filter_priority(), view.filter_status());
    let source = snapshot.map(|s| s.source.label());
    let progress = snapshot.map(|s| &s.progress);

    let title = header_title(app.now, &filters, source.as_deref(), progress);
    let counts = match snapshot {
        Some(s) => header_counts(Some(&s.progress), s.tasks.len(), view.rows().len()),
        None => "Loading tasks…".to_string(),
    };

    let lines = vec![
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(counts, Style::default().fg(app.theme.text).bg(bg))),
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// Key hints, plus a marker while a refresh runs
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let hint = "↑↓ Select / Enter Details / f Priority / s Status / r Refresh / q Quit";

    let mut spans = vec![Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg))];
    if app.is_refreshing() {
        let marker = "refreshing…";
        let used = hint.chars().count() + marker.chars().count();
        if used < width {
            spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
            spans.push(Span::styled(
                marker,
                Style::default().fg(app.theme.yellow).bg(bg),
            ));
        }
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}
