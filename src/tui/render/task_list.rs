use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::format::{RowLayout, row_cells};

use super::panel;

/// Render the filtered task list and record its geometry for pointer input
pub fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = panel(" Tasks ", &app.theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.list_area = Some(inner);

    let rows = app.view.rows();
    app.viewport.resize(inner.height as usize, rows.len());
    app.viewport.reveal(app.view.cursor());

    let theme = &app.theme;
    let bg = theme.background;
    if rows.is_empty() {
        let msg = if app.view.snapshot().is_some() {
            "No tasks match the current filters"
        } else {
            "Loading tasks…"
        };
        let line = Line::from(Span::styled(msg, Style::default().fg(theme.dim).bg(bg)));
        frame.render_widget(Paragraph::new(line), inner);
        return;
    }

    let layout = RowLayout::for_tasks(rows, app.title_width).fit(inner.width as usize);
    let cursor = app.view.cursor();
    let lines: Vec<Line> = app
        .viewport
        .window(rows.len())
        .map(|index| {
            let task = &rows[index];
            let cells = row_cells(task, layout);
            let row_bg = if cursor == Some(index) {
                theme.selection_bg
            } else {
                bg
            };
            let base = Style::default().bg(row_bg);
            let mut title_style = base.fg(theme.text);
            if cursor == Some(index) {
                title_style = base.fg(theme.text_bright).add_modifier(Modifier::BOLD);
            }
            Line::from(vec![
                Span::styled(format!("{} ", cells.id), base.fg(theme.dim)),
                Span::styled(format!("{} ", cells.title), title_style),
                Span::styled(
                    format!("{} ", cells.status),
                    base.fg(theme.status_color(task.status)),
                ),
                Span::styled(
                    format!("{} ", cells.priority),
                    base.fg(theme.priority_color(task.priority)),
                ),
                Span::styled(cells.progress, base.fg(theme.text)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}
