use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::model::recommendation::Recommendation;
use crate::tui::app::App;
use crate::tui::format::{detail_lines, detail_title, recommendation_lines};
use crate::tui::view_model::DetailState;

use super::panel;

pub fn render_recommendation(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let block = panel(" Next Task ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(snapshot) = app.view.snapshot() else {
        return;
    };
    let rec = &snapshot.recommendation;
    let lines: Vec<Line> = recommendation_lines(rec, &app.program)
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let style = match (rec, i) {
                (Recommendation::Demo(_), 0) => Style::default().fg(theme.yellow),
                (Recommendation::AllComplete, 0) => {
                    Style::default().fg(theme.green).add_modifier(Modifier::BOLD)
                }
                (Recommendation::Demo(_), 1) | (_, 0) => {
                    Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)
                }
                _ => Style::default().fg(theme.text),
            };
            Line::from(Span::styled(text, style.bg(bg)))
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(bg)),
        inner,
    );
}

pub fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let detail = app.view.detail();
    let block = panel(detail_title(detail), theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text_style = match detail {
        DetailState::Subtasks { .. } => Style::default().fg(theme.text),
        _ => Style::default().fg(theme.dim),
    };
    let lines: Vec<Line> = detail_lines(detail, app.title_width, inner.width as usize, inner.height as usize)
        .into_iter()
        .map(|text| Line::from(Span::styled(text, text_style.bg(bg))))
        .collect();
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}
