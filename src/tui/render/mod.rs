pub mod header;
pub mod panels;
pub mod task_list;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders};

use super::app::App;
use super::theme::Theme;

/// Rows of the recommendation panel, borders included
const RECOMMENDATION_HEIGHT: u16 = 6;
/// Rows of the detail panel, borders included
const DETAIL_HEIGHT: u16 = 9;

/// Main render function: dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // header (2) | task list | recommendation | detail | footer (1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(RECOMMENDATION_HEIGHT),
            Constraint::Length(DETAIL_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);
    task_list::render_task_list(frame, app, chunks[1]);
    panels::render_recommendation(frame, app, chunks[2]);
    panels::render_detail(frame, app, chunks[3]);
    header::render_footer(frame, app, chunks[4]);
}

/// Bordered panel with a highlighted title
pub(super) fn panel<'a>(title: impl Into<String>, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(Span::styled(
            title.into(),
            Style::default().fg(theme.highlight).bg(theme.background),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border).bg(theme.background))
        .style(Style::default().bg(theme.background))
}
