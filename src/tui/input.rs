use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

/// Named user intents, independent of the key or pointer that produced them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    CyclePriorityFilter,
    CycleStatusFilter,
    Refresh,
    Confirm,
    Move(isize),
    /// Move by this many pages
    Page(isize),
    First,
    Last,
    /// Pointer pressed on a row
    Click(usize),
    /// Pointer moved over a row
    Hover(usize),
    /// Wheel scrolled by rows
    Scroll(isize),
}

/// Map a key press to an action
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }
    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('f') => Action::CyclePriorityFilter,
        KeyCode::Char('s') => Action::CycleStatusFilter,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Confirm,
        KeyCode::Up | KeyCode::Char('k') => Action::Move(-1),
        KeyCode::Down | KeyCode::Char('j') => Action::Move(1),
        KeyCode::PageUp => Action::Page(-1),
        KeyCode::PageDown => Action::Page(1),
        KeyCode::Home | KeyCode::Char('g') => Action::First,
        KeyCode::End | KeyCode::Char('G') => Action::Last,
        _ => return None,
    };
    Some(action)
}

/// Map a pointer event over the list's inner area to an action.
///
/// `row_at` resolves a line within the area to a row index.
pub fn map_mouse(
    mouse: MouseEvent,
    list_area: Rect,
    row_at: impl Fn(usize) -> Option<usize>,
) -> Option<Action> {
    let inside = mouse.column >= list_area.x
        && mouse.column < list_area.x + list_area.width
        && mouse.row >= list_area.y
        && mouse.row < list_area.y + list_area.height;
    if !inside {
        return None;
    }
    let line = (mouse.row - list_area.y) as usize;
    match mouse.kind {
        MouseEventKind::Down(_) => row_at(line).map(Action::Click),
        MouseEventKind::Moved => row_at(line).map(Action::Hover),
        MouseEventKind::ScrollDown => Some(Action::Scroll(1)),
        MouseEventKind::ScrollUp => Some(Action::Scroll(-1)),
        _ => None,
    }
}
