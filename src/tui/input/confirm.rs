use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

/// "Clear all tasks?" prompt: y/Enter confirms, n/Esc cancels
pub(super) fn handle_confirm_clear(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.answer_clear_all(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_clear_all(false),
        _ => {}
    }
}

/// Blocking notice: only dismiss keys do anything
pub(super) fn handle_alert(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
        app.dismiss_alert();
    }
}
