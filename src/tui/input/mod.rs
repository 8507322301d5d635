mod confirm;
mod edit;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

use confirm::{handle_alert, handle_confirm_clear};
use edit::{handle_edit, handle_insert};
use navigate::handle_navigate;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Ctrl-C quits from anywhere; an open edit is committed first
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        if app.mode == Mode::Edit {
            app.commit_edit();
        }
        app.should_quit = true;
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Insert => handle_insert(app, key),
        Mode::Edit => handle_edit(app, key),
        Mode::ConfirmClear => handle_confirm_clear(app, key),
        Mode::Alert => handle_alert(app, key),
    }
}

/// Handle a bracketed paste event. Only text-entry modes take it.
pub fn handle_paste(app: &mut App, text: &str) {
    match app.mode {
        Mode::Insert => app.new_task_input.insert_str(text),
        Mode::Edit => app.edit_input.insert_str(text),
        _ => {}
    }
}
