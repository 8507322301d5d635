use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::tui::text_input::TextInput;

/// Footer input for a new task
pub(super) fn handle_insert(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_new_task(),
        KeyCode::Esc => app.mode = Mode::Navigate,
        _ => edit_text(&mut app.new_task_input, key),
    }
}

/// In-place editor. Leaving by either Enter or Esc commits, like losing focus.
pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.commit_edit(),
        _ => edit_text(&mut app.edit_input, key),
    }
}

fn edit_text(input: &mut TextInput, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (m, KeyCode::Char('w')) if m.contains(KeyModifiers::CONTROL) => input.delete_word_back(),
        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => input.clear(),
        (m, KeyCode::Char('a')) if m.contains(KeyModifiers::CONTROL) => input.move_home(),
        (m, KeyCode::Char('e')) if m.contains(KeyModifiers::CONTROL) => input.move_end(),
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => input.insert_char(c),
        (_, KeyCode::Backspace) => input.backspace(),
        (_, KeyCode::Delete) => input.delete(),
        (_, KeyCode::Left) => input.move_left(),
        (_, KeyCode::Right) => input.move_right(),
        (_, KeyCode::Home) => input.move_home(),
        (_, KeyCode::End) => input.move_end(),
        _ => {}
    }
}
