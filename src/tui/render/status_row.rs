use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, Mode};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.surface;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let width = area.width as usize;

    let left = if app.is_loading() {
        " loading\u{2026}".to_string()
    } else if let Some(ref msg) = app.status_message {
        format!(" {msg}")
    } else {
        let total = app.store.tasks().len();
        let done = app.store.tasks().completed_count();
        if total == 0 {
            String::new()
        } else {
            format!(" {done}/{total} done")
        }
    };

    let mut spans = vec![Span::styled(left.clone(), dim)];
    if app.show_key_hints {
        let hint = key_hint(app.mode);
        let left_w = UnicodeWidthStr::width(left.as_str());
        let hint_w = UnicodeWidthStr::width(hint);
        if left_w + hint_w < width {
            spans.push(Span::styled(
                " ".repeat(width - left_w - hint_w),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(hint, dim));
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

fn key_hint(mode: Mode) -> &'static str {
    match mode {
        Mode::Navigate => "a add  e edit  space done  d del  q quit ",
        Mode::Insert => "Enter add  Esc back ",
        Mode::Edit => "Enter/Esc save ",
        Mode::ConfirmClear => "y yes  n no ",
        Mode::Alert => "Enter ok ",
    }
}
