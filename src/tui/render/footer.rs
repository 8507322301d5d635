use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, Mode};

const PLACEHOLDER: &str = "Add a new task";

/// New-task input box at the bottom
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let active = app.mode == Mode::Insert;
    let border_color = if active { theme.primary } else { theme.dim };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).bg(theme.surface))
        .style(Style::default().bg(theme.input_bg));

    let line = if app.new_task_input.is_empty() {
        Line::from(Span::styled(
            PLACEHOLDER,
            Style::default().fg(theme.dim).bg(theme.input_bg),
        ))
    } else {
        Line::from(Span::styled(
            app.new_task_input.as_str(),
            Style::default().fg(theme.primary).bg(theme.input_bg),
        ))
    };

    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(line).block(block), area);

    if active && inner.width > 0 {
        let col = (app.new_task_input.cursor_col() as u16).min(inner.width - 1);
        frame.set_cursor_position(Position::new(inner.x + col, inner.y));
    }
}

#[cfg(test)]
mod tests {
    use crate::tui::app::Mode;
    use crate::tui::test_helpers::{TERM_H, TERM_W, loaded_app, render_app};

    #[test]
    fn shows_placeholder_then_typed_text() {
        let mut app = loaded_app(&[]);
        let out = render_app(&mut app, TERM_W, TERM_H);
        assert!(out.contains("Add a new task"));

        app.mode = Mode::Insert;
        app.new_task_input.insert_str("Call mom");
        let out = render_app(&mut app, TERM_W, TERM_H);
        assert!(out.contains("Call mom"));
        assert!(!out.contains("Add a new task"));
    }
}
