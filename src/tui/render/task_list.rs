use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::model::Task;
use crate::tui::app::{App, Mode};

const CHECKBOX_W: usize = 5; // " [x] "

/// Render the task list, one row per task
pub fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let height = area.height as usize;
    if height == 0 {
        return;
    }
    adjust_scroll(app, height);

    let bg = app.theme.surface;
    let mut lines: Vec<Line> = Vec::new();

    if app.store.tasks().is_empty() {
        let msg = if app.is_loading() {
            " loading\u{2026}"
        } else {
            " Nothing to do. Press a to add a task."
        };
        lines.push(Line::from(Span::styled(
            msg,
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    let width = area.width as usize;
    for (idx, task) in app
        .store
        .tasks()
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
    {
        let selected = idx == app.cursor;
        let editing = selected && app.mode == Mode::Edit;
        lines.push(task_line(app, task, selected, editing, width));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);

    // Terminal cursor inside the in-place editor
    if app.mode == Mode::Edit && app.cursor >= app.scroll_offset {
        let row = (app.cursor - app.scroll_offset) as u16;
        let col = (CHECKBOX_W + app.edit_input.cursor_col()).min(width.saturating_sub(1)) as u16;
        if row < area.height {
            frame.set_cursor_position(Position::new(area.x + col, area.y + row));
        }
    }
}

fn task_line<'a>(app: &'a App, task: &'a Task, selected: bool, editing: bool, width: usize) -> Line<'a> {
    let theme = &app.theme;
    let row_bg = if selected { theme.selection_bg } else { theme.surface };

    let check = if task.completed { "x" } else { " " };
    let checkbox_style = Style::default()
        .fg(theme.checkbox_color(task.completed))
        .bg(row_bg)
        .add_modifier(Modifier::BOLD);

    let (text, text_style) = if editing {
        (
            app.edit_input.as_str(),
            Style::default().fg(theme.primary).bg(theme.input_bg),
        )
    } else {
        let mut style = Style::default().fg(theme.primary).bg(row_bg);
        if task.completed {
            style = style.add_modifier(Modifier::CROSSED_OUT);
        }
        (task.text.as_str(), style)
    };

    let mut spans = vec![
        Span::styled(" [", checkbox_style),
        Span::styled(check, checkbox_style),
        Span::styled("] ", checkbox_style),
        Span::styled(text, text_style),
    ];

    // Pad selected rows so the highlight spans the full width
    let used = CHECKBOX_W + UnicodeWidthStr::width(text);
    if selected && used < width {
        spans.push(Span::styled(
            " ".repeat(width - used),
            Style::default().bg(row_bg),
        ));
    }
    Line::from(spans)
}

/// Keep the cursor row inside the visible window
fn adjust_scroll(app: &mut App, height: usize) {
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + height {
        app.scroll_offset = app.cursor + 1 - height;
    }
    let max_offset = app.store.tasks().len().saturating_sub(height);
    app.scroll_offset = app.scroll_offset.min(max_offset);
}
