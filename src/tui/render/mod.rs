pub mod footer;
pub mod header;
pub mod popups;
pub mod status_row;
pub mod task_list;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Mode};

/// Draw the whole screen
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.surface);
    frame.render_widget(Block::default().style(bg_style), area);

    // The footer input is hidden while a task is being edited in place
    let footer_h = if app.mode == Mode::Edit { 0 } else { 3 };

    // Layout: header (1 row) | list | footer input | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(footer_h),
            Constraint::Length(1),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);
    task_list::render_task_list(frame, app, chunks[1]);
    if footer_h > 0 {
        footer::render_footer(frame, app, chunks[2]);
    }
    status_row::render_status_row(frame, app, chunks[3]);

    match app.mode {
        Mode::ConfirmClear => popups::render_confirm_clear(frame, app, area),
        Mode::Alert => popups::render_alert(frame, app, area),
        _ => {}
    }
}

/// A centered rectangle of fixed size, clamped to the parent
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
