use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

const TITLE: &str = " To-Do List";
const CLEAR_HINT: &str = "C Clear All ";

/// Title on the left, clear-all hint on the right
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.surface;
    let width = area.width as usize;

    let title_style = Style::default()
        .fg(app.theme.primary)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let hint_style = Style::default().fg(app.theme.primary).bg(bg);

    let mut spans = vec![Span::styled(TITLE, title_style)];
    let used = TITLE.len() + CLEAR_HINT.len();
    if app.show_key_hints && used < width {
        spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
        spans.push(Span::styled(CLEAR_HINT, hint_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
