use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::centered_rect;
use crate::tui::app::App;

const POPUP_W: u16 = 46;

/// "Clear all tasks?" prompt
pub fn render_confirm_clear(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let count = app.store.tasks().len();
    let body = match count {
        1 => "Are you sure you want to clear all tasks? (1 task)".to_string(),
        n => format!("Are you sure you want to clear all tasks? ({n} tasks)"),
    };
    render_popup(
        frame,
        app,
        area,
        "Clear All Tasks",
        &body,
        "[y] Yes  [n] No",
        theme.danger,
    );
}

/// Blocking notice, e.g. a rejected empty task
pub fn render_alert(frame: &mut Frame, app: &App, area: Rect) {
    let Some(alert) = app.alert.as_ref() else {
        return;
    };
    render_popup(
        frame,
        app,
        area,
        &alert.title,
        &alert.message,
        "[Enter] OK",
        app.theme.danger,
    );
}

fn render_popup(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    body: &str,
    keys: &str,
    accent: ratatui::style::Color,
) {
    let bg = app.theme.input_bg;
    let title_style = Style::default()
        .fg(accent)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.primary).bg(bg);
    let key_style = Style::default().fg(app.theme.dim).bg(bg);

    // Borders plus a blank line around the body
    let inner_w = POPUP_W.saturating_sub(4).max(1) as usize;
    let body_rows = body.chars().count().div_ceil(inner_w).max(1) as u16;
    let popup_h = body_rows + 6;

    let popup = centered_rect(POPUP_W, popup_h, area);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from(Span::styled(format!(" {title}"), title_style)),
        Line::from(""),
        Line::from(Span::styled(format!(" {body}"), text_style)),
        Line::from(""),
        Line::from(Span::styled(format!(" {keys}"), key_style)),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, popup);
}

#[cfg(test)]
mod tests {
    use crate::tui::app::Mode;
    use crate::tui::test_helpers::{TERM_H, TERM_W, loaded_app, render_app};

    #[test]
    fn confirm_clear_popup() {
        let mut app = loaded_app(&["a", "b"]);
        app.request_clear_all();
        let out = render_app(&mut app, TERM_W, TERM_H);
        assert!(out.contains("Clear All Tasks"));
        assert!(out.contains("[y] Yes  [n] No"));
    }

    #[test]
    fn alert_popup_shows_message() {
        let mut app = loaded_app(&[]);
        app.mode = Mode::Insert;
        app.submit_new_task();
        assert_eq!(app.mode, Mode::Alert);
        let out = render_app(&mut app, TERM_W, TERM_H);
        assert!(out.contains("Error"));
        assert!(out.contains("Please input text!!!"));
        assert!(out.contains("[Enter] OK"));
    }
}
