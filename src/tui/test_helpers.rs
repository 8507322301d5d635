use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::io::persistence::{self, DEFAULT_SLOT, PersistenceBridge, PersistenceEvent};
use crate::io::storage::MemoryStorage;
use crate::model::{Task, TaskList, UiConfig};
use crate::tui::app::App;
use crate::tui::render;

pub const TERM_W: u16 = 60;
pub const TERM_H: u16 = 16;

const WAIT: Duration = Duration::from_secs(5);

/// App over in-memory storage with the startup load already applied
pub fn loaded_app(texts: &[&str]) -> App {
    let storage = MemoryStorage::new();
    let tasks: TaskList = texts.iter().map(|t| Task::new(*t)).collect();
    persistence::save(&storage, DEFAULT_SLOT, &tasks).unwrap();

    let bridge = PersistenceBridge::start(storage, DEFAULT_SLOT).unwrap();
    let mut app = App::new(bridge, &UiConfig::default());
    let (loaded, _) = app.store.effects().wait_for_load(WAIT);
    app.apply_persistence_event(PersistenceEvent::Loaded(loaded));
    app
}

/// App whose startup load has not arrived yet
pub fn loading_app() -> App {
    let bridge = PersistenceBridge::start(MemoryStorage::new(), DEFAULT_SLOT).unwrap();
    App::new(bridge, &UiConfig::default())
}

/// Render the full screen into an in-memory buffer and return plain text
/// (no styles).
pub fn render_app(app: &mut App, w: u16, h: u16) -> String {
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| render::render(frame, app)).unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}
