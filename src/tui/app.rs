use std::io;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use crate::cli::settings::Settings;
use crate::io::persistence::{PersistenceBridge, PersistenceEvent, PersistenceOp};
use crate::io::storage::FileStorage;
use crate::model::{Task, TaskId, UiConfig};
use crate::ops::task_ops::ValidationError;
use crate::store::{Action, Phase, TaskStore};

use super::input;
use super::render;
use super::text_input::TextInput;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Moving through the list
    Navigate,
    /// Typing a new task in the footer
    Insert,
    /// Editing the selected task's text in place
    Edit,
    /// "Clear all tasks?" prompt is open
    ConfirmClear,
    /// Blocking notice (validation failure) is open
    Alert,
}

/// A blocking notice shown over everything else
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    /// Mode to return to on dismiss
    pub return_mode: Mode,
}

/// Main application state
pub struct App {
    pub store: TaskStore<PersistenceBridge>,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    /// Cursor index into the task list
    pub cursor: usize,
    /// Scroll offset (first visible row)
    pub scroll_offset: usize,
    /// Footer input for new tasks
    pub new_task_input: TextInput,
    /// In-place editor for the task being edited
    pub edit_input: TextInput,
    /// ID of the task being edited
    pub edit_target: Option<TaskId>,
    pub alert: Option<Alert>,
    /// Dim one-line message in the status row
    pub status_message: Option<String>,
    /// Last save failed and its message may still be showing
    save_failing: bool,
}

impl App {
    /// Build the app around a running bridge and start the load
    pub fn new(bridge: PersistenceBridge, ui: &UiConfig) -> Self {
        let mut store = TaskStore::new(bridge);
        store.begin_load();
        App {
            store,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(ui),
            show_key_hints: ui.show_key_hints,
            cursor: 0,
            scroll_offset: 0,
            new_task_input: TextInput::new(),
            edit_input: TextInput::new(),
            edit_target: None,
            alert: None,
            status_message: None,
            save_failing: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.store.phase() != Phase::Ready
    }

    /// Task under the cursor
    pub fn selected_task(&self) -> Option<&Task> {
        self.store.tasks().get(self.cursor)
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.store.tasks().len();
        self.cursor = if len == 0 { 0 } else { self.cursor.min(len - 1) };
    }

    /// Apply queued events from the persistence worker
    pub fn drain_persistence_events(&mut self) {
        let events = self.store.effects().poll();
        for event in events {
            self.apply_persistence_event(event);
        }
    }

    pub fn apply_persistence_event(&mut self, event: PersistenceEvent) {
        match event {
            PersistenceEvent::Loaded(tasks) => {
                self.store.finish_load(tasks);
                self.clamp_cursor();
            }
            PersistenceEvent::Saved { .. } => {
                if self.save_failing {
                    self.save_failing = false;
                    self.status_message = None;
                }
            }
            PersistenceEvent::Failed { op, error } => {
                self.save_failing = op == PersistenceOp::Save;
                // Already logged by the worker; only a quiet hint here
                let what = match op {
                    PersistenceOp::Load => "could not load saved tasks",
                    PersistenceOp::Save => "could not save tasks",
                };
                self.status_message = Some(format!("{what}: {error}"));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Operations issued by key handlers
    // -----------------------------------------------------------------------

    /// Add the footer text as a new task. Empty text raises the alert and
    /// keeps the input as typed.
    pub fn submit_new_task(&mut self) {
        let text = self.new_task_input.as_str().to_string();
        match self.store.dispatch(Action::Add(text)) {
            Ok(()) => {
                self.new_task_input.clear();
                self.cursor = self.store.tasks().len().saturating_sub(1);
            }
            Err(e) => self.show_validation_alert(e),
        }
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id.clone()) {
            self.dispatch(Action::Toggle(id));
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id.clone()) {
            self.dispatch(Action::Delete(id));
            self.clamp_cursor();
        }
    }

    /// Open the in-place editor on the selected task
    pub fn begin_edit(&mut self) {
        let Some((id, text)) = self
            .selected_task()
            .map(|t| (t.id.clone(), t.text.clone()))
        else {
            return;
        };
        self.edit_input = TextInput::with_text(&text);
        self.edit_target = Some(id);
        self.mode = Mode::Edit;
    }

    /// Write the editor text back to the task and leave edit mode
    pub fn commit_edit(&mut self) {
        if let Some(id) = self.edit_target.take() {
            let text = self.edit_input.take();
            self.dispatch(Action::Edit { id, text });
        }
        self.mode = Mode::Navigate;
    }

    pub fn request_clear_all(&mut self) {
        self.mode = Mode::ConfirmClear;
    }

    /// Answer the clear-all prompt
    pub fn answer_clear_all(&mut self, confirmed: bool) {
        self.mode = Mode::Navigate;
        if confirmed {
            self.dispatch(Action::ClearAll);
            self.cursor = 0;
            self.scroll_offset = 0;
        }
    }

    pub fn dismiss_alert(&mut self) {
        let return_mode = self
            .alert
            .take()
            .map_or(Mode::Navigate, |alert| alert.return_mode);
        self.mode = return_mode;
    }

    fn show_validation_alert(&mut self, error: ValidationError) {
        self.alert = Some(Alert {
            title: "Error".into(),
            message: error.to_string(),
            return_mode: self.mode,
        });
        self.mode = Mode::Alert;
    }

    /// Dispatch an action that cannot fail validation
    fn dispatch(&mut self, action: Action) {
        if let Err(e) = self.store.dispatch(action) {
            self.show_validation_alert(e);
        }
    }
}

/// Run the TUI application
pub fn run(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let storage = FileStorage::new(&settings.data_dir);
    let bridge = PersistenceBridge::start(storage, settings.slot.clone())?;
    info!(data_dir = %settings.data_dir.display(), slot = %settings.slot, "opening task list");

    let mut app = App::new(bridge, &settings.ui);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    // Flush queued saves before exit
    for event in app.store.into_effects().shutdown() {
        if let PersistenceEvent::Failed { op, error } = event {
            warn!(?op, error = %error, "persistence failure during shutdown");
        }
    }
    info!("tick exiting");

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.drain_persistence_events();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
