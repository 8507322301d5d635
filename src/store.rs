//! The task store: one owned task list plus its load/save lifecycle.
//!
//! All mutations go through [`TaskStore::dispatch`], which applies a pure
//! operation from [`crate::ops::task_ops`] and then fires the save effect with
//! the new list. The presentation layer re-renders whenever
//! [`TaskStore::revision`] changes.

use tracing::{debug, warn};

use crate::model::task::{TaskId, TaskList};
use crate::ops::task_ops::{self, ValidationError};

/// Side effects the store triggers. Both must return without blocking on I/O.
pub trait StoreEffects {
    /// Start reading the persisted list. The result comes back through
    /// [`TaskStore::finish_load`].
    fn load(&mut self);
    /// Persist this snapshot
    fn save(&mut self, tasks: &TaskList);
}

/// Store lifecycle: `Uninitialized -> Loading -> Ready`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
}

/// A user-level mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add(String),
    Edit { id: TaskId, text: String },
    Toggle(TaskId),
    Delete(TaskId),
    ClearAll,
}

pub struct TaskStore<E: StoreEffects> {
    tasks: TaskList,
    phase: Phase,
    revision: u64,
    /// Mutations applied while still `Loading`
    early_mutations: usize,
    effects: E,
}

impl<E: StoreEffects> TaskStore<E> {
    pub fn new(effects: E) -> Self {
        TaskStore {
            tasks: TaskList::new(),
            phase: Phase::Uninitialized,
            revision: 0,
            early_mutations: 0,
            effects,
        }
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Bumped on every state transition
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.effects
    }

    pub fn into_effects(self) -> E {
        self.effects
    }

    /// Kick off the startup load and save the initial empty list.
    ///
    /// Only the first call does anything.
    pub fn begin_load(&mut self) {
        if self.phase != Phase::Uninitialized {
            return;
        }
        self.phase = Phase::Loading;
        self.effects.load();
        // The initial state counts as a change, so it is saved too
        self.effects.save(&self.tasks);
    }

    /// Apply the startup load result. Moves to `Ready` exactly once; later
    /// calls are ignored.
    ///
    /// A loaded list replaces whatever is in memory, including mutations made
    /// while the load was in flight.
    pub fn finish_load(&mut self, loaded: Option<TaskList>) {
        if self.phase == Phase::Ready {
            debug!("ignoring duplicate load result");
            return;
        }
        self.phase = Phase::Ready;
        self.revision += 1;
        let Some(tasks) = loaded else {
            return;
        };
        if self.early_mutations > 0 {
            warn!(
                discarded = self.early_mutations,
                "late load replaced changes made before it finished"
            );
        }
        self.replace(tasks);
    }

    /// Apply one mutation and schedule a save.
    ///
    /// Only `Action::Add` can fail; on failure nothing changes and nothing is
    /// saved.
    pub fn dispatch(&mut self, action: Action) -> Result<(), ValidationError> {
        let next = match &action {
            Action::Add(text) => task_ops::add(&self.tasks, text)?,
            Action::Edit { id, text } => task_ops::edit(&self.tasks, id, text),
            Action::Toggle(id) => task_ops::toggle_completion(&self.tasks, id),
            Action::Delete(id) => task_ops::delete(&self.tasks, id),
            Action::ClearAll => task_ops::clear_all(&self.tasks),
        };
        debug!(action = action_name(&action), count = next.len(), "task list updated");
        if self.phase == Phase::Loading {
            self.early_mutations += 1;
        }
        self.replace(next);
        Ok(())
    }

    fn replace(&mut self, tasks: TaskList) {
        self.tasks = tasks;
        self.revision += 1;
        self.effects.save(&self.tasks);
    }
}

fn action_name(action: &Action) -> &'static str {
    match action {
        Action::Add(_) => "add",
        Action::Edit { .. } => "edit",
        Action::Toggle(_) => "toggle",
        Action::Delete(_) => "delete",
        Action::ClearAll => "clear_all",
    }
}
