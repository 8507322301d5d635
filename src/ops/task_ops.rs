use crate::model::task::{Task, TaskId, TaskList};

/// Error type for task operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please input text!!!")]
    EmptyText,
}

// ---------------------------------------------------------------------------
// Task list transitions
//
// Every operation takes the current list and returns a fresh one. Unknown IDs
// are no-ops, not errors: IDs always come from the list being rendered.
// ---------------------------------------------------------------------------

/// Append a new incomplete task. Rejects whitespace-only text.
///
/// The text is stored verbatim; trimming is only used for the emptiness check.
pub fn add(tasks: &TaskList, text: &str) -> Result<TaskList, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok(tasks
        .iter()
        .cloned()
        .chain(std::iter::once(Task::new(text)))
        .collect())
}

/// Replace the text of one task. No emptiness check here, unlike `add`.
pub fn edit(tasks: &TaskList, id: &TaskId, new_text: &str) -> TaskList {
    map_task(tasks, id, |task| task.text = new_text.to_string())
}

/// Flip the completed flag of one task
pub fn toggle_completion(tasks: &TaskList, id: &TaskId) -> TaskList {
    map_task(tasks, id, |task| task.completed = !task.completed)
}

/// Remove one task, keeping the others in order
pub fn delete(tasks: &TaskList, id: &TaskId) -> TaskList {
    tasks.iter().filter(|t| &t.id != id).cloned().collect()
}

/// Drop every task. Confirmation is the caller's job.
pub fn clear_all(_tasks: &TaskList) -> TaskList {
    TaskList::new()
}

fn map_task(tasks: &TaskList, id: &TaskId, f: impl FnOnce(&mut Task)) -> TaskList {
    let mut f = Some(f);
    tasks
        .iter()
        .map(|task| {
            let mut task = task.clone();
            if &task.id == id
                && let Some(f) = f.take()
            {
                f(&mut task);
            }
            task
        })
        .collect()
}
