use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::io::storage::{Storage, StorageError};
use crate::model::task::TaskList;
use crate::store::StoreEffects;

/// Default name of the durable slot holding the task list
pub const DEFAULT_SLOT: &str = "tasks";

/// Error type for saving and loading the task list
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("could not serialize tasks: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("could not parse stored tasks: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("persistence worker is not running")]
    WorkerGone,
}

/// Which side of the bridge an event is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceOp {
    Load,
    Save,
}

/// Events reported by the persistence worker.
///
/// Failures are never fatal; they are reported here and logged.
#[derive(Debug)]
pub enum PersistenceEvent {
    /// The startup load finished. `None` means nothing usable was stored.
    Loaded(Option<TaskList>),
    /// A save completed
    Saved { count: usize },
    /// A load or save failed
    Failed {
        op: PersistenceOp,
        error: PersistenceError,
    },
}

/// Serialize the full list and overwrite the slot
pub fn save(storage: &dyn Storage, slot: &str, tasks: &TaskList) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(tasks).map_err(PersistenceError::Serialize)?;
    storage.set_item(slot, &json)?;
    Ok(())
}

/// Read the slot. `Ok(None)` if it was never written.
///
/// An undecodable or unparseable slot is copied to `<slot>.bak` before the
/// error is returned, since the next save will overwrite it.
pub fn try_load(storage: &dyn Storage, slot: &str) -> Result<Option<TaskList>, PersistenceError> {
    let raw = match storage.get_item(slot) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Ok(None),
        Err(e @ StorageError::Corrupt { .. }) => {
            back_up(storage, slot);
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str::<TaskList>(&raw)
        .map(Some)
        .map_err(|e| {
            back_up(storage, slot);
            PersistenceError::Parse(e)
        })
}

fn back_up(storage: &dyn Storage, slot: &str) {
    let bak = format!("{slot}.bak");
    match storage.copy_item(slot, &bak) {
        Ok(()) => warn!(slot, backup = %bak, "stored tasks unreadable, backed up"),
        Err(e) => warn!(slot, error = %e, "stored tasks unreadable, backup failed"),
    }
}

/// Best-effort load: any failure is logged and treated as absent
pub fn load(storage: &dyn Storage, slot: &str) -> Option<TaskList> {
    match try_load(storage, slot) {
        Ok(tasks) => tasks,
        Err(e) => {
            error!(slot, error = %e, "could not load tasks");
            None
        }
    }
}

enum Request {
    Load,
    Save(TaskList),
}

/// Background worker that owns the storage.
///
/// Requests are queued on a channel and handled in order on one thread, so
/// callers never block on I/O and saves land in submission order.
pub struct PersistenceBridge {
    tx: Option<mpsc::Sender<Request>>,
    events: mpsc::Receiver<PersistenceEvent>,
    worker: Option<JoinHandle<()>>,
}

impl PersistenceBridge {
    /// Spawn the worker thread for `storage`, using `slot` as the key
    pub fn start<S: Storage>(storage: S, slot: impl Into<String>) -> Result<Self, std::io::Error> {
        let slot = slot.into();
        let (tx, rx) = mpsc::channel::<Request>();
        let (event_tx, events) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("tickoff-persist".into())
            .spawn(move || run_worker(storage, slot, rx, event_tx))?;

        Ok(PersistenceBridge {
            tx: Some(tx),
            events,
            worker: Some(worker),
        })
    }

    /// Queue the startup load. The result arrives as `PersistenceEvent::Loaded`.
    pub fn request_load(&self) {
        self.send(Request::Load);
    }

    /// Queue a save of this snapshot
    pub fn request_save(&self, tasks: TaskList) {
        self.send(Request::Save(tasks));
    }

    /// Non-blocking poll for pending events.
    /// Returns all queued events (may be empty).
    pub fn poll(&self) -> Vec<PersistenceEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.events.try_recv() {
            events.push(evt);
        }
        events
    }

    /// Block until the next event, or `None` after `timeout`
    pub fn next_event(&self, timeout: Duration) -> Option<PersistenceEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    /// Wait for the `Loaded` event, collecting any other events seen on the way
    pub fn wait_for_load(&self, timeout: Duration) -> (Option<TaskList>, Vec<PersistenceEvent>) {
        let deadline = Instant::now() + timeout;
        let mut others = Vec::new();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.events.recv_timeout(remaining) {
                Ok(PersistenceEvent::Loaded(tasks)) => return (tasks, others),
                Ok(other) => others.push(other),
                Err(_) => return (None, others),
            }
        }
    }

    /// Stop accepting requests, let the worker drain its queue, and join it
    pub fn shutdown(mut self) -> Vec<PersistenceEvent> {
        self.stop();
        self.poll()
    }

    fn send(&self, request: Request) {
        let sent = self.tx.as_ref().is_some_and(|tx| tx.send(request).is_ok());
        if !sent {
            error!(error = %PersistenceError::WorkerGone, "dropping persistence request");
        }
    }

    fn stop(&mut self) {
        // Closing the sender ends the worker loop once the queue is empty
        self.tx.take();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            error!("persistence worker panicked");
        }
    }
}

impl Drop for PersistenceBridge {
    fn drop(&mut self) {
        self.stop();
    }
}

impl StoreEffects for PersistenceBridge {
    fn load(&mut self) {
        self.request_load();
    }

    fn save(&mut self, tasks: &TaskList) {
        self.request_save(tasks.clone());
    }
}

fn run_worker<S: Storage>(
    storage: S,
    slot: String,
    rx: mpsc::Receiver<Request>,
    events: mpsc::Sender<PersistenceEvent>,
) {
    debug!(slot = %slot, "persistence worker started");
    // Receiver side may be gone during shutdown; events are then discarded
    for request in rx {
        match request {
            Request::Load => {
                let started_at = Instant::now();
                let loaded = match try_load(&storage, &slot) {
                    Ok(tasks) => {
                        info!(
                            slot = %slot,
                            count = tasks.as_ref().map_or(0, TaskList::len),
                            found = tasks.is_some(),
                            duration_ms = started_at.elapsed().as_millis() as u64,
                            "tasks loaded"
                        );
                        tasks
                    }
                    Err(error) => {
                        error!(slot = %slot, error = %error, "could not load tasks");
                        let _ = events.send(PersistenceEvent::Failed {
                            op: PersistenceOp::Load,
                            error,
                        });
                        None
                    }
                };
                let _ = events.send(PersistenceEvent::Loaded(loaded));
            }
            Request::Save(tasks) => match save(&storage, &slot, &tasks) {
                Ok(()) => {
                    debug!(slot = %slot, count = tasks.len(), "tasks saved");
                    let _ = events.send(PersistenceEvent::Saved { count: tasks.len() });
                }
                Err(error) => {
                    error!(slot = %slot, error = %error, "could not save tasks");
                    let _ = events.send(PersistenceEvent::Failed {
                        op: PersistenceOp::Save,
                        error,
                    });
                }
            },
        }
    }
    debug!(slot = %slot, "persistence worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::{FileStorage, MemoryStorage};
    use crate::model::task::Task;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use tempfile::TempDir;

    const WAIT: Duration = Duration::from_secs(5);

    fn sample_tasks() -> TaskList {
        let mut done = Task::with_id("b".into(), "Walk dog");
        done.completed = true;
        vec![Task::with_id("a".into(), "Buy milk"), done].into()
    }

    #[test]
    fn save_then_load_round_trip() {
        let storage = MemoryStorage::new();
        save(&storage, DEFAULT_SLOT, &sample_tasks()).unwrap();
        assert_eq!(load(&storage, DEFAULT_SLOT), Some(sample_tasks()));
    }

    #[test]
    fn save_writes_flat_json_array() {
        let storage = MemoryStorage::new();
        save(&storage, DEFAULT_SLOT, &sample_tasks()).unwrap();
        let raw = storage.raw(DEFAULT_SLOT).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"id": "a", "text": "Buy milk", "completed": false},
                {"id": "b", "text": "Walk dog", "completed": true},
            ])
        );
    }

    #[test]
    fn load_missing_slot_returns_none() {
        let storage = MemoryStorage::new();
        assert!(try_load(&storage, DEFAULT_SLOT).unwrap().is_none());
        assert!(load(&storage, DEFAULT_SLOT).is_none());
    }

    #[test]
    fn load_malformed_json_returns_none_and_backs_up() {
        let storage = MemoryStorage::new();
        storage.set_item(DEFAULT_SLOT, "not json {{{").unwrap();
        assert!(matches!(
            try_load(&storage, DEFAULT_SLOT),
            Err(PersistenceError::Parse(_))
        ));
        assert!(load(&storage, DEFAULT_SLOT).is_none());
        assert_eq!(storage.raw("tasks.bak").as_deref(), Some("not json {{{"));
    }

    #[test]
    fn load_undecodable_file_backs_up_raw_bytes() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        let raw: &[u8] = b"[{\"id\":\"a\",\"text\":\"Buy milk \xFF\",\"completed\":false}]";
        std::fs::write(dir.path().join("tasks.json"), raw).unwrap();

        assert!(matches!(
            try_load(&storage, DEFAULT_SLOT),
            Err(PersistenceError::Storage(StorageError::Corrupt { .. }))
        ));
        assert_eq!(std::fs::read(dir.path().join("tasks.bak.json")).unwrap(), raw);
    }

    #[test]
    fn load_wrong_shape_returns_none() {
        let storage = MemoryStorage::new();
        storage
            .set_item(DEFAULT_SLOT, r#"{"tasks": []}"#)
            .unwrap();
        assert!(load(&storage, DEFAULT_SLOT).is_none());
    }

    #[test]
    fn load_read_error_returns_none() {
        let storage = MemoryStorage::new();
        storage.set_fail_reads(true);
        assert!(matches!(
            try_load(&storage, DEFAULT_SLOT),
            Err(PersistenceError::Storage(_))
        ));
        assert!(load(&storage, DEFAULT_SLOT).is_none());
    }

    #[test]
    fn save_error_is_reported() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        assert!(matches!(
            save(&storage, DEFAULT_SLOT, &sample_tasks()),
            Err(PersistenceError::Storage(_))
        ));
    }

    #[test]
    fn bridge_loads_on_request() {
        let storage = MemoryStorage::new();
        save(&storage, DEFAULT_SLOT, &sample_tasks()).unwrap();

        let bridge = PersistenceBridge::start(storage, DEFAULT_SLOT).unwrap();
        bridge.request_load();
        let (loaded, others) = bridge.wait_for_load(WAIT);
        assert_eq!(loaded, Some(sample_tasks()));
        assert!(others.is_empty());
    }

    #[test]
    fn bridge_saves_in_order() {
        let storage = MemoryStorage::new();
        let bridge = PersistenceBridge::start(storage.clone(), DEFAULT_SLOT).unwrap();

        bridge.request_save(TaskList::new());
        bridge.request_save(sample_tasks());
        let events = bridge.shutdown();

        let counts: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                PersistenceEvent::Saved { count } => Some(*count),
                _ => None,
            })
            .collect();
        assert_eq!(counts, vec![0, 2]);
        assert_eq!(load(&storage, DEFAULT_SLOT), Some(sample_tasks()));
    }

    #[test]
    fn bridge_reports_save_failure() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        let bridge = PersistenceBridge::start(storage, DEFAULT_SLOT).unwrap();

        bridge.request_save(sample_tasks());
        match bridge.next_event(WAIT) {
            Some(PersistenceEvent::Failed { op, .. }) => assert_eq!(op, PersistenceOp::Save),
            other => panic!("expected save failure, got {:?}", other),
        }
    }

    #[test]
    fn bridge_reports_load_failure_then_empty_load() {
        let storage = MemoryStorage::new();
        storage.set_item(DEFAULT_SLOT, "[{\"id\":").unwrap();
        let bridge = PersistenceBridge::start(storage, DEFAULT_SLOT).unwrap();

        bridge.request_load();
        let (loaded, others) = bridge.wait_for_load(WAIT);
        assert!(loaded.is_none());
        assert!(matches!(
            others.as_slice(),
            [PersistenceEvent::Failed {
                op: PersistenceOp::Load,
                ..
            }]
        ));
    }

    #[test]
    fn bridge_with_file_storage_survives_restart() {
        let dir = TempDir::new().unwrap();

        let bridge = PersistenceBridge::start(FileStorage::new(dir.path()), DEFAULT_SLOT).unwrap();
        bridge.request_save(sample_tasks());
        bridge.shutdown();

        let bridge = PersistenceBridge::start(FileStorage::new(dir.path()), DEFAULT_SLOT).unwrap();
        bridge.request_load();
        let (loaded, _) = bridge.wait_for_load(WAIT);
        assert_eq!(loaded, Some(sample_tasks()));
    }

    fn arb_tasks() -> impl Strategy<Value = TaskList> {
        let text = r#"[a-zA-Z0-9 \t\n'"\\/{}\[\],:éß日本😀]{0,16}"#;
        prop::collection::vec((text, any::<bool>()), 0..8).prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(i, (text, completed))| {
                    let mut task = Task::with_id(format!("id-{i}").into(), text);
                    task.completed = completed;
                    task
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_save_load_round_trip(tasks in arb_tasks()) {
            let storage = MemoryStorage::new();
            save(&storage, DEFAULT_SLOT, &tasks).unwrap();
            prop_assert_eq!(try_load(&storage, DEFAULT_SLOT).unwrap(), Some(tasks));
        }
    }
}
