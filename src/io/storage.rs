use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Error type for key-value storage access
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not valid UTF-8: {source}")]
    Corrupt {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A string key-value store on the local device.
///
/// `get_item` returns `Ok(None)` for a key that was never written.
pub trait Storage: Send + 'static {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Copy the stored value of `from` to `to` as-is, even when `get_item`
    /// cannot decode it. No-op if `from` was never written.
    fn copy_item(&self, from: &str, to: &str) -> Result<(), StorageError> {
        match self.get_item(from)? {
            Some(value) => self.set_item(to, &value),
            None => Ok(()),
        }
    }
}

/// File-backed storage: one `<key>.json` file per key under `dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn read_bytes(&self, key: &str) -> Result<Option<(PathBuf, Vec<u8>)>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some((path, bytes))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadError { path, source: e }),
        }
    }

    fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let write_err = |source| StorageError::WriteError {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(write_err)?;

        // Temp file in the same directory so the rename stays on one filesystem
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let Some((path, bytes)) = self.read_bytes(key)? else {
            return Ok(None);
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|source| StorageError::Corrupt { path, source })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_bytes(key, value.as_bytes())
    }

    fn copy_item(&self, from: &str, to: &str) -> Result<(), StorageError> {
        match self.read_bytes(from)? {
            Some((_, bytes)) => self.write_bytes(to, &bytes),
            None => Ok(()),
        }
    }
}

/// Keys become file names, so keep them to a safe alphabet
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !key.starts_with('.');
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// In-process storage. Clones share the same map.
///
/// Reads and writes can be switched to fail, for exercising error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    items: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Raw value for a key, bypassing failure injection
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().items.get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // A poisoned map is still a usable map
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.lock();
        if inner.fail_reads {
            return Err(StorageError::Unavailable("reads disabled".into()));
        }
        Ok(inner.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StorageError::Unavailable("writes disabled".into()));
        }
        inner.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_missing_key_returns_none() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.get_item("tasks").unwrap().is_none());
    }

    #[test]
    fn file_write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.set_item("tasks", "[1,2,3]").unwrap();
        assert_eq!(storage.get_item("tasks").unwrap().as_deref(), Some("[1,2,3]"));
        assert!(dir.path().join("tasks.json").exists());
    }

    #[test]
    fn file_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.set_item("tasks", "first").unwrap();
        storage.set_item("tasks", "second").unwrap();
        assert_eq!(storage.get_item("tasks").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn file_write_creates_missing_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::new(&nested);
        storage.set_item("tasks", "[]").unwrap();
        assert!(nested.join("tasks.json").exists());
    }

    #[test]
    fn file_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.set_item("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.get_item(""),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.get_item(".hidden"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn file_invalid_utf8_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        fs::write(dir.path().join("tasks.json"), b"[\"milk \xFF\"]").unwrap();
        assert!(matches!(
            storage.get_item("tasks"),
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[test]
    fn file_copy_keeps_undecodable_bytes() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        let raw: &[u8] = b"\xFF\xFEnot text";
        fs::write(dir.path().join("tasks.json"), raw).unwrap();

        storage.copy_item("tasks", "tasks.bak").unwrap();
        assert_eq!(fs::read(dir.path().join("tasks.bak.json")).unwrap(), raw);

        // Missing source leaves nothing behind
        storage.copy_item("absent", "absent.bak").unwrap();
        assert!(!dir.path().join("absent.bak.json").exists());
    }

    #[test]
    fn memory_copy_item() {
        let storage = MemoryStorage::new();
        storage.set_item("tasks", "[]").unwrap();
        storage.copy_item("tasks", "tasks.bak").unwrap();
        assert_eq!(storage.raw("tasks.bak").as_deref(), Some("[]"));
    }

    #[test]
    fn memory_clones_share_state() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set_item("k", "v").unwrap();
        assert_eq!(b.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn memory_failure_injection() {
        let storage = MemoryStorage::new();
        storage.set_item("k", "v").unwrap();

        storage.set_fail_reads(true);
        assert!(storage.get_item("k").is_err());

        storage.set_fail_writes(true);
        assert!(storage.set_item("k", "w").is_err());
        assert_eq!(storage.raw("k").as_deref(), Some("v"));
    }
}
