//! Persisted key-value store backing the `storage:*` channels.
//!
//! One JSON object on disk, loaded once and rewritten whole after every
//! mutation. Reads are served from memory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use capbridge_common::StorageError;
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub struct PersistedStore {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
    /// Set when the last write failed, so memory is ahead of the file.
    diverged: AtomicBool,
}

impl PersistedStore {
    /// Load the store at `path`. A missing file is an empty store; an
    /// unreadable or malformed one is logged and also starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match read_map(&path) {
            Ok(values) => {
                debug!(path = %path.display(), keys = values.len(), "store loaded");
                values
            }
            Err(e) => {
                warn!(error = %e, "starting with an empty store");
                Map::new()
            }
        };
        Self {
            path,
            values: Mutex::new(values),
            diverged: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    pub fn has(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn set(&self, key: &str, value: Value) {
        let mut values = self.lock();
        values.insert(key.to_string(), value);
        self.persist(&values);
    }

    pub fn delete(&self, key: &str) {
        let mut values = self.lock();
        if values.remove(key).is_some() {
            self.persist(&values);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether memory holds changes the file does not.
    pub fn is_diverged(&self) -> bool {
        self.diverged.load(Ordering::SeqCst)
    }

    /// Write the current map to disk now.
    pub fn flush(&self) -> Result<(), StorageError> {
        let values = self.lock();
        let result = write_map(&self.path, &values);
        self.diverged.store(result.is_err(), Ordering::SeqCst);
        result
    }

    fn persist(&self, values: &Map<String, Value>) {
        match write_map(&self.path, values) {
            Ok(()) => self.diverged.store(false, Ordering::SeqCst),
            Err(e) => {
                // Memory is kept; the next successful write catches the file up.
                warn!(error = %e, "store write failed");
                self.diverged.store(true, Ordering::SeqCst);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Map<String, Value>> {
        // A panic mid-mutation leaves a valid map, so poisoning is ignored.
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn read_map(path: &Path) -> Result<Map<String, Value>, StorageError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
        Err(e) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };
    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StorageError::Malformed(format!(
            "{}: top level is {}",
            path.display(),
            json_kind(&other)
        ))),
        Err(e) => Err(StorageError::Malformed(format!("{}: {e}", path.display()))),
    }
}

fn write_map(path: &Path, values: &Map<String, Value>) -> Result<(), StorageError> {
    let write_err = |reason: String| StorageError::Write {
        path: path.to_path_buf(),
        reason,
    };
    let json = serde_json::to_string_pretty(values).map_err(|e| write_err(e.to_string()))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }
    std::fs::write(path, json).map_err(|e| write_err(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PersistedStore::open(dir.path().join("app-storage.json"));
        assert!(store.is_empty());
        assert!(!store.is_diverged());
    }

    #[test]
    fn set_then_get_deep_equals() {
        let dir = tempfile::tempdir().unwrap();
        let store = PersistedStore::open(dir.path().join("s.json"));
        let value = json!({"theme": "dark", "recent": [1, 2, {"x": null}]});

        store.set("prefs", value.clone());
        assert_eq!(store.get("prefs"), Some(value));
        assert!(store.has("prefs"));
    }

    #[test]
    fn delete_then_has_is_false() {
        let dir = tempfile::tempdir().unwrap();
        let store = PersistedStore::open(dir.path().join("s.json"));
        store.set("k", json!(1));
        store.delete("k");
        assert!(!store.has("k"));
        assert_eq!(store.get("k"), None);
        // Deleting again is fine.
        store.delete("k");
    }

    #[test]
    fn every_mutation_rewrites_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("s.json");
        let store = PersistedStore::open(&path);

        store.set("a", json!("x"));
        store.set("b", json!(true));
        store.delete("a");

        let raw = std::fs::read_to_string(&path).unwrap();
        let on_disk: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk, json!({"b": true}));

        let reopened = PersistedStore::open(&path);
        assert_eq!(reopened.get("b"), Some(json!(true)));
        assert!(!reopened.has("a"));
    }

    #[test]
    fn malformed_file_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(PersistedStore::open(&path).is_empty());

        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(PersistedStore::open(&path).is_empty());
    }

    #[test]
    fn failed_write_keeps_memory_and_flags_divergence() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes every write fail.
        let path = dir.path().join("s.json");
        std::fs::create_dir(&path).unwrap();

        let store = PersistedStore::open(&path);
        store.set("k", json!(42));

        assert_eq!(store.get("k"), Some(json!(42)));
        assert!(store.is_diverged());
        assert!(matches!(store.flush(), Err(StorageError::Write { .. })));

        std::fs::remove_dir(&path).unwrap();
        store.flush().unwrap();
        assert!(!store.is_diverged());
        assert_eq!(PersistedStore::open(&path).get("k"), Some(json!(42)));
    }
}
