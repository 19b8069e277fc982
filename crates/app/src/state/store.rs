//! Key-value persistence adapters.

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use mockall::automock;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("state store io error: {0}")]
    Io(#[from] io::Error),

    #[error("state store json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage for JSON values under string keys.
#[automock]
pub trait StateStore: Send + Sync {
    /// Value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Fails if the backing storage cannot be read.
    fn load(&self, key: &str) -> Result<Option<Value>, StateStoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Fails if the backing storage cannot be written.
    fn save(&self, key: &str, value: Value) -> Result<(), StateStoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Fails if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StateStoreError>;
}

/// A single JSON object on disk, one entry per key.
///
/// Writes go to a temporary file in the same directory which then replaces the document.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, Value>, StateStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(error) => return Err(error.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    /// Reads the document for a write, starting over if the existing one is unreadable.
    fn read_document_for_write(&self) -> Result<Map<String, Value>, StateStoreError> {
        match self.read_document() {
            Err(StateStoreError::Json(error)) => {
                warn!(path = %self.path.display(), "replacing corrupt state file: {error}");
                Ok(Map::new())
            }
            other => other,
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), StateStoreError> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        fs::create_dir_all(directory)?;

        let mut file = NamedTempFile::new_in(directory)?;

        serde_json::to_writer_pretty(&mut file, document)?;
        file.write_all(b"\n")?;
        file.persist(&self.path).map_err(|error| error.error)?;

        debug!(path = %self.path.display(), "state file written");

        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StateStoreError> {
        Ok(self.read_document()?.remove(key))
    }

    fn save(&self, key: &str, value: Value) -> Result<(), StateStoreError> {
        let mut document = self.read_document_for_write()?;

        document.insert(key.to_string(), value);

        self.write_document(&document)
    }

    fn remove(&self, key: &str) -> Result<(), StateStoreError> {
        let mut document = self.read_document_for_write()?;

        if document.remove(key).is_some() {
            self.write_document(&document)?;
        }

        Ok(())
    }
}

/// In-process store, used by tests and one-shot runs that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StateStoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: Value) -> Result<(), StateStoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StateStoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn file_store_round_trips_and_creates_directories() -> TestResult {
        let dir = tempdir()?;
        let store = FileStateStore::new(dir.path().join("nested/state.json"));

        assert_eq!(store.load("root")?, None);

        store.save("root", json!({ "theme": "dark" }))?;
        store.save("other", json!(1))?;

        assert_eq!(store.load("root")?, Some(json!({ "theme": "dark" })));
        assert_eq!(store.load("other")?, Some(json!(1)));

        store.remove("other")?;

        assert_eq!(store.load("other")?, None);
        assert_eq!(store.load("root")?, Some(json!({ "theme": "dark" })));

        Ok(())
    }

    #[test]
    fn file_store_reports_corrupt_document_on_load() -> TestResult {
        let dir = tempdir()?;
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json")?;

        let store = FileStateStore::new(&path);
        let result = store.load("root");

        assert!(
            matches!(result, Err(StateStoreError::Json(_))),
            "expected Json error, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn file_store_overwrites_corrupt_document_on_save() -> TestResult {
        let dir = tempdir()?;
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json")?;

        let store = FileStateStore::new(&path);
        store.save("root", json!({ "cart": null }))?;

        assert_eq!(store.load("root")?, Some(json!({ "cart": null })));

        Ok(())
    }

    #[test]
    fn memory_store_round_trips() -> TestResult {
        let store = MemoryStateStore::new();

        store.save("root", json!([1, 2]))?;
        assert_eq!(store.load("root")?, Some(json!([1, 2])));

        store.remove("root")?;
        store.remove("root")?;
        assert_eq!(store.load("root")?, None);

        Ok(())
    }
}
