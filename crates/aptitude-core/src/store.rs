//! Persisted record store.
//!
//! Three records hand state from one stage to the next: `session`,
//! `answers` and `result`. Each is stored as a JSON document under its key.
//! Clearing all three returns the quiz to its initial state.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// The keys of the persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Session,
    Answers,
    Result,
}

impl RecordKey {
    pub const ALL: [RecordKey; 3] = [RecordKey::Session, RecordKey::Answers, RecordKey::Result];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKey::Session => "session",
            RecordKey::Answers => "answers",
            RecordKey::Result => "result",
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tiny key-value store holding serialized records.
///
/// Each write replaces the whole record in one step, so readers never see
/// a partially written value.
pub trait RecordStore {
    /// Raw JSON stored under `key`, if any.
    fn read(&self, key: RecordKey) -> Result<Option<String>, StoreError>;

    /// Replace the record under `key`.
    fn write(&self, key: RecordKey, json: &str) -> Result<(), StoreError>;

    /// Delete the record under `key`. Deleting a missing record is not an error.
    fn remove(&self, key: RecordKey) -> Result<(), StoreError>;

    /// Load and decode the record under `key`.
    fn load<T: DeserializeOwned>(&self, key: RecordKey) -> Result<Option<T>, StoreError>
    where
        Self: Sized,
    {
        match self.read(key)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|source| StoreError::Corrupt { key, source }),
            None => Ok(None),
        }
    }

    /// Encode `value` and store it under `key`.
    fn save<T: Serialize>(&self, key: RecordKey, value: &T) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let json = serde_json::to_string_pretty(value)
            .map_err(|source| StoreError::Serialize { key, source })?;
        self.write(key, &json)
    }

    /// Remove every record.
    fn clear(&self) -> Result<(), StoreError> {
        for key in RecordKey::ALL {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// Records stored as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: RecordKey) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl RecordStore for JsonFileStore {
    fn read(&self, key: RecordKey) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(%key, path = %path.display(), "record read");
                Ok(Some(content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { key, source }),
        }
    }

    fn write(&self, key: RecordKey, json: &str) -> Result<(), StoreError> {
        let io = |source: std::io::Error| StoreError::Io { key, source };

        std::fs::create_dir_all(&self.dir).map_err(io)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(io)?;
        tmp.write_all(json.as_bytes()).map_err(io)?;
        tmp.flush().map_err(io)?;
        let path = self.path_for(key);
        tmp.persist(&path).map_err(|e| io(e.error))?;

        tracing::debug!(%key, path = %path.display(), bytes = json.len(), "record written");
        Ok(())
    }

    fn remove(&self, key: RecordKey) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => {
                tracing::debug!(%key, "record removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { key, source }),
        }
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<RecordKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> std::sync::MutexGuard<'_, HashMap<RecordKey, String>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, key: RecordKey) -> Result<Option<String>, StoreError> {
        Ok(self.records().get(&key).cloned())
    }

    fn write(&self, key: RecordKey, json: &str) -> Result<(), StoreError> {
        self.records().insert(key, json.to_string());
        Ok(())
    }

    fn remove(&self, key: RecordKey) -> Result<(), StoreError> {
        self.records().remove(&key);
        Ok(())
    }
}
