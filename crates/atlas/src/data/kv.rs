//! Key-value storage backends
//!
//! The favorites store only ever reads and replaces whole records, so the
//! capability it needs is a string-keyed map of serialized values.

use crate::data::storage;
use crate::error::{AtlasError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A persistent string-keyed record store
///
/// Values are opaque serialized strings. `set` replaces the whole value
/// for a key; implementations must not leave a partially written record
/// behind when it fails.
pub trait KeyValueStore: Send + Sync {
    /// Read the record at `key`, `None` if it was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the record at `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory store, for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
    /// When set, every write fails (simulates quota exhaustion)
    read_only: Mutex<bool>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one raw record
    pub fn with_record(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Make subsequent writes fail (or succeed again)
    pub fn set_read_only(&self, read_only: bool) {
        *self.read_only.lock().unwrap_or_else(|e| e.into_inner()) = read_only;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if *self.read_only.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(AtlasError::Storage(format!(
                "Cannot write '{}': store is read-only",
                key
            )));
        }
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// Directory-backed store: key `k` lives in `<dir>/k.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store records under `dir` (created on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store records in the default config directory
    pub fn in_config_dir() -> Result<Self> {
        Ok(Self::new(storage::config_dir()?))
    }

    /// Directory holding the records
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(AtlasError::InvalidInput(format!(
                "'{}' is not a valid storage key",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        storage::read_file(&self.path_for(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        storage::ensure_parent(&path)?;
        storage::write_file(&path, value)
    }
}
