use std::{fs, io, path::PathBuf};
#[cfg(test)]
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[cfg(test)]
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Durable string storage addressed by a fixed key, in the manner of browser local storage.
pub trait KeyValueStorage: Send + Sync {
    /// `Ok(None)` when nothing has been stored under `key` yet.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

// One JSON file per key inside `dir`
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // Write to a temp file first and rename, so a crash never leaves half a file
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

// In-process storage for tests; clones share the same map
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut values) = storage.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        storage
    }
}

#[cfg(test)]
impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.read("nothing").unwrap().is_none());
    }

    #[test]
    fn file_storage_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        storage.write("alarms", "[1,2]").unwrap();
        storage.write("alarms", "[3]").unwrap();

        assert_eq!(storage.read("alarms").unwrap().as_deref(), Some("[3]"));
        assert!(storage.path_for("alarms").exists());
        assert!(!storage.path_for("alarms").with_extension("json.tmp").exists());
    }

    #[test]
    fn memory_storage_clones_share_values() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.write("k", "v").unwrap();
        assert_eq!(other.read("k").unwrap().as_deref(), Some("v"));
        assert_eq!(
            MemoryStorage::with_value("a", "b").read("a").unwrap().as_deref(),
            Some("b")
        );
    }
}
