//! Durable storage backends for the native client
//!
//! `FileStorage` keeps the three session keys in `<state_dir>/state.json`,
//! written through on every change. `MemoryStorage` backs tests and
//! one-shot invocations.

use crate::error::CoreError;
use epiboard_types::{DurableStorage, StorageError, StorageKey};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const STATE_FILE: &str = "state.json";

pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open `<dir>/state.json`. A missing file starts empty; a corrupt one is
    /// reported and replaced on the next write.
    pub fn open(dir: &Path) -> Result<Self, CoreError> {
        let path = dir.join(STATE_FILE);
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Corrupt state file, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(CoreError::FileRead { path, source }),
        };

        // Drop anything that is not one of the persisted keys
        let entries: BTreeMap<String, String> = entries
            .into_iter()
            .filter(|(k, _)| StorageKey::ALL.iter().any(|key| key.as_str() == k.as_str()))
            .collect();

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>, key: StorageKey) -> Result<(), StorageError> {
        let write_err = |message: String| StorageError::Write {
            key: key.as_str(),
            message,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }
        let content =
            serde_json::to_string_pretty(entries).map_err(|e| write_err(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| write_err(e.to_string()))?;
        debug!(path = %self.path.display(), key = key.as_str(), "State persisted");
        Ok(())
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: StorageKey) -> Option<String> {
        self.entries.lock().get(key.as_str()).cloned()
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        entries.insert(key.as_str().to_string(), value.to_string());
        self.persist(&entries, key)
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        if entries.remove(key.as_str()).is_none() {
            return Ok(());
        }
        self.persist(&entries, key)
    }
}

/// Process-local storage, nothing survives the process
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<StorageKey, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: StorageKey) -> Option<String> {
        self.entries.read().get(&key).cloned()
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.entries.write().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.entries.write().remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epiboard_types::{clear_credentials, CountryCode};

    #[test]
    fn test_file_storage_round_trip_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = FileStorage::open(dir.path()).unwrap();
            storage.set(StorageKey::AuthToken, "tok").unwrap();
            storage.set(StorageKey::SelectedCountry, "ch").unwrap();
        }

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get(StorageKey::AuthToken).as_deref(), Some("tok"));
        assert_eq!(reopened.country(), Some(CountryCode::Ch));

        clear_credentials(&reopened).unwrap();
        let reopened = FileStorage::open(dir.path()).unwrap();
        assert!(reopened.get(StorageKey::AuthToken).is_none());
    }

    #[test]
    fn test_file_storage_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::open(&nested).unwrap();
        storage.set(StorageKey::Language, "it").unwrap();
        assert!(nested.join(STATE_FILE).exists());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STATE_FILE), "{not json").unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.get(StorageKey::AuthToken).is_none());
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(STATE_FILE),
            r#"{"auth_token":"t","favourite_colour":"blue"}"#,
        )
        .unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        storage.set(StorageKey::Language, "fr").unwrap();
        let content = std::fs::read_to_string(storage.path()).unwrap();
        assert!(!content.contains("favourite_colour"));
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.set(StorageKey::AuthToken, "x").unwrap();
        storage.remove(StorageKey::AuthToken).unwrap();
        assert!(storage.get(StorageKey::AuthToken).is_none());
    }
}
