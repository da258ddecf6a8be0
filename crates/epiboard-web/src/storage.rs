//! `localStorage` backend for the session keys

use epiboard_types::{DurableStorage, StorageError, StorageKey};

/// Zero-sized handle; every call looks the storage object up again
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|_| StorageError::Unavailable("localStorage access denied".to_string()))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
    }
}

impl DurableStorage for LocalStorage {
    fn get(&self, key: StorageKey) -> Option<String> {
        Self::storage().ok()?.get_item(key.as_str()).ok().flatten()
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key.as_str(), value)
            .map_err(|e| StorageError::Write {
                key: key.as_str(),
                message: format!("{:?}", e),
            })
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key.as_str())
            .map_err(|e| StorageError::Write {
                key: key.as_str(),
                message: format!("{:?}", e),
            })
    }
}
