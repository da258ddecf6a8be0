//! Durable client-side storage contract
//!
//! Exactly three keys are persisted: the bearer token, the selected country
//! and the UI language. Backends: browser localStorage, a JSON file for the
//! native client, and an in-memory map for tests.

use crate::i18n::Language;
use crate::permissions::CountryCode;
use crate::session::Session;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    AuthToken,
    SelectedCountry,
    Language,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [
        StorageKey::AuthToken,
        StorageKey::SelectedCountry,
        StorageKey::Language,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::AuthToken => "auth_token",
            StorageKey::SelectedCountry => "selected_country",
            StorageKey::Language => "ui_language",
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write {key}: {message}")]
    Write { key: &'static str, message: String },
}

pub trait DurableStorage {
    fn get(&self, key: StorageKey) -> Option<String>;
    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: StorageKey) -> Result<(), StorageError>;

    fn country(&self) -> Option<CountryCode> {
        self.get(StorageKey::SelectedCountry)
            .and_then(|raw| raw.parse().ok())
    }

    fn language(&self) -> Option<Language> {
        self.get(StorageKey::Language).and_then(|raw| raw.parse().ok())
    }
}

/// Remove the token and country selection. The language preference survives logout.
pub fn clear_credentials<S: DurableStorage + ?Sized>(storage: &S) -> Result<(), StorageError> {
    storage.remove(StorageKey::AuthToken)?;
    storage.remove(StorageKey::SelectedCountry)
}

/// Startup hydration from whatever the storage holds
pub fn restore_session<S: DurableStorage + ?Sized>(storage: &S) -> Session {
    Session::hydrate(storage.get(StorageKey::AuthToken), storage.country())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapStorage(RefCell<HashMap<StorageKey, String>>);

    impl DurableStorage for MapStorage {
        fn get(&self, key: StorageKey) -> Option<String> {
            self.0.borrow().get(&key).cloned()
        }
        fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().insert(key, value.to_string());
            Ok(())
        }
        fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
            self.0.borrow_mut().remove(&key);
            Ok(())
        }
    }

    #[test]
    fn test_restore_and_clear() {
        let storage = MapStorage::default();
        storage.set(StorageKey::AuthToken, "tok").unwrap();
        storage.set(StorageKey::SelectedCountry, "fr").unwrap();
        storage.set(StorageKey::Language, "de").unwrap();

        let session = restore_session(&storage);
        assert!(session.is_authenticated());
        assert_eq!(session.country(), Some(CountryCode::Fr));

        clear_credentials(&storage).unwrap();
        assert!(storage.get(StorageKey::AuthToken).is_none());
        assert!(storage.country().is_none());
        assert_eq!(storage.language(), Some(Language::De));
        assert!(!restore_session(&storage).is_authenticated());
    }

    #[test]
    fn test_garbage_country_is_ignored() {
        let storage = MapStorage::default();
        storage.set(StorageKey::SelectedCountry, "atlantis").unwrap();
        assert!(storage.country().is_none());
    }
}
