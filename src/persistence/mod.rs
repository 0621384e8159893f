//! Key-value persistence
//!
//! The game only ever needs string keys mapped to small JSON strings, which
//! is exactly what browser LocalStorage offers. Backends:
//! - `MemoryStore`: in-process map (tests, headless runs)
//! - `JsonFileStore`: one JSON object on disk (native)
//! - `LocalStorage`: browser storage (wasm32)

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

/// Storage backend failure
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String key-value storage, shaped after the browser Storage API
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Read and decode a JSON value. Missing keys, backend failures and bad JSON
/// all come back as `None` (failures are logged).
pub fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    match store.get_item(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring unreadable value for '{}': {}", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log::warn!("Failed to read '{}': {}", key, e);
            None
        }
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    store.set_item(key, &json)
}

/// In-memory store
#[derive(Debug, Clone)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
    available: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            available: true,
        }
    }

    /// A store whose every operation fails, like storage disabled by the browser
    pub fn unavailable() -> Self {
        Self {
            items: BTreeMap::new(),
            available: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.available {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store disabled".to_string()))
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check()?;
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.check()?;
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_item("a").unwrap(), None);
        store.set_item("a", "1").unwrap();
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("1"));
        store.remove_item("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_unavailable_store_errors() {
        let mut store = MemoryStore::unavailable();
        assert!(matches!(store.get_item("a"), Err(StoreError::Unavailable(_))));
        assert!(store.set_item("a", "1").is_err());
    }

    #[test]
    fn test_load_json_normalises_garbage() {
        let mut store = MemoryStore::new();
        store.set_item("k", "{ nope").unwrap();
        assert_eq!(load_json::<u64>(&store, "k"), None);
        save_json(&mut store, "k", &vec![1u32, 2]).unwrap();
        assert_eq!(load_json::<Vec<u32>>(&store, "k"), Some(vec![1, 2]));
        assert_eq!(load_json::<u64>(&MemoryStore::unavailable(), "k"), None);
    }
}
