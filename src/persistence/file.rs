//! JSON file backend for native builds
//!
//! The whole store is one JSON object, rewritten on every change.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let items = match fs::read_to_string(&path) {
            Ok(json) if json.trim().is_empty() => BTreeMap::new(),
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!("Opened store {} ({} keys)", path.display(), items.len());
        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.items)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pixel-arcade-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get_item("x").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path("reopen");
        let _ = fs::remove_file(&path);
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set_item("score", "120").unwrap();
        }
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get_item("score").unwrap().as_deref(), Some("120"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(StoreError::Json(_))));
        let _ = fs::remove_file(&path);
    }
}
