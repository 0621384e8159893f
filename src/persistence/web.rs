//! Browser LocalStorage backend

use super::{KeyValueStore, StoreError};

/// Handle to `window.localStorage`. Cheap to clone; every call looks the
/// storage object up again so a page that revokes storage degrades to errors.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("localStorage not accessible".to_string()))
    }
}

fn js_error(e: wasm_bindgen::JsValue) -> StoreError {
    StoreError::Unavailable(format!("{:?}", e))
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage()?.remove_item(key).map_err(js_error)
    }
}
