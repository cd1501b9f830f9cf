#![forbid(unsafe_code)]

//! `window.localStorage` backend.

use guidepost_runtime::state_persistence::{KeyValueStore, StorageError, StorageResult};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// [`KeyValueStore`] over `window.localStorage`.
///
/// Access can be denied (private browsing, sandboxed iframes). In that case
/// every operation returns [`StorageError::Unavailable`] and the completion
/// flag only lives for the page session.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| match w.local_storage() {
            Ok(storage) => storage,
            Err(err) => {
                tracing::warn!(error = ?err, "localStorage access denied");
                None
            }
        });
        Self { storage }
    }

    fn storage(&self) -> StorageResult<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage is not available".into()))
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn js_error(err: JsValue) -> StorageError {
    StorageError::Unavailable(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl KeyValueStore for LocalStorage {
    fn name(&self) -> &str {
        "LocalStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.storage()?.remove_item(key).map_err(js_error)
    }

    fn is_available(&self) -> bool {
        self.storage.is_some()
    }
}
