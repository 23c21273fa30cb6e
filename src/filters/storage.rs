//! Durable key/value storage behind the filter store.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::DashboardError;

/// String key/value storage. Implementations are synchronous and
/// single-writer; callers decide how to degrade on failure.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, DashboardError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DashboardError>;
    fn remove(&self, key: &str) -> Result<(), DashboardError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &S {
    fn get(&self, key: &str) -> Result<Option<String>, DashboardError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DashboardError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), DashboardError> {
        (**self).remove(key)
    }
}

/// In-memory storage, used by tests and as a stand-in when the browser
/// denies access to `localStorage`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, DashboardError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DashboardError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DashboardError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Browser `localStorage`. Holds `None` when the window or storage is
/// unavailable (private mode, sandboxed iframe); every call then fails
/// with [`DashboardError::Storage`].
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let inner = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        Self { inner }
    }

    fn storage(&self) -> Result<&web_sys::Storage, DashboardError> {
        self.inner
            .as_ref()
            .ok_or_else(|| DashboardError::Storage("localStorage is not available".to_string()))
    }
}

fn js_error(context: &str, err: wasm_bindgen::JsValue) -> DashboardError {
    DashboardError::Storage(format!(
        "{}: {}",
        context,
        err.as_string().unwrap_or_else(|| format!("{:?}", err))
    ))
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, DashboardError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| js_error("Failed to read item", e))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DashboardError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| js_error("Failed to write item", e))
    }

    fn remove(&self, key: &str) -> Result<(), DashboardError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| js_error("Failed to remove item", e))
    }
}
