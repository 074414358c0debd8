//! [`Storage`] over the browser's `window.localStorage`.

use crate::store::{Result, Storage, StoreError};
use wasm_bindgen::JsValue;

pub struct LocalStorage {
    inner: web_sys::Storage,
}

pub(crate) fn js_error(err: JsValue) -> StoreError {
    StoreError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl LocalStorage {
    pub fn new(inner: web_sys::Storage) -> Self {
        Self { inner }
    }

    pub fn from_window() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Backend("no window".to_string()))?;
        let inner = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StoreError::Backend("localStorage is disabled".to_string()))?;
        Ok(Self::new(inner))
    }
}

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_item(key).map_err(js_error)
    }

    // Quota errors surface here.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.inner.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.inner.remove_item(key).map_err(js_error)
    }
}
