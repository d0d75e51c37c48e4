//! Browser host bindings (wasm32 only).
//!
//! - [`WebLocalStorage`]: `window.localStorage`
//! - [`WebBrowser`]: `window.open`, new tabs supported
//! - [`WebNavigator`]: `location.replace`
//!
//! `web-sys` handles are not `Send`, so every call looks up `window` afresh
//! instead of caching it.

use async_trait::async_trait;
use wasm_bindgen::JsValue;

use crate::browser::{Browser, WindowTarget};
use crate::navigation::Navigator;
use crate::storage::{KeyValueStorage, StorageError, StorageErrorCode, StorageResult};
use crate::{AppConnectError, Result};

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

fn window() -> Option<web_sys::Window> {
    web_sys::window()
}

/// `window.localStorage` implementation of [`KeyValueStorage`].
#[derive(Debug, Clone, Default)]
pub struct WebLocalStorage {
    prefix: String,
}

impl WebLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every key, e.g. with the app name.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn storage(&self) -> StorageResult<web_sys::Storage> {
        window()
            .ok_or_else(|| StorageError::unsupported("window"))?
            .local_storage()
            .map_err(|e| StorageError::access_denied(js_message(&e)))?
            .ok_or_else(|| StorageError::unsupported("localStorage"))
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl KeyValueStorage for WebLocalStorage {
    async fn find(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage()?
            .get_item(&self.full_key(key))
            .map_err(|e| StorageError::with_key(StorageErrorCode::Io, js_message(&e), key))
    }

    async fn save(&self, key: &str, value: &str) -> StorageResult<()> {
        // setItem throws QuotaExceededError when full.
        self.storage()?
            .set_item(&self.full_key(key), value)
            .map_err(|e| {
                StorageError::with_key(StorageErrorCode::QuotaExceeded, js_message(&e), key)
            })
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.storage()?
            .remove_item(&self.full_key(key))
            .map_err(|e| StorageError::with_key(StorageErrorCode::Io, js_message(&e), key))
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        let storage = self.storage()?;
        let len = storage
            .length()
            .map_err(|e| StorageError::io(js_message(&e)))?;

        let mut keys = Vec::new();
        for index in 0..len {
            let key = storage
                .key(index)
                .map_err(|e| StorageError::io(js_message(&e)))?;
            if let Some(key) = key.and_then(|k| k.strip_prefix(&self.prefix).map(str::to_string)) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

/// Opens the companion app with `window.open`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebBrowser;

#[async_trait]
impl Browser for WebBrowser {
    async fn open(&self, url: &str, target: WindowTarget) -> Result<()> {
        let window = window().ok_or_else(|| AppConnectError::Browser("no window".to_string()))?;
        window
            .open_with_url_and_target(url, target.as_str())
            .map_err(|e| AppConnectError::Browser(js_message(&e)))?;
        Ok(())
    }

    /// A page cannot close a view it navigated itself away to; the callback
    /// lands back in this window, so there is nothing to dismiss.
    async fn dismiss(&self) -> Result<()> {
        Ok(())
    }

    fn supports_new_tab(&self) -> bool {
        true
    }
}

/// Navigates with `location.replace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebNavigator;

#[async_trait]
impl Navigator for WebNavigator {
    async fn replace(&self, path: &str) -> Result<()> {
        let window =
            window().ok_or_else(|| AppConnectError::Navigation("no window".to_string()))?;
        window
            .location()
            .replace(path)
            .map_err(|e| AppConnectError::Navigation(js_message(&e)))
    }
}
