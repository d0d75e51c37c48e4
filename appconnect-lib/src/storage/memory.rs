//! In-memory key-value storage implementation.
//!
//! Values are lost when the process exits, so a session started here does
//! not survive an app restart. Use it for tests and single-process demos.
//!
//! # Thread Safety
//!
//! This storage uses `RwLock` for thread-safe access. Lock poisoning
//! is handled gracefully by returning an error rather than panicking.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::traits::{KeyValueStorage, StorageError, StorageErrorCode, StorageResult};

/// In-memory implementation of [`KeyValueStorage`].
pub struct InMemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

/// Helper function to handle lock poisoning gracefully.
fn lock_error(context: &str) -> StorageError {
    StorageError::new(
        StorageErrorCode::Internal,
        format!("InMemoryStorage: lock poisoned during {}", context),
    )
}

impl InMemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Get the number of stored values.
    ///
    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    /// Check if storage is empty.
    ///
    /// Returns true if the lock is poisoned.
    pub fn is_empty(&self) -> bool {
        self.values.read().map(|v| v.is_empty()).unwrap_or(true)
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStorage for InMemoryStorage {
    async fn find(&self, key: &str) -> StorageResult<Option<String>> {
        let values = self.values.read().map_err(|_| lock_error("find"))?;
        Ok(values.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self.values.write().map_err(|_| lock_error("save"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let mut values = self.values.write().map_err(|_| lock_error("remove"))?;
        values.remove(key);
        Ok(())
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        let values = self.values.read().map_err(|_| lock_error("keys"))?;
        Ok(values.keys().cloned().collect())
    }
}
