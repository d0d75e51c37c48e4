use std::fmt;
use std::sync::Arc;

use super::traits::{KeyValueStorage, StorageResult};

/// A single storage entry bound to one key at construction time.
///
/// Cloning is cheap; clones share the same backing store.
#[derive(Clone)]
pub struct StringValueStorage {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl StringValueStorage {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The storage key this entry is bound to.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn save(&self, value: &str) -> StorageResult<()> {
        self.storage.save(&self.key, value).await
    }

    pub async fn find(&self) -> StorageResult<Option<String>> {
        self.storage.find(&self.key).await
    }

    /// Erase the entry. Succeeds when nothing is stored.
    pub async fn remove(&self) -> StorageResult<()> {
        self.storage.remove(&self.key).await
    }
}

impl fmt::Debug for StringValueStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringValueStorage")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
