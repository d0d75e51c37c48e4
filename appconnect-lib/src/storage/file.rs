//! File-backed key-value storage.
//!
//! All entries live in a single JSON object on disk. Every operation reads
//! the document, applies the change and writes it back, so two processes
//! sharing the file see each other's sessions (the CLI relies on this between
//! the `connect` and `callback` invocations).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use super::traits::{KeyValueStorage, StorageError, StorageErrorCode, StorageResult};

/// JSON file implementation of [`KeyValueStorage`].
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Create a storage backed by the JSON file at `path`.
    ///
    /// The parent directory is created if needed. The file itself is created
    /// on the first `save`.
    pub fn new<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = std::fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn store(&self, values: &BTreeMap<String, String>) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    fn update<F>(&self, context: &str, apply: F) -> StorageResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _guard = self.write_lock.lock().map_err(|_| {
            StorageError::new(
                StorageErrorCode::Internal,
                format!("FileStorage: lock poisoned during {}", context),
            )
        })?;
        let mut values = self.load()?;
        if apply(&mut values) {
            self.store(&values)?;
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn find(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    async fn save(&self, key: &str, value: &str) -> StorageResult<()> {
        self.update("save", |values| {
            values.insert(key.to_string(), value.to_string());
            true
        })
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.update("remove", |values| values.remove(key).is_some())
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.load()?.into_keys().collect())
    }
}
