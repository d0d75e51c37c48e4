//! Core traits for key-value storage.

use std::fmt;

use async_trait::async_trait;

/// Error codes for storage operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum StorageErrorCode {
    /// Key not found
    NotFound = 1000,
    /// Access denied by the platform
    AccessDenied = 2000,
    /// Storage quota exceeded
    QuotaExceeded = 3000,
    /// Stored data could not be (de)serialized
    Serialization = 4000,
    /// I/O failure
    Io = 5000,
    /// Platform not supported
    Unsupported = 6000,
    /// Internal error
    Internal = 9999,
}

/// Error type for storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageError {
    /// Error code for FFI/mobile integration
    pub code: StorageErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Storage key related to the error (if applicable)
    pub key: Option<String>,
}

impl StorageError {
    /// Create a new error.
    pub fn new(code: StorageErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            key: None,
        }
    }

    /// Create a new error with the associated key.
    pub fn with_key(
        code: StorageErrorCode,
        message: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Create a "not found" error.
    pub fn not_found(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            code: StorageErrorCode::NotFound,
            message: format!("Key not found: {}", key),
            key: Some(key),
        }
    }

    /// Create an "access denied" error.
    pub fn access_denied(reason: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::AccessDenied, reason)
    }

    /// Create a "quota exceeded" error.
    pub fn quota_exceeded(reason: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::QuotaExceeded, reason)
    }

    /// Create an I/O error.
    pub fn io(reason: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::Io, reason)
    }

    /// Create an "unsupported" error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        Self::new(
            StorageErrorCode::Unsupported,
            format!("Feature not supported: {}", feature.into()),
        )
    }

    /// Check if this error indicates the key wasn't found.
    pub fn is_not_found(&self) -> bool {
        self.code == StorageErrorCode::NotFound
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(key) = &self.key {
            write!(f, "{} (key: {})", self.message, key)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::PermissionDenied => Self::access_denied(e.to_string()),
            _ => Self::io(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(StorageErrorCode::Serialization, e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Asynchronous string key-value store.
///
/// Shared by every [`AppConnect`](crate::AppConnect) in the process; each one
/// only touches the keys of its own namespace.
///
/// Implementations must:
/// - Return `Ok(None)` from `find` for a key that was never saved
/// - Treat `remove` of an absent key as success
/// - Overwrite on `save`
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Load the value stored under `key`.
    async fn find(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete the value stored under `key`.
    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// List all stored keys.
    async fn keys(&self) -> StorageResult<Vec<String>>;
}
