//! Error types for app-connect operations.
//!
//! Every failure the protocol can surface maps to one variant of
//! [`AppConnectError`]. A session id mismatch or a callback arriving without
//! an active session is *not* an error; those are reported through
//! [`CallbackOutcome`](crate::resolver::CallbackOutcome).

use crate::storage::{StorageError, StorageErrorCode};

/// Error codes for FFI and mobile integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum AppConnectErrorCode {
    /// Storage read/write failed
    Storage = 1000,
    /// Storage quota exceeded
    QuotaExceeded = 1001,
    /// Storage access denied
    StorageAccessDenied = 1002,
    /// Random source failed
    Random = 2000,
    /// URL could not be parsed
    InvalidUrl = 3000,
    /// Parameter (de)serialization failed
    Serialization = 3001,
    /// Opening or dismissing the browser failed
    Browser = 4000,
    /// Router navigation failed
    Navigation = 4001,
    /// Success handler reported a failure
    Callback = 5000,
    /// Invalid configuration
    InvalidConfig = 6000,
    /// Internal/unexpected error
    Internal = 9999,
}

/// Error type for app-connect operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppConnectError {
    /// Storage operation failed.
    #[error("storage error: {message}")]
    Storage {
        /// Underlying storage code
        code: StorageErrorCode,
        /// Human-readable message
        message: String,
    },

    /// The random source failed to produce bytes.
    #[error("random source error: {0}")]
    Random(String),

    /// A URL could not be parsed.
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL
        url: String,
        /// Parser message
        reason: String,
    },

    /// Parameters could not be serialized or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The browser could not be opened or dismissed.
    #[error("browser error: {0}")]
    Browser(String),

    /// Router navigation failed.
    #[error("navigation error: {0}")]
    Navigation(String),

    /// The success handler failed while processing a matched callback.
    #[error("callback handler failed: {0}")]
    Callback(String),

    /// Configuration is invalid.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Internal/unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppConnectError {
    /// Get the error code for FFI/mobile integration.
    pub fn code(&self) -> AppConnectErrorCode {
        match self {
            Self::Storage { code, .. } => match code {
                StorageErrorCode::QuotaExceeded => AppConnectErrorCode::QuotaExceeded,
                StorageErrorCode::AccessDenied => AppConnectErrorCode::StorageAccessDenied,
                _ => AppConnectErrorCode::Storage,
            },
            Self::Random(_) => AppConnectErrorCode::Random,
            Self::InvalidUrl { .. } => AppConnectErrorCode::InvalidUrl,
            Self::Serialization(_) => AppConnectErrorCode::Serialization,
            Self::Browser(_) => AppConnectErrorCode::Browser,
            Self::Navigation(_) => AppConnectErrorCode::Navigation,
            Self::Callback(_) => AppConnectErrorCode::Callback,
            Self::InvalidConfig(_) => AppConnectErrorCode::InvalidConfig,
            Self::Internal(_) => AppConnectErrorCode::Internal,
        }
    }

    /// Get the error message as an owned String (useful for FFI).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns true if repeating the operation may succeed.
    ///
    /// Nothing in this crate retries on its own; the flag is for callers
    /// deciding whether to offer a "try again" action.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Storage { code, .. } => matches!(code, StorageErrorCode::Io),
            Self::Random(_) | Self::Browser(_) => true,
            _ => false,
        }
    }

    /// Create an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a callback error from any displayable failure.
    pub fn callback(reason: impl std::fmt::Display) -> Self {
        Self::Callback(reason.to_string())
    }
}

impl From<StorageError> for AppConnectError {
    fn from(err: StorageError) -> Self {
        Self::Storage {
            code: err.code,
            message: err.to_string(),
        }
    }
}

/// Loses the offending input; prefer [`AppConnectError::invalid_url`] when
/// the URL is at hand.
impl From<url::ParseError> for AppConnectError {
    fn from(err: url::ParseError) -> Self {
        Self::invalid_url("", err)
    }
}

impl From<serde_json::Error> for AppConnectError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
