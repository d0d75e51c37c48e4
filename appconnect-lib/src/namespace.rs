//! Storage namespace derivation.
//!
//! Each [`AppConnect`](crate::AppConnect) scopes its two storage entries under
//! a prefix derived from a caller identifier (a route path or a target app
//! name). How that prefix is derived is pluggable through
//! [`NamespaceStrategy`].

use std::fmt;
use std::sync::Arc;

use crate::storage::{KeyValueStorage, StorageResult, StringValueStorage};

/// Storage key suffix of the session id entry.
pub const SESSION_ID_SUFFIX: &str = "sessionId";

/// Storage key suffix of the redirect path entry.
pub const REDIRECT_PATH_SUFFIX: &str = "redirectPath";

/// Derives a storage namespace from a caller identifier.
///
/// Must be deterministic. Callers that pass the same identifier (or two
/// identifiers mapping to the same namespace) share one session.
pub trait NamespaceStrategy: Send + Sync {
    fn derive(&self, identifier: &str) -> String;
}

/// Uses the identifier unchanged, e.g. a target app name.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimNamespace;

impl NamespaceStrategy for VerbatimNamespace {
    fn derive(&self, identifier: &str) -> String {
        identifier.to_string()
    }
}

/// Escapes a route pathname into a storage-key safe namespace.
///
/// `%`, `/` and `.` are percent-escaped, so the result never contains a key
/// separator and distinct paths never collide. Every other character,
/// whitespace included, is kept as is.
///
/// ```
/// use appconnect_lib::{NamespaceStrategy, PathnameNamespace};
///
/// assert_eq!(PathnameNamespace.derive("/auth/login"), "%2Fauth%2Flogin");
/// assert_ne!(PathnameNamespace.derive(""), PathnameNamespace.derive("/"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PathnameNamespace;

impl NamespaceStrategy for PathnameNamespace {
    fn derive(&self, identifier: &str) -> String {
        let mut out = String::with_capacity(identifier.len() + 8);
        for c in identifier.chars() {
            match c {
                '%' => out.push_str("%25"),
                '/' => out.push_str("%2F"),
                '.' => out.push_str("%2E"),
                other => out.push(other),
            }
        }
        out
    }
}

/// A derived storage key prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageNamespace(String);

impl StorageNamespace {
    /// Derive the namespace of `identifier` with `strategy`.
    pub fn derive(identifier: &str, strategy: &dyn NamespaceStrategy) -> Self {
        Self(strategy.derive(identifier))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full storage key for `suffix` within this namespace.
    pub fn key(&self, suffix: &str) -> String {
        format!("{}.{}", self.0, suffix)
    }

    pub fn session_id_key(&self) -> String {
        self.key(SESSION_ID_SUFFIX)
    }

    pub fn redirect_path_key(&self) -> String {
        self.key(REDIRECT_PATH_SUFFIX)
    }

    /// Bind the session id and redirect path entries of this namespace.
    pub fn stores(&self, storage: Arc<dyn KeyValueStorage>) -> SessionStores {
        SessionStores {
            session_id: StringValueStorage::new(storage.clone(), self.session_id_key()),
            redirect_path: StringValueStorage::new(storage, self.redirect_path_key()),
        }
    }
}

impl fmt::Display for StorageNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two storage entries of one namespace.
#[derive(Debug, Clone)]
pub struct SessionStores {
    pub session_id: StringValueStorage,
    pub redirect_path: StringValueStorage,
}

impl SessionStores {
    /// Remove both entries.
    ///
    /// Idempotent: clearing an already empty namespace succeeds. Both removals
    /// are attempted; the first failure is returned.
    pub async fn clear(&self) -> StorageResult<()> {
        let session = self.session_id.remove().await;
        let redirect = self.redirect_path.remove().await;
        session.and(redirect)
    }
}
