//! App-to-app connect library.
//!
//! An application opens a companion application (typically an identity
//! provider) in a browser, the companion performs some action and redirects
//! back through a deep link carrying a result. This crate correlates the two
//! halves of that round trip with a per-attempt session id and guarantees the
//! session state is cleaned up once a callback arrives.
//!
//! Platform concerns (storage, randomness, browser, router, deep-link events)
//! are injected through traits so the same protocol runs on mobile, web and
//! desktop hosts.
//!
//! # Features
//!
//! - **Session Initiator**: [`connect_to_app`] mints a session id, persists it and
//!   opens the companion app with the id on the query string
//! - **Callback Resolver**: [`resolve_callback`] / [`handle_url`] match an inbound
//!   deep link against the stored session id
//! - **Orchestrator**: [`AppConnect`] binds both to a storage namespace and a
//!   deep-link event source
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use appconnect_lib::{AppConnect, CallbackParams, ConnectionParams, InMemoryStorage};
//!
//! let connect: AppConnect<CallbackParams> = AppConnect::builder("/login")
//!     .storage(Arc::new(InMemoryStorage::new()))
//!     .browser(browser)
//!     .navigator(navigator)
//!     .build()?;
//!
//! let session_id = connect
//!     .connect_to_app(
//!         "https://id.example.com",
//!         ConnectionParams::new("icp"),
//!         Some("/home".to_string()),
//!     )
//!     .await?;
//!
//! // Later, when the deep link comes back:
//! connect.handle_url("myapp://callback#session-id=...").await;
//! ```

pub mod browser;
pub mod config;
pub mod connect;
pub mod errors;
pub mod events;
pub mod initiator;
pub mod namespace;
pub mod navigation;
pub mod params;
pub mod prelude;
pub mod random;
pub mod resolver;
pub mod storage;
pub mod uri;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use browser::{open_browser, Browser, OpenOptions, WindowTarget};
pub use config::{AppConnectConfig, NamespaceKind};
pub use connect::{AppConnect, AppConnectBuilder};
pub use errors::{AppConnectError, AppConnectErrorCode};
pub use events::{LinkEventSource, LinkSubscription};
pub use initiator::{connect_to_app, ConnectRequest};
pub use namespace::{
    NamespaceStrategy, PathnameNamespace, SessionStores, StorageNamespace, VerbatimNamespace,
};
pub use navigation::Navigator;
pub use params::{CallbackParams, ConnectionParams, DeepLinkConnectionParams, ParamsWithSessionId};
pub use random::{generate_session_id, OsRandomSource, RandomSource};
pub use resolver::{
    handle_url, resolve_callback, CallbackHandler, CallbackOutcome, CallbackReport, IgnoredReason,
};
pub use storage::{
    FileStorage, InMemoryStorage, KeyValueStorage, StorageError, StorageErrorCode,
    StorageResult, StringValueStorage,
};

#[cfg(not(target_arch = "wasm32"))]
pub use events::ListenerHandle;
#[cfg(target_arch = "wasm32")]
pub use web::{WebBrowser, WebLocalStorage, WebNavigator};

/// Common result alias for app-connect operations.
pub type Result<T> = std::result::Result<T, AppConnectError>;

/// Reserved parameter key carrying the session id (camel-case form).
///
/// On the wire it is rewritten to `session-id`.
pub const SESSION_ID_KEY: &str = "sessionId";

/// Number of random bytes behind every session id.
pub const SESSION_ID_BYTES: usize = 32;

/// Opaque per-attempt correlation token.
///
/// The hex encoding of [`SESSION_ID_BYTES`] random bytes. Two ids are equal
/// only when their strings are byte-for-byte equal.
///
/// # Example
///
/// ```
/// use appconnect_lib::SessionId;
///
/// let id = SessionId::new("010203");
/// assert_eq!(id.as_str(), "010203");
/// assert_eq!(id, SessionId::from("010203"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Create a session id from its string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the session id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
