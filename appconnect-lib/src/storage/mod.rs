//! String key-value storage used to persist session state.
//!
//! The protocol keeps two entries per namespace (the session id and the
//! optional redirect path). Hosts plug in whatever persistent store survives
//! the app being backgrounded while the companion app is open:
//! - In-memory storage (for testing)
//! - A JSON file (desktop, CLI)
//! - `window.localStorage` (web, wasm32 only)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use appconnect_lib::storage::{InMemoryStorage, StringValueStorage};
//!
//! let storage = Arc::new(InMemoryStorage::new());
//! let session = StringValueStorage::new(storage, "login.sessionId");
//!
//! session.save("abcd").await?;
//! assert_eq!(session.find().await?.as_deref(), Some("abcd"));
//! session.remove().await?;
//! ```

mod file;
mod memory;
mod traits;
mod value;

pub use file::FileStorage;
pub use memory::InMemoryStorage;
pub use traits::{KeyValueStorage, StorageError, StorageErrorCode, StorageResult};
pub use value::StringValueStorage;

#[cfg(target_arch = "wasm32")]
pub use crate::web::WebLocalStorage;
