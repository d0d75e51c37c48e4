//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use appconnect_lib::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - Orchestrator: `AppConnect`, `AppConnectBuilder`, `AppConnectConfig`
//! - Error types: `AppConnectError`, `AppConnectErrorCode`, `Result`
//! - Parameter bags and their capability traits
//! - Host collaborator traits: `KeyValueStorage`, `Browser`, `Navigator`, `RandomSource`
//! - Deep-link events: `LinkEventSource`

// Core types
pub use crate::{SessionId, SESSION_ID_KEY};

// Error handling
pub use crate::errors::{AppConnectError, AppConnectErrorCode};
pub use crate::Result;

// Orchestration
pub use crate::config::{AppConnectConfig, NamespaceKind};
pub use crate::connect::{AppConnect, AppConnectBuilder};
pub use crate::events::{LinkEventSource, LinkSubscription};
pub use crate::resolver::{CallbackHandler, CallbackOutcome, CallbackReport, IgnoredReason};

// Parameters
pub use crate::params::{
    CallbackParams, ConnectionParams, DeepLinkConnectionParams, ParamsWithSessionId,
};

// Host collaborators
pub use crate::browser::{Browser, OpenOptions, WindowTarget};
pub use crate::navigation::Navigator;
pub use crate::random::{OsRandomSource, RandomSource};
pub use crate::storage::{FileStorage, InMemoryStorage, KeyValueStorage};
