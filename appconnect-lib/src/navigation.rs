//! Router navigation.

use async_trait::async_trait;

use crate::Result;

/// Host router. Used to move to the saved redirect path after a successful
/// callback.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Replace the current route with `path` (no new history entry).
    async fn replace(&self, path: &str) -> Result<()>;
}
