//! Deep-link event source.
//!
//! The host forwards every URL the app is opened with (cold start or while
//! running) to one process-wide [`LinkEventSource`]. Each orchestrator holds
//! a single [`LinkSubscription`] for its lifetime.
//!
//! Subscriptions observe the latest URL, not a queue: if several URLs are
//! published before a subscriber polls, it sees only the last one. Publishing
//! the URL that is already current is not an event.

use std::sync::Arc;

use tokio::sync::watch;

/// Process-wide source of inbound deep-link URLs. Clones share the channel.
#[derive(Clone)]
pub struct LinkEventSource {
    tx: Arc<watch::Sender<Option<String>>>,
}

impl LinkEventSource {
    /// Create a source with no current URL.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Create a source whose current URL is the one the app was launched with.
    pub fn with_initial_url(url: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(Some(url.into()));
        Self { tx: Arc::new(tx) }
    }

    /// Publish a new inbound URL.
    ///
    /// Returns `false`, notifying nobody, when `url` equals the current URL.
    pub fn publish(&self, url: impl Into<String>) -> bool {
        let url = url.into();
        let published = self.tx.send_if_modified(|current| {
            if current.as_deref() == Some(url.as_str()) {
                return false;
            }
            *current = Some(url);
            true
        });
        if !published {
            tracing::trace!("ignoring repeated deep link");
        }
        published
    }

    /// The most recently published URL.
    pub fn current(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    /// Subscribe to new URLs. The current URL, if any, is delivered first.
    pub fn subscribe(&self) -> LinkSubscription {
        let rx = self.tx.subscribe();
        let pending = rx.borrow().clone();
        LinkSubscription { rx, pending }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for LinkEventSource {
    fn default() -> Self {
        Self::new()
    }
}

/// One subscriber's view of a [`LinkEventSource`].
pub struct LinkSubscription {
    rx: watch::Receiver<Option<String>>,
    pending: Option<String>,
}

impl LinkSubscription {
    /// Wait for the next URL. Returns `None` once every handle to the source
    /// has been dropped.
    pub async fn next(&mut self) -> Option<String> {
        if let Some(url) = self.pending.take() {
            return Some(url);
        }
        loop {
            self.rx.changed().await.ok()?;
            if let Some(url) = self.rx.borrow_and_update().clone() {
                return Some(url);
            }
        }
    }
}

/// Running listener task. Dropping the handle stops the task and releases
/// its subscription.
#[cfg(not(target_arch = "wasm32"))]
pub struct ListenerHandle {
    task: tokio::task::JoinHandle<()>,
}

#[cfg(not(target_arch = "wasm32"))]
impl ListenerHandle {
    pub(crate) fn new(task: tokio::task::JoinHandle<()>) -> Self {
        Self { task }
    }

    /// True once the source was dropped and the listener returned.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn abort(&self) {
        self.task.abort();
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
