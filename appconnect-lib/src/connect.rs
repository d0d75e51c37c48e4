//! Connection orchestrator.
//!
//! [`AppConnect`] binds the initiator and resolver to one storage namespace
//! and runs a full callback cycle for every inbound deep link:
//!
//! - on a match: record the result parameters, navigate to the saved redirect
//!   path (if any), dismiss the browser
//! - on an error: record the error
//! - always: erase the session id and redirect path of the namespace
//!
//! The recorded error stays until [`AppConnect::clear_error`] is called.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::browser::{Browser, OpenOptions};
use crate::config::AppConnectConfig;
use crate::events::LinkSubscription;
use crate::initiator::{self, ConnectRequest};
use crate::namespace::{NamespaceStrategy, PathnameNamespace, SessionStores, StorageNamespace};
use crate::navigation::Navigator;
use crate::params::{DeepLinkConnectionParams, ParamsWithSessionId};
use crate::random::{OsRandomSource, RandomSource};
use crate::resolver::{self, CallbackHandler, CallbackReport};
use crate::storage::KeyValueStorage;
use crate::{AppConnectError, Result, SessionId};

#[cfg(not(target_arch = "wasm32"))]
use crate::events::{LinkEventSource, ListenerHandle};

struct ConnectState<P> {
    result_params: Option<P>,
    error: Option<AppConnectError>,
}

/// App-to-app connect orchestrator for one namespace.
pub struct AppConnect<P> {
    identifier: String,
    namespace: StorageNamespace,
    stores: SessionStores,
    random: Arc<dyn RandomSource>,
    browser: Arc<dyn Browser>,
    navigator: Arc<dyn Navigator>,
    open_options: OpenOptions,
    state: RwLock<ConnectState<P>>,
}

impl<P: ParamsWithSessionId + 'static> AppConnect<P> {
    /// Start building an orchestrator for `identifier` (usually the current
    /// route path).
    pub fn builder(identifier: impl Into<String>) -> AppConnectBuilder<P> {
        AppConnectBuilder::new(identifier)
    }

    /// Build an orchestrator from serialized settings and host collaborators.
    pub fn from_config(
        config: &AppConnectConfig,
        storage: Arc<dyn KeyValueStorage>,
        browser: Arc<dyn Browser>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        config.validate()?;
        Self::builder(config.identifier.clone())
            .namespace_strategy(config.namespace.strategy())
            .open_options(OpenOptions {
                in_new_tab: config.open_in_new_tab,
            })
            .storage(storage)
            .browser(browser)
            .navigator(navigator)
            .build()
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn namespace(&self) -> &StorageNamespace {
        &self.namespace
    }

    pub fn stores(&self) -> &SessionStores {
        &self.stores
    }

    /// Parameters of the last successful callback.
    pub fn result_params(&self) -> Option<P> {
        self.read_state().result_params.clone()
    }

    /// Last error recorded by a callback cycle.
    pub fn error(&self) -> Option<AppConnectError> {
        self.read_state().error.clone()
    }

    /// Forget the recorded error.
    pub fn clear_error(&self) {
        self.write_state().error = None;
    }

    /// Start a connection attempt. See [`initiator::connect_to_app`].
    pub async fn connect_to_app<C: DeepLinkConnectionParams>(
        &self,
        url: &str,
        params: C,
        redirect_path: Option<String>,
    ) -> Result<SessionId> {
        let request = ConnectRequest {
            url: url.to_string(),
            params,
            redirect_path,
        };
        initiator::connect_to_app(
            request,
            &self.stores,
            self.random.as_ref(),
            self.browser.as_ref(),
            self.open_options,
        )
        .await
    }

    /// Run one callback cycle for an inbound URL.
    pub async fn handle_url(&self, url: &str) -> CallbackReport {
        let cycle = Cycle { connect: self };
        resolver::handle_url::<P>(url, &self.stores.session_id, &cycle).await
    }

    /// Erase this namespace's session id and redirect path. Idempotent.
    pub async fn clear_session(&self) -> Result<()> {
        Ok(self.stores.clear().await?)
    }

    /// Process deep links from `subscription` one at a time until the event
    /// source is dropped.
    pub async fn listen(self: Arc<Self>, mut subscription: LinkSubscription) {
        while let Some(url) = subscription.next().await {
            let report = self.handle_url(&url).await;
            tracing::debug!(namespace = %self.namespace, ?report, "callback cycle finished");
        }
        tracing::debug!(namespace = %self.namespace, "link event source closed");
    }

    /// Subscribe to `source` and run [`listen`](Self::listen) on the tokio
    /// runtime. Dropping the returned handle unsubscribes.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn spawn_listener(self: &Arc<Self>, source: &LinkEventSource) -> ListenerHandle {
        let subscription = source.subscribe();
        ListenerHandle::new(tokio::spawn(Arc::clone(self).listen(subscription)))
    }

    fn record_success(&self, params: P) {
        self.write_state().result_params = Some(params);
    }

    fn record_error(&self, error: AppConnectError) {
        self.write_state().error = Some(error);
    }

    // State is plain data; a panic while holding the lock cannot leave it
    // half-updated, so poisoning is ignored.
    fn read_state(&self) -> RwLockReadGuard<'_, ConnectState<P>> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ConnectState<P>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

struct Cycle<'a, P> {
    connect: &'a AppConnect<P>,
}

#[async_trait]
impl<'a, P: ParamsWithSessionId + 'static> CallbackHandler<P> for Cycle<'a, P> {
    async fn on_success(&self, params: P) -> Result<()> {
        let connect = self.connect;
        connect.record_success(params);

        if let Some(path) = connect.stores.redirect_path.find().await? {
            connect.navigator.replace(&path).await?;
        }
        connect.browser.dismiss().await
    }

    async fn on_error(&self, error: AppConnectError) {
        self.connect.record_error(error);
    }

    async fn on_finally(&self) {
        if let Err(err) = self.connect.stores.clear().await {
            tracing::error!(namespace = %self.connect.namespace, error = %err, "failed to clear session");
            self.connect.record_error(err.into());
        }
    }
}

/// Builder for [`AppConnect`].
pub struct AppConnectBuilder<P> {
    identifier: String,
    storage: Option<Arc<dyn KeyValueStorage>>,
    browser: Option<Arc<dyn Browser>>,
    navigator: Option<Arc<dyn Navigator>>,
    random: Arc<dyn RandomSource>,
    strategy: Arc<dyn NamespaceStrategy>,
    open_options: OpenOptions,
    _params: std::marker::PhantomData<fn() -> P>,
}

impl<P: ParamsWithSessionId + 'static> AppConnectBuilder<P> {
    fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            storage: None,
            browser: None,
            navigator: None,
            random: Arc::new(OsRandomSource),
            strategy: Arc::new(PathnameNamespace),
            open_options: OpenOptions::default(),
            _params: std::marker::PhantomData,
        }
    }

    pub fn storage(mut self, storage: Arc<dyn KeyValueStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn browser(mut self, browser: Arc<dyn Browser>) -> Self {
        self.browser = Some(browser);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Defaults to [`OsRandomSource`].
    pub fn random_source(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Defaults to [`PathnameNamespace`].
    pub fn namespace_strategy(mut self, strategy: Arc<dyn NamespaceStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn open_options(mut self, options: OpenOptions) -> Self {
        self.open_options = options;
        self
    }

    pub fn build(self) -> Result<AppConnect<P>> {
        let storage = self
            .storage
            .ok_or_else(|| AppConnectError::InvalidConfig("storage is required".to_string()))?;
        let browser = self
            .browser
            .ok_or_else(|| AppConnectError::InvalidConfig("browser is required".to_string()))?;
        let navigator = self
            .navigator
            .ok_or_else(|| AppConnectError::InvalidConfig("navigator is required".to_string()))?;

        let namespace = StorageNamespace::derive(&self.identifier, self.strategy.as_ref());
        let stores = namespace.stores(storage);
        tracing::debug!(identifier = %self.identifier, %namespace, "app connect ready");

        Ok(AppConnect {
            identifier: self.identifier,
            namespace,
            stores,
            random: self.random,
            browser,
            navigator,
            open_options: self.open_options,
            state: RwLock::new(ConnectState {
                result_params: None,
                error: None,
            }),
        })
    }
}
