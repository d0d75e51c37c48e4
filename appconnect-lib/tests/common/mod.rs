//! Common test utilities for appconnect-lib integration tests.
//!
//! Every mock appends to a shared [`EffectLog`] so tests can assert on the
//! exact order of side effects across collaborators.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use appconnect_lib::{
    AppConnect, AppConnectError, Browser, CallbackParams, InMemoryStorage, KeyValueStorage,
    Navigator, RandomSource, Result, StorageError, StorageResult, WindowTarget,
};
use async_trait::async_trait;

/// Ordered record of side effects.
#[derive(Clone, Default)]
pub struct EffectLog(Arc<Mutex<Vec<String>>>);

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Index of the first entry starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.entries().iter().position(|e| e.starts_with(prefix))
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.position(prefix).is_some()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.entries().iter().filter(|e| e.starts_with(prefix)).count()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageOp {
    Find,
    Save,
    Remove,
}

/// In-memory storage that logs every call and fails on demand.
pub struct MockStorage {
    inner: InMemoryStorage,
    log: EffectLog,
    failures: Mutex<HashSet<(StorageOp, String)>>,
}

impl MockStorage {
    pub fn new(log: EffectLog) -> Self {
        Self {
            inner: InMemoryStorage::new(),
            log,
            failures: Mutex::new(HashSet::new()),
        }
    }

    /// Make `op` on `key` fail until [`MockStorage::heal`] is called.
    pub fn fail(&self, op: StorageOp, key: &str) {
        self.failures.lock().unwrap().insert((op, key.to_string()));
    }

    pub fn heal(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub fn inner(&self) -> &InMemoryStorage {
        &self.inner
    }

    fn check(&self, op: StorageOp, key: &str) -> StorageResult<()> {
        if self.failures.lock().unwrap().contains(&(op, key.to_string())) {
            return Err(StorageError::io(format!("{:?} {} failed", op, key)));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for MockStorage {
    async fn find(&self, key: &str) -> StorageResult<Option<String>> {
        self.log.push(format!("storage.find {}", key));
        self.check(StorageOp::Find, key)?;
        self.inner.find(key).await
    }

    async fn save(&self, key: &str, value: &str) -> StorageResult<()> {
        self.log.push(format!("storage.save {}={}", key, value));
        self.check(StorageOp::Save, key)?;
        self.inner.save(key, value).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.log.push(format!("storage.remove {}", key));
        self.check(StorageOp::Remove, key)?;
        self.inner.remove(key).await
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        self.inner.keys().await
    }
}

/// Deterministic random source: byte `i` is `i`.
pub struct FixedRandom {
    log: EffectLog,
    pub fail: AtomicBool,
}

/// Session id produced by [`FixedRandom`].
pub fn fixed_session_id() -> String {
    hex::encode((0u8..32).collect::<Vec<_>>())
}

impl FixedRandom {
    pub fn new(log: EffectLog) -> Self {
        Self {
            log,
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl RandomSource for FixedRandom {
    async fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
        self.log.push(format!("random {}", len));
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppConnectError::Random("entropy unavailable".to_string()));
        }
        Ok((0..len).map(|i| i as u8).collect())
    }
}

pub struct RecordingBrowser {
    log: EffectLog,
    pub web: bool,
    pub fail_open: AtomicBool,
    pub fail_dismiss: AtomicBool,
}

impl RecordingBrowser {
    pub fn new(log: EffectLog) -> Self {
        Self {
            log,
            web: false,
            fail_open: AtomicBool::new(false),
            fail_dismiss: AtomicBool::new(false),
        }
    }

    pub fn web(log: EffectLog) -> Self {
        Self {
            web: true,
            ..Self::new(log)
        }
    }
}

#[async_trait]
impl Browser for RecordingBrowser {
    async fn open(&self, url: &str, target: WindowTarget) -> Result<()> {
        self.log.push(format!("browser.open {} {}", target, url));
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(AppConnectError::Browser("popup blocked".to_string()));
        }
        Ok(())
    }

    async fn dismiss(&self) -> Result<()> {
        self.log.push("browser.dismiss");
        if self.fail_dismiss.load(Ordering::SeqCst) {
            return Err(AppConnectError::Browser("nothing to dismiss".to_string()));
        }
        Ok(())
    }

    fn supports_new_tab(&self) -> bool {
        self.web
    }
}

pub struct RecordingNavigator {
    log: EffectLog,
    pub fail: AtomicBool,
}

impl RecordingNavigator {
    pub fn new(log: EffectLog) -> Self {
        Self {
            log,
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn replace(&self, path: &str) -> Result<()> {
        self.log.push(format!("navigator.replace {}", path));
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppConnectError::Navigation("route not found".to_string()));
        }
        Ok(())
    }
}

/// An orchestrator wired to mocks that share one effect log.
pub struct Harness {
    pub log: EffectLog,
    pub storage: Arc<MockStorage>,
    pub random: Arc<FixedRandom>,
    pub browser: Arc<RecordingBrowser>,
    pub navigator: Arc<RecordingNavigator>,
    pub connect: Arc<AppConnect<CallbackParams>>,
}

impl Harness {
    pub fn new(identifier: &str) -> Self {
        let log = EffectLog::new();
        Self::with_storage(identifier, log.clone(), Arc::new(MockStorage::new(log)))
    }

    /// Build a second orchestrator on an existing store.
    pub fn with_storage(identifier: &str, log: EffectLog, storage: Arc<MockStorage>) -> Self {
        let random = Arc::new(FixedRandom::new(log.clone()));
        let browser = Arc::new(RecordingBrowser::new(log.clone()));
        let navigator = Arc::new(RecordingNavigator::new(log.clone()));

        let connect = AppConnect::<CallbackParams>::builder(identifier)
            .storage(storage.clone())
            .random_source(random.clone())
            .browser(browser.clone())
            .navigator(navigator.clone())
            .build()
            .unwrap();

        Self {
            log,
            storage,
            random,
            browser,
            navigator,
            connect: Arc::new(connect),
        }
    }

    pub fn session_key(&self) -> String {
        self.connect.namespace().session_id_key()
    }

    pub fn redirect_key(&self) -> String {
        self.connect.namespace().redirect_path_key()
    }

    pub async fn stored_session(&self) -> Option<String> {
        self.storage.inner().find(&self.session_key()).await.unwrap()
    }

    pub async fn stored_redirect(&self) -> Option<String> {
        self.storage.inner().find(&self.redirect_key()).await.unwrap()
    }
}
