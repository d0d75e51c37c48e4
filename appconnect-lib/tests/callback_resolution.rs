//! Callback resolution: dispatch to success/error handlers and the
//! guaranteed finalizer.

mod common;

use std::sync::Arc;

use appconnect_lib::{
    handle_url, resolve_callback, AppConnectError, CallbackHandler, CallbackOutcome,
    CallbackParams, CallbackReport, IgnoredReason, ParamsWithSessionId, Result,
    StringValueStorage,
};
use async_trait::async_trait;
use common::{EffectLog, MockStorage, StorageOp};
use serde::Deserialize;

const KEY: &str = "%2Flogin.sessionId";

struct RecordingHandler {
    log: EffectLog,
    fail_success: bool,
}

impl RecordingHandler {
    fn new(log: &EffectLog) -> Self {
        Self {
            log: log.clone(),
            fail_success: false,
        }
    }

    fn failing(log: &EffectLog) -> Self {
        Self {
            log: log.clone(),
            fail_success: true,
        }
    }
}

#[async_trait]
impl<P: ParamsWithSessionId + 'static> CallbackHandler<P> for RecordingHandler {
    async fn on_success(&self, params: P) -> Result<()> {
        self.log.push(format!("success {}", params.session_id()));
        if self.fail_success {
            return Err(AppConnectError::callback("router unavailable"));
        }
        Ok(())
    }

    async fn on_error(&self, error: AppConnectError) {
        self.log.push(format!("error {:?}", error.code()));
    }

    async fn on_finally(&self) {
        self.log.push("finally");
    }
}

fn session_store(log: &EffectLog) -> (Arc<MockStorage>, StringValueStorage) {
    let storage = Arc::new(MockStorage::new(log.clone()));
    let store = StringValueStorage::new(storage.clone(), KEY);
    (storage, store)
}

#[tokio::test]
async fn test_match_calls_success_then_finally() {
    let log = EffectLog::new();
    let (_storage, store) = session_store(&log);
    store.save("abc").await.unwrap();
    log.clear();

    let report = handle_url::<CallbackParams>(
        "myapp://callback#session-id=abc&delegation=d1",
        &store,
        &RecordingHandler::new(&log),
    )
    .await;

    assert_eq!(report, CallbackReport::Succeeded);
    assert_eq!(
        log.entries(),
        vec![format!("storage.find {}", KEY), "success abc".to_string(), "finally".to_string()]
    );
}

#[tokio::test]
async fn test_no_active_session_is_silent() {
    let log = EffectLog::new();
    let (_storage, store) = session_store(&log);

    let report = handle_url::<CallbackParams>(
        "myapp://callback#session-id=abc",
        &store,
        &RecordingHandler::new(&log),
    )
    .await;

    assert_eq!(report, CallbackReport::Ignored(IgnoredReason::NoActiveSession));
    assert_eq!(
        log.entries(),
        vec![format!("storage.find {}", KEY), "finally".to_string()]
    );
}

#[tokio::test]
async fn test_session_mismatch_is_silent() {
    let log = EffectLog::new();
    let (_storage, store) = session_store(&log);
    store.save("abc").await.unwrap();
    log.clear();

    for url in [
        "myapp://callback#session-id=abd",
        "myapp://callback#session-id=ABC",
        "myapp://callback#session-id=ab",
        "myapp://callback#delegation=d1",
    ] {
        let report =
            handle_url::<CallbackParams>(url, &store, &RecordingHandler::new(&log)).await;
        assert_eq!(report, CallbackReport::Ignored(IgnoredReason::SessionMismatch));
    }

    assert_eq!(log.count("success"), 0);
    assert_eq!(log.count("error"), 0);
    assert_eq!(log.count("finally"), 4);
    assert_eq!(store.find().await.unwrap().as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_empty_fragment_skips_storage() {
    let log = EffectLog::new();
    let (_storage, store) = session_store(&log);

    for url in ["myapp://callback", "myapp://callback#", "https://example.com/?session-id=abc"] {
        let report =
            handle_url::<CallbackParams>(url, &store, &RecordingHandler::new(&log)).await;
        assert_eq!(report, CallbackReport::Ignored(IgnoredReason::NotACallback));
    }

    assert_eq!(log.entries(), vec!["finally", "finally", "finally"]);
}

#[tokio::test]
async fn test_decode_failure_goes_to_error() {
    let log = EffectLog::new();
    let (_storage, store) = session_store(&log);

    let report =
        handle_url::<CallbackParams>("not a url", &store, &RecordingHandler::new(&log)).await;

    assert!(matches!(
        report,
        CallbackReport::Failed(AppConnectError::InvalidUrl { .. })
    ));
    assert_eq!(log.entries(), vec!["error InvalidUrl", "finally"]);
}

#[tokio::test]
async fn test_success_failure_goes_to_error() {
    let log = EffectLog::new();
    let (_storage, store) = session_store(&log);
    store.save("abc").await.unwrap();
    log.clear();

    let report = handle_url::<CallbackParams>(
        "myapp://callback#session-id=abc",
        &store,
        &RecordingHandler::failing(&log),
    )
    .await;

    assert_eq!(
        report,
        CallbackReport::Failed(AppConnectError::Callback("router unavailable".to_string()))
    );
    assert_eq!(
        log.entries(),
        vec![
            format!("storage.find {}", KEY),
            "success abc".to_string(),
            "error Callback".to_string(),
            "finally".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_storage_failure_goes_to_error() {
    let log = EffectLog::new();
    let (storage, store) = session_store(&log);
    storage.fail(StorageOp::Find, KEY);

    let report = handle_url::<CallbackParams>(
        "myapp://callback#session-id=abc",
        &store,
        &RecordingHandler::new(&log),
    )
    .await;

    assert!(matches!(report, CallbackReport::Failed(AppConnectError::Storage { .. })));
    assert_eq!(log.count("error Storage"), 1);
    assert_eq!(log.entries().last().map(String::as_str), Some("finally"));
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DelegationResult {
    session_id: String,
    delegation: String,
}

impl ParamsWithSessionId for DelegationResult {
    fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[tokio::test]
async fn test_typed_params() {
    let log = EffectLog::new();
    let (_storage, store) = session_store(&log);
    store.save("abc").await.unwrap();

    let outcome = resolve_callback::<DelegationResult>(
        "myapp://callback#session-id=abc&delegation=d%3D1",
        &store,
    )
    .await
    .unwrap();
    match outcome {
        CallbackOutcome::Matched(result) => assert_eq!(result.delegation, "d=1"),
        other => panic!("unexpected outcome: {:?}", other),
    }

    // Matched but missing a required field.
    log.clear();
    let report = handle_url::<DelegationResult>(
        "myapp://callback#session-id=abc",
        &store,
        &RecordingHandler::new(&log),
    )
    .await;
    assert!(matches!(
        report,
        CallbackReport::Failed(AppConnectError::Serialization(_))
    ));
    assert_eq!(log.count("success"), 0);
    assert_eq!(log.count("finally"), 1);
}

struct NoFinalizer;

#[async_trait]
impl CallbackHandler<CallbackParams> for NoFinalizer {
    async fn on_success(&self, _params: CallbackParams) -> Result<()> {
        Ok(())
    }

    async fn on_error(&self, _error: AppConnectError) {}
}

#[tokio::test]
async fn test_finalizer_is_optional() {
    let log = EffectLog::new();
    let (_storage, store) = session_store(&log);
    store.save("abc").await.unwrap();

    let report =
        handle_url::<CallbackParams>("myapp://callback#session-id=abc", &store, &NoFinalizer).await;
    assert!(report.is_success());
}
