//! Callback resolution.
//!
//! An inbound deep link is accepted only when its fragment carries the
//! session id currently stored for the namespace. Resolution runs:
//!
//! 1. Decode the fragment. An empty fragment is not a callback for this
//!    protocol and nothing else happens, not even a storage read.
//! 2. Load the stored session id. None stored means there is no active
//!    session (already consumed, or the app restarted).
//! 3. Compare with exact string equality. A fragment without `sessionId`
//!    never matches.
//! 4. Decode the matched mapping into the caller's parameter type.
//!
//! Steps 2 and 3 ending early are expected races (duplicate or late
//! callbacks), so they are logged and reported as outcomes, not errors.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::params::ParamsWithSessionId;
use crate::storage::StringValueStorage;
use crate::uri::parse_fragment_params;
use crate::{AppConnectError, Result, SESSION_ID_KEY};

/// Result of matching one inbound URL against the stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome<P> {
    /// The session ids match.
    Matched(P),
    /// The URL has no fragment parameters.
    NotACallback,
    /// No session id is stored.
    NoActiveSession,
    /// The fragment's session id differs from the stored one.
    SessionMismatch,
}

/// Why a callback was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    NotACallback,
    NoActiveSession,
    SessionMismatch,
}

impl std::fmt::Display for IgnoredReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            IgnoredReason::NotACallback => "not a callback",
            IgnoredReason::NoActiveSession => "no active session",
            IgnoredReason::SessionMismatch => "session id mismatch",
        };
        f.write_str(text)
    }
}

/// What [`handle_url`] did with a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackReport {
    /// `on_success` ran and returned `Ok`.
    Succeeded,
    /// Neither `on_success` nor `on_error` ran.
    Ignored(IgnoredReason),
    /// `on_error` ran with this error.
    Failed(AppConnectError),
}

impl CallbackReport {
    pub fn is_success(&self) -> bool {
        matches!(self, CallbackReport::Succeeded)
    }
}

/// Receives the result of [`handle_url`].
#[async_trait]
pub trait CallbackHandler<P: Send + 'static>: Send + Sync {
    /// Called once with the matched parameters. An error is routed to
    /// [`on_error`](CallbackHandler::on_error).
    async fn on_success(&self, params: P) -> Result<()>;

    /// Called when decoding or `on_success` fails.
    async fn on_error(&self, error: AppConnectError);

    /// Called exactly once, last, on every path.
    async fn on_finally(&self) {}
}

/// Match `url` against the session id stored in `session_store`.
///
/// Returns `Err` when the URL cannot be parsed, storage fails, or the matched
/// parameters do not decode into `P`.
pub async fn resolve_callback<P: ParamsWithSessionId>(
    url: &str,
    session_store: &StringValueStorage,
) -> Result<CallbackOutcome<P>> {
    let params = parse_fragment_params(url)?;
    if params.is_empty() {
        return Ok(CallbackOutcome::NotACallback);
    }

    let Some(stored) = session_store.find().await? else {
        tracing::info!(key = session_store.key(), "no session id found");
        return Ok(CallbackOutcome::NoActiveSession);
    };

    if params.get(SESSION_ID_KEY) != Some(&stored) {
        tracing::debug!(
            stored = %stored,
            received = params.get(SESSION_ID_KEY).map(String::as_str).unwrap_or("<none>"),
            "comparing session ids"
        );
        tracing::warn!(key = session_store.key(), "session id mismatch");
        return Ok(CallbackOutcome::SessionMismatch);
    }

    decode_params(params).map(CallbackOutcome::Matched)
}

fn decode_params<P: ParamsWithSessionId>(params: BTreeMap<String, String>) -> Result<P> {
    let value = serde_json::to_value(params)?;
    Ok(serde_json::from_value(value)?)
}

/// Resolve `url` and dispatch the outcome to `handler`.
///
/// `on_finally` always runs exactly once, after `on_success` / `on_error`.
#[tracing::instrument(skip_all, fields(key = session_store.key()))]
pub async fn handle_url<P>(
    url: &str,
    session_store: &StringValueStorage,
    handler: &dyn CallbackHandler<P>,
) -> CallbackReport
where
    P: ParamsWithSessionId + 'static,
{
    let report = match resolve_callback::<P>(url, session_store).await {
        Ok(CallbackOutcome::Matched(params)) => match handler.on_success(params).await {
            Ok(()) => CallbackReport::Succeeded,
            Err(err) => fail(handler, err).await,
        },
        Ok(CallbackOutcome::NotACallback) => CallbackReport::Ignored(IgnoredReason::NotACallback),
        Ok(CallbackOutcome::NoActiveSession) => {
            CallbackReport::Ignored(IgnoredReason::NoActiveSession)
        }
        Ok(CallbackOutcome::SessionMismatch) => {
            CallbackReport::Ignored(IgnoredReason::SessionMismatch)
        }
        Err(err) => fail(handler, err).await,
    };

    handler.on_finally().await;
    report
}

async fn fail<P: Send + 'static>(
    handler: &dyn CallbackHandler<P>,
    err: AppConnectError,
) -> CallbackReport {
    tracing::error!(error = %err, "failed to handle URL");
    handler.on_error(err.clone()).await;
    CallbackReport::Failed(err)
}
