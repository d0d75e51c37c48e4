//! Session initiation.
//!
//! Starting a connection attempt runs these steps strictly in order, each
//! awaited before the next:
//!
//! 1. Save the redirect path, or erase the stale one when none is given
//! 2. Mint a session id from 32 random bytes
//! 3. Persist the session id
//! 4. Merge it into the parameters and build the companion app URL. The
//!    `session-id` query parameter always carries the minted token and is
//!    set last, whatever the parameter bag holds under that key
//! 5. Open the browser
//!
//! The first failing step aborts the attempt. Nothing is rolled back here;
//! [`SessionStores::clear`] is the caller's cleanup.

use url::Url;

use crate::browser::{open_browser, Browser, OpenOptions};
use crate::namespace::SessionStores;
use crate::params::DeepLinkConnectionParams;
use crate::random::{generate_session_id, RandomSource};
use crate::uri::{build_connect_url, camel_to_kebab, params_to_pairs};
use crate::{Result, SessionId, SESSION_ID_KEY};

/// What to connect to.
#[derive(Debug, Clone)]
pub struct ConnectRequest<C> {
    /// Companion app URL.
    pub url: String,
    /// Parameters forwarded on the query string.
    pub params: C,
    /// Route to return to after a successful callback. `None` or an empty
    /// string erases any previously saved path.
    pub redirect_path: Option<String>,
}

impl<C: DeepLinkConnectionParams> ConnectRequest<C> {
    pub fn new(url: impl Into<String>, params: C) -> Self {
        Self {
            url: url.into(),
            params,
            redirect_path: None,
        }
    }

    pub fn with_redirect_path(mut self, path: impl Into<String>) -> Self {
        self.redirect_path = Some(path.into());
        self
    }
}

/// Start a connection attempt and return its session id.
#[tracing::instrument(
    skip(request, stores, random, browser),
    fields(url = %request.url, deep_link_type = request.params.deep_link_type())
)]
pub async fn connect_to_app<C: DeepLinkConnectionParams>(
    request: ConnectRequest<C>,
    stores: &SessionStores,
    random: &dyn RandomSource,
    browser: &dyn Browser,
    options: OpenOptions,
) -> Result<SessionId> {
    match run(request, stores, random, browser, options).await {
        Ok(session_id) => Ok(session_id),
        Err(err) => {
            tracing::error!(error = %err, "failed to connect to app");
            Err(err)
        }
    }
}

async fn run<C: DeepLinkConnectionParams>(
    request: ConnectRequest<C>,
    stores: &SessionStores,
    random: &dyn RandomSource,
    browser: &dyn Browser,
    options: OpenOptions,
) -> Result<SessionId> {
    let ConnectRequest {
        url,
        mut params,
        redirect_path,
    } = request;

    match redirect_path.as_deref().filter(|p| !p.is_empty()) {
        Some(path) => stores.redirect_path.save(path).await?,
        None => stores.redirect_path.remove().await?,
    }

    let session_id = generate_session_id(random).await?;
    stores.session_id.save(session_id.as_str()).await?;

    params.set_session_id(session_id.clone());
    let pairs = with_session_token(params_to_pairs(&params)?, &session_id);
    let app_url: Url = build_connect_url(&url, &pairs)?;

    tracing::debug!(target_url = %app_url, "opening companion app");
    open_browser(browser, app_url.as_str(), options).await?;

    Ok(session_id)
}

/// Drop every pair that would land on the `session-id` query parameter and
/// append the token.
fn with_session_token(
    mut pairs: Vec<(String, String)>,
    session_id: &SessionId,
) -> Vec<(String, String)> {
    let wire_key = camel_to_kebab(SESSION_ID_KEY);
    pairs.retain(|(key, value)| {
        if *key != wire_key {
            return true;
        }
        if value != session_id.as_str() {
            tracing::warn!(key = %key, "ignoring caller-supplied session id parameter");
        }
        false
    });
    pairs.push((wire_key, session_id.as_str().to_string()));
    pairs
}
