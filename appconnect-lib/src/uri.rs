//! URL helpers for the connect round trip.
//!
//! Outbound parameters travel on the query string of the companion app URL
//! with kebab-case keys. The companion answers with a deep link whose
//! fragment carries the result parameters, again kebab-case on the wire:
//!
//! ```text
//! https://id.example.com/?deep-link-type=icp&session-id=8f3a...
//! myapp://callback#session-id=8f3a...&delegation=...
//! ```
//!
//! # Examples
//!
//! ```rust
//! use appconnect_lib::uri::{build_connect_url, parse_fragment_params};
//!
//! let pairs = vec![
//!     ("deep-link-type".to_string(), "icp".to_string()),
//!     ("session-id".to_string(), "010203".to_string()),
//! ];
//! let url = build_connect_url("https://example.com", &pairs)?;
//! assert_eq!(url.as_str(), "https://example.com/?deep-link-type=icp&session-id=010203");
//!
//! let params = parse_fragment_params("myapp://cb#session-id=010203")?;
//! assert_eq!(params.get("sessionId").map(String::as_str), Some("010203"));
//! # Ok::<(), appconnect_lib::AppConnectError>(())
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::{AppConnectError, Result};

/// Convert a camel-case key to its kebab-case wire form.
///
/// A hyphen is inserted between a lower-case letter or digit and a following
/// upper-case letter, then everything is lower-cased. Underscores also become
/// hyphens so snake-case field names reach the wire in the same shape.
///
/// ```
/// use appconnect_lib::uri::camel_to_kebab;
///
/// assert_eq!(camel_to_kebab("deepLinkType"), "deep-link-type");
/// assert_eq!(camel_to_kebab("sessionId"), "session-id");
/// assert_eq!(camel_to_kebab("redirect_uri"), "redirect-uri");
/// ```
pub fn camel_to_kebab(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    for c in key.chars() {
        if c == '_' {
            out.push('-');
        } else {
            if c.is_ascii_uppercase()
                && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
            {
                out.push('-');
            }
            out.push(c);
        }
        prev = Some(c);
    }
    out.to_lowercase()
}

/// Convert a kebab-case wire key back to camel-case.
///
/// ```
/// use appconnect_lib::uri::kebab_to_camel;
///
/// assert_eq!(kebab_to_camel("session-id"), "sessionId");
/// assert_eq!(kebab_to_camel("delegation"), "delegation");
/// ```
pub fn kebab_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('-', Some(next)) if next.is_ascii_alphanumeric() => {
                let next = *next;
                chars.next();
                out.push(next.to_ascii_uppercase());
            }
            _ => out.push(c),
        }
    }
    out
}

/// Serialize a parameter bag into `(kebab-key, value)` pairs, in field order.
///
/// Strings are sent verbatim, numbers and booleans in their display form,
/// nested arrays and objects as compact JSON. `null` fields are omitted.
pub fn params_to_pairs<T: Serialize + ?Sized>(params: &T) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(params)?;
    let Value::Object(map) = value else {
        return Err(AppConnectError::Serialization(
            "connection parameters must serialize to an object".to_string(),
        ));
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        let value = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            nested @ (Value::Array(_) | Value::Object(_)) => serde_json::to_string(&nested)?,
        };
        pairs.push((camel_to_kebab(&key), value));
    }
    Ok(pairs)
}

/// Parse `base` and set each pair on its query string.
///
/// Setting a key already present in `base` replaces its value (and drops any
/// duplicates of it); new keys are appended in order.
pub fn build_connect_url(base: &str, pairs: &[(String, String)]) -> Result<Url> {
    let mut url = Url::parse(base).map_err(|e| AppConnectError::invalid_url(base, e))?;

    let mut query: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    for (key, value) in pairs {
        match query.iter().position(|(k, _)| k == key) {
            Some(first) => {
                query[first].1 = value.clone();
                let mut index = 0;
                query.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => query.push((key.clone(), value.clone())),
        }
    }

    if query.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(query.iter());
    }
    Ok(url)
}

/// Decode the fragment of `url` into camel-case result parameters.
///
/// A URL without a fragment, or with an empty one, yields an empty map.
/// Fails only when `url` itself cannot be parsed.
pub fn parse_fragment_params(url: &str) -> Result<BTreeMap<String, String>> {
    let parsed = Url::parse(url).map_err(|e| AppConnectError::invalid_url(url, e))?;
    let fragment = parsed.fragment().unwrap_or_default();

    Ok(url::form_urlencoded::parse(fragment.as_bytes())
        .map(|(k, v)| (kebab_to_camel(&k), v.into_owned()))
        .collect())
}
