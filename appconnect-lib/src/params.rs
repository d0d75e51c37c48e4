//! Parameter bags exchanged with the companion app.
//!
//! The protocol only needs two capabilities from caller types: outbound
//! parameters name a deep-link type and accept the session id, inbound
//! parameters expose the session id they carry. Callers may bring their own
//! serde types or use [`ConnectionParams`] / [`CallbackParams`].

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SessionId;

/// Outbound parameters sent on the companion app's query string.
///
/// Field names are serialized camel-case and rewritten to kebab-case on the
/// wire, so a `#[serde(rename_all = "camelCase")]` struct is the usual shape.
pub trait DeepLinkConnectionParams: Serialize + Send + Sync {
    /// Discriminator telling the companion app which flow to run.
    fn deep_link_type(&self) -> &str;

    /// Inject the session id under the reserved `sessionId` key.
    fn set_session_id(&mut self, session_id: SessionId);
}

/// Inbound result parameters decoded from the callback fragment.
pub trait ParamsWithSessionId: DeserializeOwned + Send + Sync + Clone {
    fn session_id(&self) -> &str;
}

/// General-purpose connection parameters.
///
/// # Example
///
/// ```
/// use appconnect_lib::ConnectionParams;
///
/// let params = ConnectionParams::new("icp").with_param("pubkey", "abcd");
/// assert_eq!(params.deep_link_type, "icp");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionParams {
    pub deep_link_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// Additional companion-specific fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ConnectionParams {
    pub fn new(deep_link_type: impl Into<String>) -> Self {
        Self {
            deep_link_type: deep_link_type.into(),
            session_id: None,
            extra: BTreeMap::new(),
        }
    }

    /// Add an extra field. The key should be camel-case. A `sessionId` entry
    /// never reaches the wire; the initiator always sends its own token.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl DeepLinkConnectionParams for ConnectionParams {
    fn deep_link_type(&self) -> &str {
        &self.deep_link_type
    }

    fn set_session_id(&mut self, session_id: SessionId) {
        self.session_id = Some(session_id);
    }
}

/// General-purpose callback result: the session id plus every other fragment
/// field as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackParams {
    pub session_id: SessionId,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl CallbackParams {
    /// Look up a result field by its camel-case name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

impl ParamsWithSessionId for CallbackParams {
    fn session_id(&self) -> &str {
        self.session_id.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uri::params_to_pairs;

    #[test]
    fn connection_params_wire_form() {
        let mut params = ConnectionParams::new("icp")
            .with_param("publicKey", "k1")
            .with_param("maxTimeToLive", 60);
        params.set_session_id(SessionId::new("00"));

        let pairs = params_to_pairs(&params).unwrap();
        let keys: Vec<_> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["deep-link-type", "session-id", "max-time-to-live", "public-key"]
        );
        assert!(pairs.contains(&("max-time-to-live".to_string(), "60".to_string())));
    }

    #[test]
    fn callback_params_collects_other_fields() {
        let value = serde_json::json!({
            "sessionId": "abcd",
            "delegation": "d1",
        });
        let params: CallbackParams = serde_json::from_value(value).unwrap();

        assert_eq!(params.session_id(), "abcd");
        assert_eq!(params.get("delegation"), Some("d1"));
        assert_eq!(params.get("sessionId"), None);
    }
}
