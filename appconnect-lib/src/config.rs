//! Configuration for an [`AppConnect`](crate::AppConnect) instance.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::namespace::{NamespaceStrategy, PathnameNamespace, VerbatimNamespace};
use crate::{AppConnectError, Result};

/// How the storage namespace is derived from the identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespaceKind {
    /// Escape the identifier as a route path.
    #[default]
    Pathname,
    /// Use the identifier unchanged.
    Verbatim,
}

impl NamespaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pathname => "pathname",
            Self::Verbatim => "verbatim",
        }
    }

    pub fn strategy(&self) -> Arc<dyn NamespaceStrategy> {
        match self {
            Self::Pathname => Arc::new(PathnameNamespace),
            Self::Verbatim => Arc::new(VerbatimNamespace),
        }
    }
}

impl FromStr for NamespaceKind {
    type Err = AppConnectError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pathname" => Ok(Self::Pathname),
            "verbatim" => Ok(Self::Verbatim),
            other => Err(AppConnectError::InvalidConfig(format!(
                "unknown namespace kind '{}'",
                other
            ))),
        }
    }
}

/// Serializable settings of one orchestrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConnectConfig {
    /// Route path or target name the namespace is derived from.
    pub identifier: String,

    pub namespace: NamespaceKind,

    /// Ask the browser for a new tab (honored on web only).
    pub open_in_new_tab: bool,
}

impl Default for AppConnectConfig {
    fn default() -> Self {
        Self {
            identifier: "/".to_string(),
            namespace: NamespaceKind::default(),
            open_in_new_tab: false,
        }
    }
}

impl AppConnectConfig {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    /// Load from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AppConnectError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.identifier.trim().is_empty() {
            return Err(AppConnectError::InvalidConfig(
                "identifier must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
