//! Flag provider trait and evaluated flag values.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProviderError;

/// Event and user properties sent to the provider.
pub type Properties = Map<String, Value>;

/// Evaluated value of a feature flag.
///
/// Deserializes untagged: `true` is `Bool`, `"test"` is `Variant`, and any
/// other JSON (normally an object) is `Payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Variant(String),
    Payload(Value),
}

impl FlagValue {
    /// Only an evaluation of exactly `true` counts as enabled.
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Bool(true))
    }

    /// Structured payload fields, if this evaluation carries an object.
    pub fn payload(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Payload(Value::Object(fields)) => Some(fields),
            _ => None,
        }
    }

    /// Look up one payload field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload()?.get(name)
    }
}

/// A session with a remote feature-flag and analytics backend.
#[async_trait]
pub trait FlagProvider: Send + Sync {
    /// Re-fetch flag evaluations from the backend into the local session.
    async fn reload_feature_flags(&self) -> Result<(), ProviderError>;

    /// Locally held evaluation for `key`. `None` when the flag is unknown.
    fn get_feature_flag(&self, key: &str) -> Option<FlagValue>;

    /// Attach user properties to the current (or given) identity.
    async fn identify(
        &self,
        distinct_id: Option<&str>,
        properties: Properties,
    ) -> Result<(), ProviderError>;

    /// Send an analytics event.
    async fn capture(&self, event: &str, properties: Properties) -> Result<(), ProviderError>;
}

pub type SharedProvider = Arc<dyn FlagProvider>;
