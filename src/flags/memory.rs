//! In-process flag provider.
//!
//! Models a remote backend with two tables: the "server" table that callers
//! edit with `set_flag`, and the session's local evaluations, which only pick
//! up server changes on `reload_feature_flags`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::Context;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::{FlagProvider, FlagValue, Properties};
use crate::error::ProviderError;

/// An event received through `capture`.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedEvent {
    pub event: String,
    pub properties: Properties,
}

#[derive(Debug, Default)]
pub struct InMemoryFlagProvider {
    server: RwLock<HashMap<String, FlagValue>>,
    evaluated: RwLock<HashMap<String, FlagValue>>,
    captured: Mutex<Vec<CapturedEvent>>,
    identified: Mutex<Vec<Properties>>,
    reloads: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryFlagProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider whose server table and local evaluations both hold
    /// `flags`.
    pub fn with_flags<I, K>(flags: I) -> Self
    where
        I: IntoIterator<Item = (K, FlagValue)>,
        K: Into<String>,
    {
        let server: HashMap<String, FlagValue> =
            flags.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            evaluated: RwLock::new(server.clone()),
            server: RwLock::new(server),
            ..Self::default()
        }
    }

    /// Load the server table from a JSON object file (`{ "flag-key": value }`).
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::with_flags(read_flags_file(path)?))
    }

    /// Replace the server table with the contents of a flags file.
    /// Visible after the next reload. Returns the number of flags read.
    pub fn replace_from_json_file(&self, path: &Path) -> anyhow::Result<usize> {
        let flags = read_flags_file(path)?;
        let count = flags.len();
        *self.server.write() = flags;
        Ok(count)
    }

    /// Change a flag on the server. Visible after the next reload.
    pub fn set_flag(&self, key: impl Into<String>, value: FlagValue) {
        self.server.write().insert(key.into(), value);
    }

    /// Remove a flag from the server. Visible after the next reload.
    pub fn remove_flag(&self, key: &str) {
        self.server.write().remove(key);
    }

    /// Make every subsequent network call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    pub fn captured(&self) -> Vec<CapturedEvent> {
        self.captured.lock().clone()
    }

    /// Captured events with the given name.
    pub fn captured_named(&self, event: &str) -> Vec<CapturedEvent> {
        self.captured
            .lock()
            .iter()
            .filter(|e| e.event == event)
            .cloned()
            .collect()
    }

    pub fn identified(&self) -> Vec<Properties> {
        self.identified.lock().clone()
    }

    fn check_network(&self) -> Result<(), ProviderError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Request("network unreachable".to_string()));
        }
        Ok(())
    }
}

fn read_flags_file(path: &Path) -> anyhow::Result<HashMap<String, FlagValue>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read flags file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse flags file: {}", path.display()))
}

#[async_trait]
impl FlagProvider for InMemoryFlagProvider {
    async fn reload_feature_flags(&self) -> Result<(), ProviderError> {
        self.check_network()?;
        let snapshot = self.server.read().clone();
        debug!("Reloaded {} feature flags", snapshot.len());
        *self.evaluated.write() = snapshot;
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn get_feature_flag(&self, key: &str) -> Option<FlagValue> {
        self.evaluated.read().get(key).cloned()
    }

    async fn identify(
        &self,
        _distinct_id: Option<&str>,
        properties: Properties,
    ) -> Result<(), ProviderError> {
        self.check_network()?;
        self.identified.lock().push(properties);
        Ok(())
    }

    async fn capture(&self, event: &str, properties: Properties) -> Result<(), ProviderError> {
        self.check_network()?;
        self.captured.lock().push(CapturedEvent {
            event: event.to_string(),
            properties,
        });
        Ok(())
    }
}
