//! Experiment resolution engine.
//!
//! Owns the current `ExperimentConfig` and the `loading` flag. Consumers read
//! snapshots or subscribe; only the engine writes. Writes are last-write-wins.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::model::{ExperimentConfig, Variant};
use super::source::{ConfigSource, RemoteSource};
use crate::analytics::{events, Tracker};
use crate::flags::{FlagValue, Properties};
use crate::storage::ExperimentRepository;

pub struct ExperimentEngine {
    source: ConfigSource,
    repository: ExperimentRepository,
    tracker: Arc<Tracker>,
    config_tx: watch::Sender<ExperimentConfig>,
    loading_tx: watch::Sender<bool>,
    override_variant: Mutex<Option<Variant>>,
}

impl ExperimentEngine {
    /// Build an engine publishing into `config_tx`.
    ///
    /// The engine starts in the loading state until `initialize` completes.
    pub fn new(
        source: ConfigSource,
        repository: ExperimentRepository,
        tracker: Arc<Tracker>,
        config_tx: watch::Sender<ExperimentConfig>,
    ) -> Self {
        let (loading_tx, _rx) = watch::channel(true);
        Self {
            source,
            repository,
            tracker,
            config_tx,
            loading_tx,
            override_variant: Mutex::new(None),
        }
    }

    /// Snapshot of the current config.
    pub fn config(&self) -> ExperimentConfig {
        self.config_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ExperimentConfig> {
        self.config_tx.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading_tx.borrow()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading_tx.subscribe()
    }

    /// Variant applied through `switch_variant`, until reset or refresh.
    pub fn active_override(&self) -> Option<Variant> {
        *self.override_variant.lock()
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Raw evaluation of any flag key. `None` without a provider session.
    pub fn feature_flag(&self, key: &str) -> Option<FlagValue> {
        match &self.source {
            ConfigSource::Remote(remote) => remote.flag(key),
            ConfigSource::StaticDefault => None,
        }
    }

    /// Resolve the initial configuration.
    ///
    /// Remote: waits (bounded) for the provider, then reloads and resolves
    /// flags and caches the result; if resolution fails, uses the last
    /// cached config or defaults. Static:
    /// uses the local cache or defaults. Never fails and always leaves
    /// `loading` cleared.
    pub async fn initialize(&self) {
        self.loading_tx.send_replace(true);

        let config = match &self.source {
            ConfigSource::Remote(remote) => self.initialize_remote(remote).await,
            ConfigSource::StaticDefault => {
                info!("Loading experiments from local cache");
                self.load_cached().await.unwrap_or_default()
            }
        };

        self.publish(config);
        self.loading_tx.send_replace(false);
    }

    async fn initialize_remote(&self, remote: &RemoteSource) -> ExperimentConfig {
        let Some(provider) = remote.wait_ready().await else {
            info!("Flag provider not available, using defaults");
            return ExperimentConfig::default();
        };

        info!("Loading experiments from flag provider");
        match remote.load(provider.as_ref()).await {
            Ok(config) => {
                let properties = experiments_loaded_properties(self.source.name(), &config);
                if let Err(e) = provider.capture(events::EXPERIMENTS_LOADED, properties).await {
                    warn!("Failed to capture experiment assignment: {}", e);
                }
                self.store_cached(&config).await;
                config
            }
            Err(e) => {
                error!("Error loading experiments from flag provider: {}", e);
                self.load_cached().await.unwrap_or_default()
            }
        }
    }

    /// Re-fetch flags and recompute the config.
    ///
    /// No-op without a provider session. A fresh config also becomes the
    /// local cache. On failure the previous config stays in place.
    /// `loading` is cleared either way.
    pub async fn refresh(&self) {
        let ConfigSource::Remote(remote) = &self.source else {
            debug!("Refresh skipped: static configuration source");
            return;
        };
        let Some(provider) = remote.provider() else {
            debug!("Refresh skipped: no flag provider session");
            return;
        };

        self.loading_tx.send_replace(true);
        info!("Refreshing experiments");

        match remote.load(provider.as_ref()).await {
            Ok(config) => {
                *self.override_variant.lock() = None;
                self.store_cached(&config).await;
                self.publish(config);
            }
            Err(e) => error!("Error refreshing experiments: {}", e),
        }

        self.loading_tx.send_replace(false);
    }

    /// Apply a compiled-in variant as a manual override and cache it.
    pub async fn switch_variant(&self, variant: Variant) {
        let config = variant.config();

        *self.override_variant.lock() = Some(variant);
        self.publish(config.clone());

        self.store_cached(&config).await;

        self.track(
            events::VARIANT_SWITCHED,
            json!({
                "variant": variant.as_str(),
                "source": "manual_override",
                "experiments": config,
            }),
        )
        .await;
        info!("Switched to Variant {}", variant);
    }

    /// Drop the local cache and any override, and restore Variant A.
    pub async fn reset_to_defaults(&self) {
        if let Err(e) = self.repository.clear().await {
            error!("Error clearing experiment cache: {}", e);
        }

        *self.override_variant.lock() = None;
        let config = ExperimentConfig::default();
        self.publish(config.clone());

        self.track(
            events::EXPERIMENTS_RESET_TO_DEFAULTS,
            json!({
                "experiments": config,
                "source": self.source.name(),
            }),
        )
        .await;
        info!("Experiments reset to default values");
    }

    /// Track an event with ambient context.
    pub async fn track(&self, event: &str, properties: Value) {
        self.tracker.track(event, properties).await;
    }

    async fn load_cached(&self) -> Option<ExperimentConfig> {
        match self.repository.load().await {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Ignoring stored experiments: {}", e);
                None
            }
        }
    }

    /// Keep `config` as the last-known-good cache. A failed write is logged.
    async fn store_cached(&self, config: &ExperimentConfig) {
        if let Err(e) = self.repository.save(config).await {
            error!("Error caching experiments: {}", e);
        }
    }

    fn publish(&self, config: ExperimentConfig) {
        debug!("Publishing experiments: {:?}", config);
        self.config_tx.send_replace(config);
    }
}

fn experiments_loaded_properties(source: &str, config: &ExperimentConfig) -> Properties {
    let mut properties = Properties::new();
    properties.insert("source".to_string(), json!(source));
    properties.insert("cta_variant".to_string(), json!(config.cta_text.label()));
    properties.insert("onboarding_steps".to_string(), json!(config.onboarding_steps));
    properties.insert("premium_badge".to_string(), json!(config.premium_badge.as_str()));
    properties.insert(
        "search_placeholder".to_string(),
        json!(config.search_placeholder.label()),
    );
    properties
}
