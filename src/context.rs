//! Application context.
//!
//! Wires the store, provider slot, locale resolver and experiment engine
//! together. UI code holds one `AppContext` and reads everything through it.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::analytics::Tracker;
use crate::cache::CacheRegistry;
use crate::config::Config;
use crate::experiments::{ConfigSource, ExperimentConfig, ExperimentEngine, RemoteSource};
use crate::features::{Interactions, Onboarding, SavedDestinations};
use crate::flags::ProviderSlot;
use crate::i18n::Translator;
use crate::locale::{detect_device_locale, Locale, LocaleResolver};
use crate::storage::{
    ExperimentRepository, LocaleRepository, OnboardingRepository, SavedDestinationsRepository,
    SharedStore,
};

pub struct AppContext {
    store: SharedStore,
    provider: ProviderSlot,
    cache: CacheRegistry,
    translator: Arc<Translator>,
    tracker: Arc<Tracker>,
    locale: LocaleResolver,
    experiments: ExperimentEngine,
}

impl AppContext {
    /// Build the context. Nothing is loaded until `start`.
    ///
    /// In static mode the provider slot is only used for analytics, and each
    /// event carries the full experiment config.
    pub fn new(config: &Config, store: SharedStore, provider: ProviderSlot) -> Self {
        let cache = CacheRegistry::new();
        let (locale_tx, locale_rx) = watch::channel(Locale::default());
        let (config_tx, config_rx) = watch::channel(ExperimentConfig::default());

        let source = if config.is_remote() {
            ConfigSource::Remote(RemoteSource::new(
                provider.clone(),
                config.provider_ready_timeout,
                config.locale_flag_defaults,
                &cache,
                config.flag_cache_ttl,
            ))
        } else {
            ConfigSource::StaticDefault
        };

        let tracker = Arc::new(Tracker::new(
            provider.clone(),
            locale_rx,
            config_rx,
            !source.is_remote(),
            config.event_journal_size,
        ));
        let translator = Arc::new(Translator::default());

        let mut locale = LocaleResolver::new(
            LocaleRepository::new(store.clone()),
            translator.clone(),
            provider.clone(),
            tracker.clone(),
            detect_device_locale(config.device_locale.as_deref()),
            locale_tx,
        );
        if config.is_remote() {
            locale = locale.with_provider_wait(config.provider_ready_timeout);
        }
        let experiments = ExperimentEngine::new(
            source,
            ExperimentRepository::new(store.clone()),
            tracker.clone(),
            config_tx,
        );

        Self {
            store,
            provider,
            cache,
            translator,
            tracker,
            locale,
            experiments,
        }
    }

    /// Resolve the initial locale and experiments concurrently.
    ///
    /// In remote mode both wait (bounded) for the provider session, so a
    /// session attached during startup still receives the locale.
    pub async fn start(&self) -> (Locale, ExperimentConfig) {
        let (locale, ()) = futures::join!(
            self.locale.resolve_initial_locale(),
            self.experiments.initialize()
        );
        let config = self.experiments.config();

        info!(
            "Context ready: locale={}, variant={}, source={}",
            locale,
            config.detected_variant(),
            self.experiments.source().name()
        );
        (locale, config)
    }

    pub fn locale(&self) -> &LocaleResolver {
        &self.locale
    }

    pub fn experiments(&self) -> &ExperimentEngine {
        &self.experiments
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn provider(&self) -> &ProviderSlot {
        &self.provider
    }

    pub fn cache(&self) -> &CacheRegistry {
        &self.cache
    }

    pub fn saved_destinations(&self) -> SavedDestinations {
        SavedDestinations::new(
            SavedDestinationsRepository::new(self.store.clone()),
            self.tracker.clone(),
        )
    }

    /// Onboarding flow sized by the current experiments.
    pub fn onboarding(&self) -> Onboarding {
        Onboarding::new(
            OnboardingRepository::new(self.store.clone()),
            self.tracker.clone(),
            &self.experiments.config(),
        )
    }

    pub fn interactions(&self) -> Interactions {
        Interactions::new(
            self.tracker.clone(),
            self.locale.subscribe(),
            self.experiments.subscribe(),
        )
    }
}
