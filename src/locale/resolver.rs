//! Locale resolver.
//!
//! Resolution order is persisted preference, device locale, then `en`.
//! A change is persisted before it becomes visible, so the active locale
//! always matches the last value stored successfully.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::Locale;
use crate::analytics::{events, Tracker};
use crate::error::LocaleError;
use crate::flags::{FlagProvider, Properties, ProviderSlot};
use crate::i18n::Translator;
use crate::storage::LocaleRepository;

pub struct LocaleResolver {
    repository: LocaleRepository,
    translator: Arc<Translator>,
    provider: ProviderSlot,
    tracker: Arc<Tracker>,
    device_locale: Option<String>,
    locale_tx: watch::Sender<Locale>,
    provider_wait: Option<Duration>,
}

impl LocaleResolver {
    pub fn new(
        repository: LocaleRepository,
        translator: Arc<Translator>,
        provider: ProviderSlot,
        tracker: Arc<Tracker>,
        device_locale: Option<String>,
        locale_tx: watch::Sender<Locale>,
    ) -> Self {
        Self {
            repository,
            translator,
            provider,
            tracker,
            device_locale,
            locale_tx,
            provider_wait: None,
        }
    }

    /// Wait up to `timeout` for a late provider session before reporting
    /// the initial locale. Without this, a provider that is not attached
    /// yet never hears about it.
    pub fn with_provider_wait(mut self, timeout: Duration) -> Self {
        self.provider_wait = Some(timeout);
        self
    }

    pub fn current(&self) -> Locale {
        *self.locale_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Locale> {
        self.locale_tx.subscribe()
    }

    /// Resolve the startup locale and make it active.
    ///
    /// The locale is active before the provider hears about it, so a slow
    /// provider never delays translations.
    pub async fn resolve_initial_locale(&self) -> Locale {
        let locale = match self.saved_locale().await {
            Some(saved) => saved,
            None => self.detected_locale(),
        };

        info!("Resolved locale: {}", locale);
        self.activate(locale);

        let provider = match self.provider_wait {
            Some(timeout) => self.provider.wait_ready(timeout).await,
            None => self.provider.get(),
        };
        if let Some(provider) = provider {
            identify(provider.as_ref(), locale).await;
        }
        locale
    }

    /// Switch to `requested`, persisting it first.
    ///
    /// Unsupported codes are rejected without any state change. A failed
    /// write leaves the active locale untouched.
    pub async fn change_locale(&self, requested: &str) -> Result<Locale, LocaleError> {
        let Some(locale) = Locale::from_code(requested) else {
            warn!("Unsupported locale: {}", requested);
            return Err(LocaleError::Unsupported(requested.to_string()));
        };

        if let Err(e) = self.repository.save(locale).await {
            error!("Error saving locale: {}", e);
            return Err(e.into());
        }

        self.activate(locale);
        if let Some(provider) = self.provider.get() {
            identify(provider.as_ref(), locale).await;
        }
        self.tracker
            .track(events::LOCALE_CHANGED, json!({ "new_locale": locale.as_str() }))
            .await;

        Ok(locale)
    }

    async fn saved_locale(&self) -> Option<Locale> {
        match self.repository.load().await {
            Ok(Some(code)) => {
                let locale = Locale::from_code(&code);
                if locale.is_none() {
                    warn!("Ignoring unsupported saved locale: {}", code);
                }
                locale
            }
            Ok(None) => None,
            Err(e) => {
                error!("Error loading saved locale: {}", e);
                None
            }
        }
    }

    fn detected_locale(&self) -> Locale {
        self.device_locale
            .as_deref()
            .and_then(Locale::from_language_tag)
            .unwrap_or_default()
    }

    fn activate(&self, locale: Locale) {
        self.locale_tx.send_replace(locale);
        self.translator.set_active_locale(locale);
    }

}

async fn identify(provider: &dyn FlagProvider, locale: Locale) {
    let mut properties = Properties::new();
    properties.insert("locale".to_string(), Value::String(locale.as_str().to_string()));
    if let Err(e) = provider.identify(None, properties).await {
        warn!("Failed to report locale to flag provider: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiments::ExperimentConfig;
    use crate::flags::InMemoryFlagProvider;
    use crate::storage::{keys, MemoryStore, SharedStore};

    fn build_resolver(
        store: SharedStore,
        device: Option<&str>,
        slot: ProviderSlot,
    ) -> (LocaleResolver, Arc<Translator>, Arc<Tracker>) {
        let (locale_tx, locale_rx) = watch::channel(Locale::default());
        let (_config_tx, config_rx) = watch::channel(ExperimentConfig::default());
        let translator = Arc::new(Translator::default());
        let tracker = Arc::new(Tracker::new(slot.clone(), locale_rx, config_rx, false, 16));

        let resolver = LocaleResolver::new(
            LocaleRepository::new(store),
            translator.clone(),
            slot,
            tracker.clone(),
            device.map(str::to_string),
            locale_tx,
        );
        (resolver, translator, tracker)
    }

    #[tokio::test]
    async fn test_saved_preference_beats_device() {
        let store = Arc::new(MemoryStore::with_entries([(keys::APP_LOCALE, "fr")]));
        let (resolver, translator, _) = build_resolver(store, Some("en-US"), ProviderSlot::empty());

        assert_eq!(resolver.resolve_initial_locale().await, Locale::Fr);
        assert_eq!(resolver.current(), Locale::Fr);
        assert_eq!(translator.active_locale(), Locale::Fr);
    }

    #[tokio::test]
    async fn test_unsupported_device_falls_back_to_en() {
        let (resolver, _, _) = build_resolver(Arc::new(MemoryStore::new()), Some("de-DE"), ProviderSlot::empty());
        assert_eq!(resolver.resolve_initial_locale().await, Locale::En);
    }

    #[tokio::test]
    async fn test_device_locale_used_without_preference() {
        let (resolver, _, _) = build_resolver(Arc::new(MemoryStore::new()), Some("es_MX"), ProviderSlot::empty());
        assert_eq!(resolver.resolve_initial_locale().await, Locale::Es);
    }

    #[tokio::test]
    async fn test_invalid_saved_locale_is_ignored() {
        let store = Arc::new(MemoryStore::with_entries([(keys::APP_LOCALE, "de")]));
        let (resolver, _, _) = build_resolver(store, Some("fr-CA"), ProviderSlot::empty());
        assert_eq!(resolver.resolve_initial_locale().await, Locale::Fr);
    }

    #[tokio::test]
    async fn test_storage_read_failure_falls_through() {
        let store = MemoryStore::with_entries([(keys::APP_LOCALE, "fr")]);
        store.set_fail_reads(true);
        let (resolver, _, _) = build_resolver(Arc::new(store), None, ProviderSlot::empty());
        assert_eq!(resolver.resolve_initial_locale().await, Locale::En);
    }

    #[tokio::test]
    async fn test_change_locale_survives_restart() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        for locale in Locale::ALL {
            let (resolver, _, _) = build_resolver(store.clone(), Some("en"), ProviderSlot::empty());
            resolver.change_locale(locale.as_str()).await.unwrap();

            let (restarted, _, _) = build_resolver(store.clone(), Some("fr"), ProviderSlot::empty());
            assert_eq!(restarted.resolve_initial_locale().await, locale);
        }
    }

    #[tokio::test]
    async fn test_change_locale_rejects_unsupported() {
        let (resolver, translator, tracker) =
            build_resolver(Arc::new(MemoryStore::new()), Some("es"), ProviderSlot::empty());
        resolver.resolve_initial_locale().await;

        let result = resolver.change_locale("de").await;

        assert!(matches!(result, Err(LocaleError::Unsupported(_))));
        assert_eq!(resolver.current(), Locale::Es);
        assert_eq!(translator.active_locale(), Locale::Es);
        assert!(tracker.last_event(events::LOCALE_CHANGED).is_none());
    }

    #[tokio::test]
    async fn test_change_locale_write_failure_keeps_state() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_writes(true);
        let (resolver, translator, _) = build_resolver(store, None, ProviderSlot::empty());
        resolver.resolve_initial_locale().await;

        let result = resolver.change_locale("fr").await;

        assert!(matches!(result, Err(LocaleError::Storage(_))));
        assert_eq!(resolver.current(), Locale::En);
        assert_eq!(translator.active_locale(), Locale::En);
    }

    #[tokio::test]
    async fn test_initial_locale_reaches_late_provider() {
        let slot = ProviderSlot::empty();
        let provider = Arc::new(InMemoryFlagProvider::new());
        let (resolver, _, _) =
            build_resolver(Arc::new(MemoryStore::new()), Some("fr-FR"), slot.clone());
        let resolver = resolver.with_provider_wait(Duration::from_secs(1));

        let attach = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            slot.attach(provider.clone());
        };
        let (locale, ()) = tokio::join!(resolver.resolve_initial_locale(), attach);

        assert_eq!(locale, Locale::Fr);
        let identified = provider.identified();
        assert_eq!(identified.len(), 1);
        assert_eq!(identified[0]["locale"], json!("fr"));
    }

    #[tokio::test]
    async fn test_initial_locale_does_not_wait_by_default() {
        let slot = ProviderSlot::empty();
        let (resolver, translator, _) =
            build_resolver(Arc::new(MemoryStore::new()), Some("es"), slot.clone());

        assert_eq!(resolver.resolve_initial_locale().await, Locale::Es);
        assert_eq!(translator.active_locale(), Locale::Es);

        let provider = Arc::new(InMemoryFlagProvider::new());
        slot.attach(provider.clone());
        assert!(provider.identified().is_empty());
    }

    #[tokio::test]
    async fn test_change_locale_reports_to_provider() {
        let provider = Arc::new(InMemoryFlagProvider::new());
        let (resolver, translator, tracker) = build_resolver(
            Arc::new(MemoryStore::new()),
            None,
            ProviderSlot::ready(provider.clone()),
        );

        assert_eq!(resolver.change_locale("es").await.unwrap(), Locale::Es);

        assert_eq!(translator.t("book_now"), "Reservar ahora");
        let identified = provider.identified();
        assert_eq!(identified.last().unwrap()["locale"], json!("es"));

        let captured = provider.captured_named(events::LOCALE_CHANGED);
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].properties["new_locale"], json!("es"));
        assert_eq!(captured[0].properties["locale"], json!("es"));
        assert!(tracker.last_event(events::LOCALE_CHANGED).is_some());
    }
}
