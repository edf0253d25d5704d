//! Configuration sources.
//!
//! The engine is built with exactly one source. `Remote` reads flags from the
//! provider session; `StaticDefault` only knows the compiled-in variants and
//! the local cache.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::model::{
    CtaText, ExperimentConfig, LocaleFeatures, PremiumBadge, SearchPlaceholder,
};
use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::error::ProviderError;
use crate::flags::{keys, FlagProvider, FlagValue, ProviderSlot, SharedProvider};

/// Where the experiment engine gets its configuration.
pub enum ConfigSource {
    Remote(RemoteSource),
    StaticDefault,
}

impl ConfigSource {
    /// Tag attached to analytics events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Remote(_) => "remote",
            Self::StaticDefault => "static",
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Flag-provider-backed configuration source.
pub struct RemoteSource {
    slot: ProviderSlot,
    ready_timeout: Duration,
    locale_defaults: LocaleFeatures,
    evaluations: TypedCache<String, Option<FlagValue>>,
}

impl RemoteSource {
    pub fn new(
        slot: ProviderSlot,
        ready_timeout: Duration,
        locale_defaults: LocaleFeatures,
        cache: &CacheRegistry,
        evaluation_ttl: Duration,
    ) -> Self {
        let evaluations =
            cache.get_or_create("flag_evaluations", CacheConfig::flag_evaluations(evaluation_ttl));

        Self {
            slot,
            ready_timeout,
            locale_defaults,
            evaluations,
        }
    }

    /// Current provider session, without waiting.
    pub fn provider(&self) -> Option<SharedProvider> {
        self.slot.get()
    }

    /// Wait (bounded) for the provider session to become ready.
    pub async fn wait_ready(&self) -> Option<SharedProvider> {
        self.slot.wait_ready(self.ready_timeout).await
    }

    /// Reload flags from the provider and resolve a fresh config.
    ///
    /// Cached evaluations are dropped only after the reload succeeds, so a
    /// failed reload leaves the previous evaluations readable. The flags the
    /// config is built from are re-evaluated and written back directly.
    pub async fn load(&self, provider: &dyn FlagProvider) -> Result<ExperimentConfig, ProviderError> {
        provider.reload_feature_flags().await?;
        self.evaluations.invalidate_all();

        let config = resolve_config(
            |key| {
                let value = provider.get_feature_flag(key);
                self.evaluations.insert(key.to_string(), value.clone());
                value
            },
            &self.locale_defaults,
        );
        debug!("Resolved remote experiments: {:?}", config);
        Ok(config)
    }

    /// Evaluation for an arbitrary flag key, served from the evaluation cache.
    pub fn flag(&self, key: &str) -> Option<FlagValue> {
        let provider = self.provider()?;
        self.evaluate(provider.as_ref(), key)
    }

    fn evaluate(&self, provider: &dyn FlagProvider, key: &str) -> Option<FlagValue> {
        self.evaluations
            .get_or_insert_with(key.to_string(), || provider.get_feature_flag(key))
    }
}

/// Map flag evaluations onto a fully populated config.
///
/// Payload-backed fields fall back to the Variant A value when the flag is
/// absent, is not a payload, or lacks a usable field. Locale flags are on
/// only for an evaluation of exactly `true`, off for exactly `false`, and
/// take `locale_defaults` otherwise.
pub fn resolve_config<F>(mut lookup: F, locale_defaults: &LocaleFeatures) -> ExperimentConfig
where
    F: FnMut(&str) -> Option<FlagValue>,
{
    let base = ExperimentConfig::default();

    let cta = lookup(keys::CTA_VARIANT);
    let onboarding = lookup(keys::ONBOARDING_FLOW);
    let badge = lookup(keys::PREMIUM_BADGE);
    let search = lookup(keys::SEARCH_PLACEHOLDER);

    let locale_flag = |value: Option<FlagValue>, default: bool| match value {
        Some(FlagValue::Bool(enabled)) => enabled,
        _ => default,
    };

    ExperimentConfig {
        cta_text: str_field(cta.as_ref(), "text")
            .and_then(CtaText::from_label)
            .unwrap_or(base.cta_text),
        cta_color: str_field(cta.as_ref(), "color")
            .map(str::to_string)
            .unwrap_or(base.cta_color),
        onboarding_steps: onboarding
            .as_ref()
            .and_then(|v| v.field("steps"))
            .and_then(Value::as_u64)
            .filter(|steps| *steps > 0)
            .and_then(|steps| u32::try_from(steps).ok())
            .unwrap_or(base.onboarding_steps),
        premium_badge: str_field(badge.as_ref(), "badge")
            .and_then(PremiumBadge::from_name)
            .unwrap_or(base.premium_badge),
        search_placeholder: str_field(search.as_ref(), "placeholder")
            .and_then(SearchPlaceholder::from_label)
            .unwrap_or(base.search_placeholder),
        locale_features: LocaleFeatures {
            show_local_deals_en: locale_flag(
                lookup(keys::LOCAL_DEALS_EN),
                locale_defaults.show_local_deals_en,
            ),
            show_local_deals_es: locale_flag(
                lookup(keys::LOCAL_DEALS_ES),
                locale_defaults.show_local_deals_es,
            ),
            show_local_deals_fr: locale_flag(
                lookup(keys::LOCAL_DEALS_FR),
                locale_defaults.show_local_deals_fr,
            ),
            show_summer_promo_fr: locale_flag(
                lookup(keys::SUMMER_PROMO_FR),
                locale_defaults.show_summer_promo_fr,
            ),
        },
    }
}

/// Non-empty string field of a payload.
fn str_field<'a>(flag: Option<&'a FlagValue>, name: &str) -> Option<&'a str> {
    flag?.field(name)?.as_str().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::experiments::{Variant, COLOR_GREEN};
    use crate::flags::InMemoryFlagProvider;
    use serde_json::json;

    fn resolve(flags: &[(&str, FlagValue)]) -> ExperimentConfig {
        let table: HashMap<&str, FlagValue> = flags.iter().cloned().collect();
        resolve_config(|key| table.get(key).cloned(), &LocaleFeatures::default())
    }

    #[test]
    fn test_every_known_key_is_looked_up() {
        let mut seen = Vec::new();
        resolve_config(
            |key| {
                seen.push(key.to_string());
                None
            },
            &LocaleFeatures::default(),
        );

        assert_eq!(seen, keys::ALL.map(str::to_string).to_vec());
    }

    #[test]
    fn test_no_flags_yields_default() {
        assert_eq!(resolve(&[]), ExperimentConfig::default());
    }

    #[test]
    fn test_onboarding_payload_only() {
        let config = resolve(&[(
            keys::ONBOARDING_FLOW,
            FlagValue::Payload(json!({ "steps": 3 })),
        )]);

        assert_eq!(config.onboarding_steps, 3);
        assert_eq!(
            config,
            ExperimentConfig {
                onboarding_steps: 3,
                ..ExperimentConfig::default()
            }
        );
    }

    #[test]
    fn test_full_payloads_match_variant_b() {
        let config = resolve(&[
            (
                keys::CTA_VARIANT,
                FlagValue::Payload(json!({ "text": "Reserve Spot", "color": COLOR_GREEN })),
            ),
            (keys::ONBOARDING_FLOW, FlagValue::Payload(json!({ "steps": 3 }))),
            (keys::PREMIUM_BADGE, FlagValue::Payload(json!({ "badge": "elite" }))),
            (
                keys::SEARCH_PLACEHOLDER,
                FlagValue::Payload(json!({ "placeholder": "Where to next?" })),
            ),
        ]);

        assert_eq!(config, Variant::B.config());
    }

    #[test]
    fn test_unusable_payloads_fall_back() {
        let config = resolve(&[
            (keys::CTA_VARIANT, FlagValue::Variant("test".to_string())),
            (keys::ONBOARDING_FLOW, FlagValue::Payload(json!({ "steps": 0 }))),
            (keys::PREMIUM_BADGE, FlagValue::Payload(json!({ "badge": "platinum" }))),
            (keys::SEARCH_PLACEHOLDER, FlagValue::Payload(json!({ "placeholder": "" }))),
        ]);

        assert_eq!(config, ExperimentConfig::default());
    }

    #[test]
    fn test_payload_color_is_independent() {
        let config = resolve(&[(
            keys::CTA_VARIANT,
            FlagValue::Payload(json!({ "color": "#123456" })),
        )]);

        assert_eq!(config.cta_text, CtaText::BookNow);
        assert_eq!(config.cta_color, "#123456");
    }

    #[test]
    fn test_locale_flags_need_exact_true() {
        let config = resolve(&[
            (keys::LOCAL_DEALS_ES, FlagValue::Bool(true)),
            (keys::SUMMER_PROMO_FR, FlagValue::Variant("true".to_string())),
            (keys::LOCAL_DEALS_FR, FlagValue::Payload(json!({ "enabled": true }))),
        ]);

        assert!(config.locale_features.show_local_deals_es);
        assert!(!config.locale_features.show_summer_promo_fr);
        assert!(!config.locale_features.show_local_deals_fr);
        assert!(!config.locale_features.show_local_deals_en);
    }

    #[test]
    fn test_configured_locale_defaults_apply_only_when_unset() {
        let defaults = LocaleFeatures {
            show_local_deals_es: true,
            show_summer_promo_fr: true,
            ..Default::default()
        };
        let table: HashMap<&str, FlagValue> =
            [(keys::LOCAL_DEALS_ES, FlagValue::Bool(false))].into_iter().collect();

        let config = resolve_config(|key| table.get(key).cloned(), &defaults);

        assert!(!config.locale_features.show_local_deals_es);
        assert!(config.locale_features.show_summer_promo_fr);
    }

    #[tokio::test]
    async fn test_remote_source_caches_until_reload() {
        let provider = Arc::new(InMemoryFlagProvider::with_flags([(
            keys::PREMIUM_BADGE,
            FlagValue::Payload(json!({ "badge": "elite" })),
        )]));
        let source = RemoteSource::new(
            ProviderSlot::ready(provider.clone()),
            Duration::from_millis(10),
            LocaleFeatures::default(),
            &CacheRegistry::new(),
            Duration::ZERO,
        );

        let config = source.load(provider.as_ref()).await.unwrap();
        assert_eq!(config.premium_badge, PremiumBadge::Elite);

        provider.remove_flag(keys::PREMIUM_BADGE);
        provider.reload_feature_flags().await.unwrap();
        // Still served from the evaluation cache
        assert!(source.flag(keys::PREMIUM_BADGE).is_some());

        let config = source.load(provider.as_ref()).await.unwrap();
        assert_eq!(config.premium_badge, PremiumBadge::Pro);
        assert!(source.flag(keys::PREMIUM_BADGE).is_none());
    }
}
