//! Display gates and experiment-driven copy.

use crate::experiments::ExperimentConfig;
use crate::i18n::Translator;
use crate::locale::Locale;

/// Local deals section: only for a locale whose own flag is on.
pub fn show_local_deals(locale: Locale, config: &ExperimentConfig) -> bool {
    config.locale_features.local_deals(locale)
}

/// Summer promo banner: `fr` only, with its flag on.
pub fn show_summer_promo(locale: Locale, config: &ExperimentConfig) -> bool {
    config.locale_features.summer_promo(locale)
}

pub fn cta_label(translator: &Translator, config: &ExperimentConfig) -> String {
    translator.t(config.cta_text.translation_key())
}

pub fn search_placeholder(translator: &Translator, config: &ExperimentConfig) -> String {
    translator.t(config.search_placeholder.translation_key())
}

pub fn badge_label(translator: &Translator, config: &ExperimentConfig) -> String {
    translator.t(config.premium_badge.translation_key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiments::{LocaleFeatures, Variant};

    fn with_features(features: LocaleFeatures) -> ExperimentConfig {
        ExperimentConfig {
            locale_features: features,
            ..ExperimentConfig::default()
        }
    }

    #[test]
    fn test_local_deals_gate() {
        let config = with_features(LocaleFeatures {
            show_local_deals_es: true,
            ..Default::default()
        });

        assert!(show_local_deals(Locale::Es, &config));
        assert!(!show_local_deals(Locale::En, &config));
        assert!(!show_local_deals(Locale::Fr, &config));
        assert!(!show_local_deals(Locale::Es, &ExperimentConfig::default()));
    }

    #[test]
    fn test_summer_promo_gate() {
        let config = with_features(LocaleFeatures {
            show_summer_promo_fr: true,
            ..Default::default()
        });

        assert!(show_summer_promo(Locale::Fr, &config));
        assert!(!show_summer_promo(Locale::Es, &config));
        assert!(!show_summer_promo(Locale::Fr, &ExperimentConfig::default()));
    }

    #[test]
    fn test_copy_follows_variant() {
        let translator = Translator::new(Locale::En);
        let b = Variant::B.config();

        assert_eq!(cta_label(&translator, &ExperimentConfig::default()), "Book Now");
        assert_eq!(cta_label(&translator, &b), "Reserve Spot");
        assert_eq!(search_placeholder(&translator, &b), "Where to next?");
        assert_eq!(badge_label(&translator, &b), "ELITE");

        translator.set_active_locale(Locale::Es);
        assert_eq!(search_placeholder(&translator, &b), "¿A dónde vamos?");
    }
}
