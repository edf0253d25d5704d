//! Experiment configuration models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

pub const COLOR_RED: &str = "#FF5757";
pub const COLOR_GREEN: &str = "#4CAF50";

/// Label on the swipe call-to-action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CtaText {
    #[default]
    #[serde(rename = "Book Now")]
    BookNow,
    #[serde(rename = "Reserve Spot")]
    ReserveSpot,
}

impl CtaText {
    pub fn label(self) -> &'static str {
        match self {
            Self::BookNow => "Book Now",
            Self::ReserveSpot => "Reserve Spot",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Book Now" => Some(Self::BookNow),
            "Reserve Spot" => Some(Self::ReserveSpot),
            _ => None,
        }
    }

    /// Color this label is paired with in the compiled-in variants.
    pub fn paired_color(self) -> &'static str {
        match self {
            Self::BookNow => COLOR_RED,
            Self::ReserveSpot => COLOR_GREEN,
        }
    }

    pub fn translation_key(self) -> &'static str {
        match self {
            Self::BookNow => "book_now",
            Self::ReserveSpot => "reserve_spot",
        }
    }
}

/// Badge shown on premium listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PremiumBadge {
    #[default]
    Pro,
    Elite,
}

impl PremiumBadge {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pro => "pro",
            Self::Elite => "elite",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pro" => Some(Self::Pro),
            "elite" => Some(Self::Elite),
            _ => None,
        }
    }

    /// The badge names double as translation keys.
    pub fn translation_key(self) -> &'static str {
        self.as_str()
    }
}

/// Placeholder copy in the search field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SearchPlaceholder {
    #[default]
    #[serde(rename = "Search destinations...")]
    Default,
    #[serde(rename = "Where to next?")]
    Alternate,
}

impl SearchPlaceholder {
    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "Search destinations...",
            Self::Alternate => "Where to next?",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Search destinations..." => Some(Self::Default),
            "Where to next?" => Some(Self::Alternate),
            _ => None,
        }
    }

    pub fn translation_key(self) -> &'static str {
        match self {
            Self::Default => "search_placeholder",
            Self::Alternate => "search_placeholder_alt",
        }
    }
}

/// Boolean features, each meaningful for one locale only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleFeatures {
    pub show_local_deals_en: bool,
    pub show_local_deals_es: bool,
    pub show_local_deals_fr: bool,
    pub show_summer_promo_fr: bool,
}

impl LocaleFeatures {
    /// Whether the local-deals flag for `locale` is on.
    pub fn local_deals(&self, locale: Locale) -> bool {
        match locale {
            Locale::En => self.show_local_deals_en,
            Locale::Es => self.show_local_deals_es,
            Locale::Fr => self.show_local_deals_fr,
        }
    }

    /// Whether the summer-promo flag for `locale` is on. Only `fr` has one.
    pub fn summer_promo(&self, locale: Locale) -> bool {
        locale == Locale::Fr && self.show_summer_promo_fr
    }
}

/// Resolved experiment configuration.
///
/// Every field is always populated. A snapshot is replaced wholesale when
/// the configuration changes, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    #[serde(rename = "swipe_cta_text")]
    pub cta_text: CtaText,
    #[serde(rename = "swipe_cta_color")]
    pub cta_color: String,
    pub onboarding_steps: u32,
    pub premium_badge: PremiumBadge,
    pub search_placeholder: SearchPlaceholder,
    #[serde(flatten)]
    pub locale_features: LocaleFeatures,
}

impl Default for ExperimentConfig {
    /// The baseline is Variant A.
    fn default() -> Self {
        Variant::A.config()
    }
}

impl ExperimentConfig {
    /// Replace values no variant can have with the Variant A value.
    ///
    /// A cached config may predate a field or carry a zero step count; the
    /// remote path already maps those to the baseline.
    pub fn normalized(mut self) -> Self {
        let base = Variant::A.config();
        if self.onboarding_steps == 0 {
            self.onboarding_steps = base.onboarding_steps;
        }
        if self.cta_color.is_empty() {
            self.cta_color = base.cta_color;
        }
        self
    }

    /// Which named variant this config looks like.
    ///
    /// Anything that is not recognisably B counts as A.
    pub fn detected_variant(&self) -> Variant {
        if self.onboarding_steps == 3
            && self.cta_text == CtaText::ReserveSpot
            && self.premium_badge == PremiumBadge::Elite
        {
            Variant::B
        } else {
            Variant::A
        }
    }
}

/// Named bundle of experiment values used for manual overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    A,
    B,
}

impl Variant {
    pub fn config(self) -> ExperimentConfig {
        match self {
            Self::A => ExperimentConfig {
                cta_text: CtaText::BookNow,
                cta_color: COLOR_RED.to_string(),
                onboarding_steps: 1,
                premium_badge: PremiumBadge::Pro,
                search_placeholder: SearchPlaceholder::Default,
                locale_features: LocaleFeatures::default(),
            },
            Self::B => ExperimentConfig {
                cta_text: CtaText::ReserveSpot,
                cta_color: COLOR_GREEN.to_string(),
                onboarding_steps: 3,
                premium_badge: PremiumBadge::Elite,
                search_placeholder: SearchPlaceholder::Alternate,
                locale_features: LocaleFeatures::default(),
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            other => Err(format!("unknown variant '{}'", other)),
        }
    }
}
