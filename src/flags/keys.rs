//! Flag keys known to the experiment resolver.

pub const CTA_VARIANT: &str = "wanderlust-cta-variant";
pub const ONBOARDING_FLOW: &str = "wanderlust-onboarding-flow";
pub const PREMIUM_BADGE: &str = "wanderlust-premium-badge";
pub const SEARCH_PLACEHOLDER: &str = "wanderlust-search-placeholder";

pub const LOCAL_DEALS_EN: &str = "wanderlust-local-deals-en";
pub const LOCAL_DEALS_ES: &str = "wanderlust-local-deals-es";
pub const LOCAL_DEALS_FR: &str = "wanderlust-local-deals-fr";
pub const SUMMER_PROMO_FR: &str = "wanderlust-summer-promo-fr";

/// Every key evaluated during one resolution pass.
pub const ALL: [&str; 8] = [
    CTA_VARIANT,
    ONBOARDING_FLOW,
    PREMIUM_BADGE,
    SEARCH_PLACEHOLDER,
    LOCAL_DEALS_EN,
    LOCAL_DEALS_ES,
    LOCAL_DEALS_FR,
    SUMMER_PROMO_FR,
];
