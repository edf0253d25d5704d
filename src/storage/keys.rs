//! Persisted key space.

/// JSON array of saved destination ids.
pub const SAVED_DESTINATIONS: &str = "saved_destinations";

/// JSON-encoded experiment config cache.
pub const AB_EXPERIMENTS: &str = "ab_experiments";

/// `"true"` once onboarding has been completed, absent otherwise.
pub const ONBOARDING_COMPLETE: &str = "onboarding_complete";

/// Locale code chosen by the user.
pub const APP_LOCALE: &str = "app_locale";
