//! Analytics event names.

pub const LOCALE_CHANGED: &str = "locale_changed";
pub const VARIANT_SWITCHED: &str = "variant_switched";
pub const EXPERIMENTS_RESET_TO_DEFAULTS: &str = "experiments_reset_to_defaults";
pub const EXPERIMENTS_LOADED: &str = "experiments_loaded";

pub const BANNER_CLICKED: &str = "banner_clicked";
pub const CTA_CLICKED: &str = "cta_clicked";
pub const BOOKING_INITIATED: &str = "booking_initiated";
pub const LOCAL_DEAL_CLICKED: &str = "local_deal_clicked";

pub const ONBOARDING_STEP_VIEWED: &str = "onboarding_step_viewed";
pub const ONBOARDING_COMPLETE: &str = "onboarding_complete";
pub const ONBOARDING_SKIPPED: &str = "onboarding_skipped";

pub const DESTINATION_SAVED: &str = "destination_saved";
pub const DESTINATION_REMOVED: &str = "destination_removed";
pub const SEARCH_QUERY: &str = "search_query";
pub const SEARCH_RESULT_CLICKED: &str = "search_result_clicked";
pub const SEARCH_SUBMITTED: &str = "search_submitted";
