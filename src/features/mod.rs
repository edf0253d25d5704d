//! Feature services built on top of the resolved experiments and locale.
//!
//! - `saved` - the user's saved destinations
//! - `onboarding` - onboarding progress and completion
//! - `display` - locale/experiment gates and experiment-driven copy
//! - `interactions` - tracking helpers for UI interactions

pub mod display;
mod interactions;
mod onboarding;
mod saved;

pub use interactions::Interactions;
pub use onboarding::{onboarding_total_steps, Onboarding};
pub use saved::SavedDestinations;
