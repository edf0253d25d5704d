//! Experiment configuration resolution.
//!
//! - `model` - the resolved config snapshot and the named A/B variants
//! - `source` - where configs come from (remote flags or the local cache)
//! - `engine` - reactive owner of the current config

mod engine;
mod model;
mod source;

pub use engine::ExperimentEngine;
pub use model::{
    CtaText, ExperimentConfig, LocaleFeatures, PremiumBadge, SearchPlaceholder, Variant,
    COLOR_GREEN, COLOR_RED,
};
pub use source::{resolve_config, ConfigSource, RemoteSource};
