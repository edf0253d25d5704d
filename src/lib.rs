//! Wanderlust - experiment and locale resolution core.
//!
//! Decides which experiment variant and which language the travel app shows,
//! keeps both persisted across restarts, and reports user interactions to the
//! flag/analytics provider with that context attached.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `storage` - Persisted key-value store and typed repositories
//! - `cache` - Typed caches with Moka
//! - `flags` - Feature-flag provider trait, readiness slot, in-process provider
//! - `experiments` - Experiment config resolution engine
//! - `locale` - Supported locales, device detection, locale resolver
//! - `i18n` - Compiled-in translation tables
//! - `analytics` - Event tracking with ambient context
//! - `catalog` - Static destination catalog
//! - `features` - Saved destinations, onboarding, display gates, interactions
//! - `context` - Wires everything together

pub mod analytics;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod experiments;
pub mod features;
pub mod flags;
pub mod i18n;
pub mod locale;
pub mod storage;

pub use config::Config;
pub use context::AppContext;
pub use error::{LocaleError, OnboardingError, ProviderError, StorageError};
