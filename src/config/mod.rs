//! Configuration module for Wanderlust.
//!
//! Loads configuration from environment variables. Every setting has a
//! default; a value that fails to parse is logged and replaced by it.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::experiments::LocaleFeatures;

pub const DEFAULT_STORE_PATH: &str = "wanderlust-store.json";
pub const DEFAULT_PROVIDER_READY_TIMEOUT: Duration = Duration::from_millis(2000);
pub const DEFAULT_FLAG_CACHE_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_EVENT_JOURNAL_SIZE: usize = 256;

/// Where experiment configuration comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceMode {
    /// Feature flags from the provider session.
    Remote,
    /// Compiled-in variants and the local cache.
    #[default]
    Static,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub store_path: PathBuf,
    pub source_mode: SourceMode,

    /// Overrides the OS locale as the detected device locale.
    pub device_locale: Option<String>,

    pub provider_ready_timeout: Duration,
    pub flag_cache_ttl: Duration,

    /// Used for a locale flag the provider has no boolean for.
    pub locale_flag_defaults: LocaleFeatures,

    /// JSON flag table for the in-process provider.
    pub flags_file: Option<PathBuf>,

    pub event_journal_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            source_mode: SourceMode::default(),
            device_locale: None,
            provider_ready_timeout: DEFAULT_PROVIDER_READY_TIMEOUT,
            flag_cache_ttl: DEFAULT_FLAG_CACHE_TTL,
            locale_flag_defaults: LocaleFeatures::default(),
            flags_file: None,
            event_journal_size: DEFAULT_EVENT_JOURNAL_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let source_mode = match var("WANDERLUST_SOURCE").map(|v| v.to_lowercase()).as_deref() {
            None => defaults.source_mode,
            Some("remote") => SourceMode::Remote,
            Some("static") => SourceMode::Static,
            Some(other) => {
                warn!("Unknown WANDERLUST_SOURCE '{}', using static", other);
                SourceMode::Static
            }
        };

        let flag = |name: &str| parse_or(name, var(name), false, parse_bool);

        Self {
            store_path: var("WANDERLUST_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            source_mode,
            device_locale: var("WANDERLUST_DEVICE_LOCALE"),
            provider_ready_timeout: parse_or(
                "WANDERLUST_PROVIDER_READY_TIMEOUT_MS",
                var("WANDERLUST_PROVIDER_READY_TIMEOUT_MS"),
                defaults.provider_ready_timeout,
                |v| v.parse().ok().map(Duration::from_millis),
            ),
            flag_cache_ttl: parse_or(
                "WANDERLUST_FLAG_CACHE_TTL_SECS",
                var("WANDERLUST_FLAG_CACHE_TTL_SECS"),
                defaults.flag_cache_ttl,
                |v| v.parse().ok().map(Duration::from_secs),
            ),
            locale_flag_defaults: LocaleFeatures {
                show_local_deals_en: flag("WANDERLUST_DEFAULT_LOCAL_DEALS_EN"),
                show_local_deals_es: flag("WANDERLUST_DEFAULT_LOCAL_DEALS_ES"),
                show_local_deals_fr: flag("WANDERLUST_DEFAULT_LOCAL_DEALS_FR"),
                show_summer_promo_fr: flag("WANDERLUST_DEFAULT_SUMMER_PROMO_FR"),
            },
            flags_file: var("WANDERLUST_FLAGS_FILE").map(PathBuf::from),
            event_journal_size: parse_or(
                "WANDERLUST_EVENT_JOURNAL_SIZE",
                var("WANDERLUST_EVENT_JOURNAL_SIZE"),
                defaults.event_journal_size,
                |v| v.parse().ok(),
            ),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.source_mode == SourceMode::Remote
    }
}

fn parse_or<T, P>(name: &str, raw: Option<String>, default: T, parse: P) -> T
where
    P: Fn(&str) -> Option<T>,
{
    let Some(raw) = raw else {
        return default;
    };
    parse(&raw).unwrap_or_else(|| {
        warn!("Invalid value for {}: '{}', using default", name, raw);
        default
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
