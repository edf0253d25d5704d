//! Cache module - named, typed caches backed by Moka.
//!
//! The flag sources keep their evaluated flags here so a refresh can
//! drop every cached evaluation in one call.
//!
//! ## Architecture
//!
//! - `CacheRegistry` - Central registry holding all named caches
//! - `CacheConfig` - Capacity and expiry settings per cache
//! - `TypedCache` - Cheap-to-clone handle over one Moka cache
//!
//! ## Usage
//!
//! ```rust,ignore
//! let flags = registry.get_or_create::<String, Option<FlagValue>>(
//!     "flag_evaluations",
//!     CacheConfig::flag_evaluations(Duration::from_secs(300)),
//! );
//!
//! flags.insert(key.clone(), evaluation);
//! let cached = flags.get(&key);
//! ```

mod config;
mod registry;
mod typed;

pub use config::CacheConfig;
pub use registry::CacheRegistry;
pub use typed::TypedCache;
