//! Cache registry - Central management for all caches.

use std::any::Any;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::{CacheConfig, TypedCache};

/// Central registry for named typed caches.
///
/// Components ask for a cache by name; asking twice with the same name and
/// types returns handles over the same storage.
#[derive(Clone, Default)]
pub struct CacheRegistry {
    caches: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

/// Internal cache entry storing type-erased cache.
struct CacheEntry {
    cache: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl CacheRegistry {
    /// Create a new empty cache registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an existing cache by name.
    ///
    /// Returns `None` if the cache doesn't exist or was registered with
    /// different key/value types.
    pub fn get<K, V>(&self, name: &str) -> Option<TypedCache<K, V>>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let caches = self.caches.read();
        let entry = caches.get(name)?;

        let cache = entry.cache.downcast_ref::<TypedCache<K, V>>();
        if cache.is_none() {
            warn!(
                "Cache '{}' type mismatch: expected {}, got {}",
                name,
                std::any::type_name::<TypedCache<K, V>>(),
                entry.type_name
            );
        }
        cache.cloned()
    }

    /// Get an existing cache or create a new one if it doesn't exist.
    ///
    /// A name already taken by a cache of different types is replaced.
    pub fn get_or_create<K, V>(&self, name: &str, config: CacheConfig) -> TypedCache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        if let Some(cache) = self.get(name) {
            return cache;
        }

        let mut caches = self.caches.write();
        // Another caller may have won the race between the read and write locks
        if let Some(entry) = caches.get(name) {
            if let Some(cache) = entry.cache.downcast_ref::<TypedCache<K, V>>() {
                return cache.clone();
            }
        }

        debug!("Creating cache: {}", name);
        let cache = TypedCache::new(name, config);
        caches.insert(
            name.to_string(),
            CacheEntry {
                cache: Box::new(cache.clone()),
                type_name: std::any::type_name::<TypedCache<K, V>>(),
            },
        );
        cache
    }

    /// Get a list of all registered cache names.
    pub fn cache_names(&self) -> Vec<String> {
        self.caches.read().keys().cloned().collect()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let caches = self.caches.read();
        f.debug_struct("CacheRegistry")
            .field("cache_count", &caches.len())
            .field("cache_names", &caches.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_returns_shared_cache() {
        let registry = CacheRegistry::new();
        let first: TypedCache<String, bool> = registry.get_or_create("flags", CacheConfig::default());
        first.insert("a".to_string(), true);

        let second: TypedCache<String, bool> = registry.get_or_create("flags", CacheConfig::default());
        assert_eq!(second.get(&"a".to_string()), Some(true));
        assert_eq!(registry.cache_names(), vec!["flags".to_string()]);
    }

    #[test]
    fn test_get_with_wrong_types_returns_none() {
        let registry = CacheRegistry::new();
        let _: TypedCache<String, bool> = registry.get_or_create("flags", CacheConfig::default());

        assert!(registry.get::<u64, bool>("flags").is_none());
        assert!(registry.get::<String, bool>("missing").is_none());
    }
}
