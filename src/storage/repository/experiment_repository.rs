//! Experiment cache repository.

use tracing::debug;

use crate::error::StorageError;
use crate::experiments::ExperimentConfig;
use crate::storage::{keys, SharedStore};

/// Repository for the locally cached experiment config.
#[derive(Clone)]
pub struct ExperimentRepository {
    store: SharedStore,
}

impl ExperimentRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Load the cached config.
    ///
    /// Returns `Ok(None)` when nothing is cached and
    /// `Err(StorageError::Serialization)` when the cached JSON is malformed.
    /// Loaded configs are normalized.
    pub async fn load(&self) -> Result<Option<ExperimentConfig>, StorageError> {
        let Some(raw) = self.store.get(keys::AB_EXPERIMENTS).await? else {
            return Ok(None);
        };

        serde_json::from_str::<ExperimentConfig>(&raw)
            .map(|config| Some(config.normalized()))
            .map_err(|source| StorageError::Serialization {
                key: keys::AB_EXPERIMENTS.to_string(),
                source,
            })
    }

    /// Persist the config as the local cache.
    pub async fn save(&self, config: &ExperimentConfig) -> Result<(), StorageError> {
        let encoded =
            serde_json::to_string(config).map_err(|source| StorageError::Serialization {
                key: keys::AB_EXPERIMENTS.to_string(),
                source,
            })?;

        self.store.set(keys::AB_EXPERIMENTS, &encoded).await?;
        debug!("Saved experiment cache");
        Ok(())
    }

    /// Drop the cached config.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(keys::AB_EXPERIMENTS).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::experiments::Variant;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_save_then_load() {
        let repo = ExperimentRepository::new(Arc::new(MemoryStore::new()));
        assert!(repo.load().await.unwrap().is_none());

        let config = Variant::B.config();
        repo.save(&config).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(config));

        repo.clear().await.unwrap();
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zero_step_cache_is_normalized() {
        let store = MemoryStore::with_entries([(
            keys::AB_EXPERIMENTS,
            r#"{"onboarding_steps":0,"swipe_cta_color":"","premium_badge":"elite"}"#,
        )]);
        let repo = ExperimentRepository::new(Arc::new(store));

        let config = repo.load().await.unwrap().unwrap();
        assert_eq!(config.onboarding_steps, 1);
        assert_eq!(config.cta_color, crate::experiments::COLOR_RED);
        assert_eq!(config.premium_badge, crate::experiments::PremiumBadge::Elite);
    }

    #[tokio::test]
    async fn test_malformed_cache_is_serialization_error() {
        let store = MemoryStore::with_entries([(keys::AB_EXPERIMENTS, "{\"swipe_cta_text\":")]);
        let repo = ExperimentRepository::new(Arc::new(store));

        assert!(matches!(
            repo.load().await,
            Err(StorageError::Serialization { .. })
        ));
    }
}
