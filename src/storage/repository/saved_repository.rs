//! Saved destinations repository.

use tracing::warn;

use crate::error::StorageError;
use crate::storage::{keys, SharedStore};

/// Repository for the ids of destinations the user saved.
#[derive(Clone)]
pub struct SavedDestinationsRepository {
    store: SharedStore,
}

impl SavedDestinationsRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Saved ids in insertion order. A malformed stored value reads as empty.
    pub async fn list(&self) -> Result<Vec<String>, StorageError> {
        let Some(raw) = self.store.get(keys::SAVED_DESTINATIONS).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                warn!("Ignoring malformed {}: {}", keys::SAVED_DESTINATIONS, e);
                Ok(Vec::new())
            }
        }
    }

    /// Replace the saved id list.
    pub async fn replace(&self, ids: &[String]) -> Result<(), StorageError> {
        let encoded =
            serde_json::to_string(ids).map_err(|source| StorageError::Serialization {
                key: keys::SAVED_DESTINATIONS.to_string(),
                source,
            })?;
        self.store.set(keys::SAVED_DESTINATIONS, &encoded).await
    }
}
