//! Saved destinations service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info};

use crate::analytics::{events, Tracker};
use crate::catalog::{Catalog, Destination};
use crate::storage::SavedDestinationsRepository;

/// The user's saved destinations, in the order they were saved.
pub struct SavedDestinations {
    repository: SavedDestinationsRepository,
    tracker: Arc<Tracker>,
    catalog: Catalog,
}

impl SavedDestinations {
    pub fn new(repository: SavedDestinationsRepository, tracker: Arc<Tracker>) -> Self {
        Self {
            repository,
            tracker,
            catalog: Catalog,
        }
    }

    /// Saved ids. Unreadable storage reads as empty.
    pub async fn list(&self) -> Vec<String> {
        match self.repository.list().await {
            Ok(ids) => ids,
            Err(e) => {
                error!("Error loading saved destinations: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn is_saved(&self, id: &str) -> bool {
        self.list().await.iter().any(|saved| saved == id)
    }

    /// Save `id`. Returns `true` only when it was newly saved.
    pub async fn save(&self, id: &str) -> bool {
        let mut ids = self.list().await;
        if ids.iter().any(|saved| saved == id) {
            debug!("Destination already saved: {}", id);
            return false;
        }

        ids.push(id.to_string());
        if let Err(e) = self.repository.replace(&ids).await {
            error!("Error saving destination: {}", e);
            return false;
        }

        info!("Destination saved: {} (total saved: {})", id, ids.len());
        self.tracker
            .track(events::DESTINATION_SAVED, json!({ "destination_id": id }))
            .await;
        true
    }

    /// Remove `id`. Returns `true` only when it was present.
    pub async fn remove(&self, id: &str) -> bool {
        let mut ids = self.list().await;
        let before = ids.len();
        ids.retain(|saved| saved != id);
        if ids.len() == before {
            return false;
        }

        if let Err(e) = self.repository.replace(&ids).await {
            error!("Error removing destination: {}", e);
            return false;
        }

        self.tracker
            .track(events::DESTINATION_REMOVED, json!({ "destination_id": id }))
            .await;
        true
    }

    /// Catalog entries for the saved ids.
    pub async fn resolve(&self) -> Vec<&'static Destination> {
        self.catalog.resolve(&self.list().await)
    }
}
