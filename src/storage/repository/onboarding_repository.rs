//! Onboarding completion repository.

use crate::error::StorageError;
use crate::storage::{keys, SharedStore};

const COMPLETE: &str = "true";

/// Repository for the onboarding completion marker.
#[derive(Clone)]
pub struct OnboardingRepository {
    store: SharedStore,
}

impl OnboardingRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn is_complete(&self) -> Result<bool, StorageError> {
        Ok(self.store.get(keys::ONBOARDING_COMPLETE).await?.as_deref() == Some(COMPLETE))
    }

    pub async fn mark_complete(&self) -> Result<(), StorageError> {
        self.store.set(keys::ONBOARDING_COMPLETE, COMPLETE).await
    }

    pub async fn reset(&self) -> Result<(), StorageError> {
        self.store.remove(keys::ONBOARDING_COMPLETE).await
    }
}
