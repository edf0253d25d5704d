//! Locale preference repository.

use crate::error::StorageError;
use crate::locale::Locale;
use crate::storage::{keys, SharedStore};

/// Repository for the user's chosen locale.
#[derive(Clone)]
pub struct LocaleRepository {
    store: SharedStore,
}

impl LocaleRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Raw persisted locale code, if any. Validation is the caller's job.
    pub async fn load(&self) -> Result<Option<String>, StorageError> {
        self.store.get(keys::APP_LOCALE).await
    }

    pub async fn save(&self, locale: Locale) -> Result<(), StorageError> {
        self.store.set(keys::APP_LOCALE, locale.as_str()).await
    }
}
