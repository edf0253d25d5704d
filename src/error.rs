//! Error types shared across the crate.
//!
//! Nothing in the resolution core lets these escape to the UI layer except
//! where an operation documents a `Result` return (`change_locale`,
//! onboarding reset). Everything else logs and degrades to a default.

use thiserror::Error;

/// Failure reading from or writing to the persisted key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value for '{key}' is malformed: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Failure talking to the feature-flag provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("flag provider request failed: {0}")]
    Request(String),
}

/// Rejection from the locale resolver.
#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("unsupported locale '{0}'")]
    Unsupported(String),

    #[error("failed to persist locale: {0}")]
    Storage(#[from] StorageError),
}

/// Failure from onboarding state operations surfaced to the UI.
#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("failed to update onboarding state: {0}")]
    Storage(#[from] StorageError),
}
