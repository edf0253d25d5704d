//! Persisted key-value storage.
//!
//! The store is a plain string-to-string map. Typed access to each key goes
//! through the repositories, which own the JSON encoding of their values.

mod file;
pub mod keys;
mod memory;
mod repository;
mod store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use repository::{
    ExperimentRepository, LocaleRepository, OnboardingRepository, SavedDestinationsRepository,
};
pub use store::{KeyValueStore, SharedStore};
