//! Repository module - typed access to the persisted key space.

mod experiment_repository;
mod locale_repository;
mod onboarding_repository;
mod saved_repository;

pub use experiment_repository::ExperimentRepository;
pub use locale_repository::LocaleRepository;
pub use onboarding_repository::OnboardingRepository;
pub use saved_repository::SavedDestinationsRepository;
