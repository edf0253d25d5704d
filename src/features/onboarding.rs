//! Onboarding flow state.
//!
//! The flow has one step or three, depending on the `onboarding_steps`
//! experiment. Completion is persisted; the current step is not.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::json;
use tracing::{error, info};

use crate::analytics::{events, Tracker};
use crate::error::OnboardingError;
use crate::experiments::ExperimentConfig;
use crate::storage::OnboardingRepository;

const SINGLE_STEP: usize = 1;
const MULTI_STEP: usize = 3;

/// Number of onboarding screens for `config`. Anything other than a
/// single step means the full three-step flow.
pub fn onboarding_total_steps(config: &ExperimentConfig) -> usize {
    if config.onboarding_steps == 1 {
        SINGLE_STEP
    } else {
        MULTI_STEP
    }
}

pub struct Onboarding {
    repository: OnboardingRepository,
    tracker: Arc<Tracker>,
    total_steps: usize,
    current: Mutex<usize>,
}

impl Onboarding {
    pub fn new(
        repository: OnboardingRepository,
        tracker: Arc<Tracker>,
        config: &ExperimentConfig,
    ) -> Self {
        Self {
            repository,
            tracker,
            total_steps: onboarding_total_steps(config),
            current: Mutex::new(0),
        }
    }

    /// Whether onboarding was completed. Unreadable storage counts as not
    /// completed.
    pub async fn is_complete(&self) -> bool {
        match self.repository.is_complete().await {
            Ok(complete) => complete,
            Err(e) => {
                error!("Error reading onboarding state: {}", e);
                false
            }
        }
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn is_multi_step(&self) -> bool {
        self.total_steps > SINGLE_STEP
    }

    /// Current step, zero-based.
    pub fn current_step(&self) -> usize {
        *self.current.lock()
    }

    /// Move to `step` (zero-based, clamped to the flow).
    ///
    /// `onboarding_step_viewed` is tracked only when the step changes.
    pub async fn view_step(&self, step: usize) -> usize {
        let step = step.min(self.total_steps - 1);
        {
            let mut current = self.current.lock();
            if *current == step {
                return step;
            }
            *current = step;
        }

        self.tracker
            .track(
                events::ONBOARDING_STEP_VIEWED,
                json!({ "step": step + 1, "total_steps": self.total_steps }),
            )
            .await;
        step
    }

    /// Advance one step, or complete on the last one.
    ///
    /// Returns `true` when this call completed onboarding.
    pub async fn next(&self) -> Result<bool, OnboardingError> {
        let current = self.current_step();
        if current + 1 < self.total_steps {
            self.view_step(current + 1).await;
            return Ok(false);
        }

        self.complete().await?;
        Ok(true)
    }

    /// Persist completion and track it.
    pub async fn complete(&self) -> Result<(), OnboardingError> {
        self.repository.mark_complete().await?;

        let variant = if self.is_multi_step() {
            "multi_step"
        } else {
            "single_step"
        };
        self.tracker
            .track(
                events::ONBOARDING_COMPLETE,
                json!({ "steps": self.total_steps, "variant": variant }),
            )
            .await;
        info!("Onboarding complete ({} steps)", self.total_steps);
        Ok(())
    }

    /// Skip the rest of the flow from the current step.
    pub async fn skip(&self) -> Result<(), OnboardingError> {
        self.tracker
            .track(
                events::ONBOARDING_SKIPPED,
                json!({ "step": self.current_step() + 1, "total_steps": self.total_steps }),
            )
            .await;
        self.complete().await
    }

    /// Forget completion so onboarding shows again.
    pub async fn reset(&self) -> Result<(), OnboardingError> {
        self.repository.reset().await?;
        *self.current.lock() = 0;
        info!("Onboarding reset");
        Ok(())
    }
}
