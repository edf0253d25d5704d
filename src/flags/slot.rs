//! Provider availability as an explicit, awaitable dependency.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use super::SharedProvider;

/// Holds the flag provider session once it exists.
///
/// Consumers either read the current handle (`get`) or await readiness with
/// a bound (`wait_ready`). Clones share the same slot.
#[derive(Clone)]
pub struct ProviderSlot {
    tx: Arc<watch::Sender<Option<SharedProvider>>>,
}

impl ProviderSlot {
    /// A slot with no provider yet.
    pub fn empty() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// A slot that is ready from the start.
    pub fn ready(provider: SharedProvider) -> Self {
        let slot = Self::empty();
        slot.attach(provider);
        slot
    }

    /// Publish the provider session and wake every waiter.
    pub fn attach(&self, provider: SharedProvider) {
        info!("Flag provider session attached");
        self.tx.send_replace(Some(provider));
    }

    /// Drop the provider session.
    pub fn detach(&self) {
        debug!("Flag provider session detached");
        self.tx.send_replace(None);
    }

    /// Current provider session, if one exists.
    pub fn get(&self) -> Option<SharedProvider> {
        self.tx.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Wait until a provider is attached, or give up after `timeout`.
    pub async fn wait_ready(&self, timeout: Duration) -> Option<SharedProvider> {
        let mut rx = self.tx.subscribe();
        let outcome = tokio::time::timeout(timeout, rx.wait_for(Option::is_some)).await;
        match outcome {
            Ok(Ok(provider)) => (*provider).clone(),
            Ok(Err(_)) => None,
            Err(_) => {
                info!("Flag provider not ready after {:?}", timeout);
                None
            }
        }
    }
}

impl Default for ProviderSlot {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for ProviderSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSlot")
            .field("ready", &self.is_ready())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::InMemoryFlagProvider;

    #[tokio::test]
    async fn test_wait_ready_times_out_when_empty() {
        let slot = ProviderSlot::empty();
        assert!(slot.wait_ready(Duration::from_millis(10)).await.is_none());
        assert!(!slot.is_ready());
    }

    #[tokio::test]
    async fn test_wait_ready_wakes_on_attach() {
        let slot = ProviderSlot::empty();
        let waiter = {
            let slot = slot.clone();
            tokio::spawn(async move { slot.wait_ready(Duration::from_secs(5)).await.is_some() })
        };

        tokio::task::yield_now().await;
        slot.attach(Arc::new(InMemoryFlagProvider::new()));

        assert!(waiter.await.unwrap());
        assert!(slot.is_ready());

        slot.detach();
        assert!(slot.get().is_none());
    }
}
