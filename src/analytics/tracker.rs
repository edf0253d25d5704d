//! Event tracker with ambient context.

use std::collections::VecDeque;

use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::experiments::ExperimentConfig;
use crate::flags::{Properties, ProviderSlot};
use crate::locale::Locale;

/// Where a tracked event ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Captured by the flag provider.
    Provider,
    /// No provider session; logged locally.
    Local,
    /// The provider rejected the capture; logged locally.
    Failed,
}

/// A tracked event as sent, kept in the tracker's journal.
#[derive(Debug, Clone, Serialize)]
pub struct TrackedEvent {
    pub event: String,
    pub properties: Properties,
    pub delivery: Delivery,
}

/// Forwards analytics events to the provider, enriched with the current
/// locale, a timestamp and (in static mode) the current experiments.
pub struct Tracker {
    provider: ProviderSlot,
    locale: watch::Receiver<Locale>,
    config: watch::Receiver<ExperimentConfig>,
    embed_experiments: bool,
    journal: Mutex<VecDeque<TrackedEvent>>,
    journal_capacity: usize,
}

impl Tracker {
    pub fn new(
        provider: ProviderSlot,
        locale: watch::Receiver<Locale>,
        config: watch::Receiver<ExperimentConfig>,
        embed_experiments: bool,
        journal_capacity: usize,
    ) -> Self {
        Self {
            provider,
            locale,
            config,
            embed_experiments,
            journal: Mutex::new(VecDeque::with_capacity(journal_capacity.min(1024))),
            journal_capacity,
        }
    }

    /// Track `event`.
    ///
    /// `properties` should be a JSON object; `null` means none. Ambient keys
    /// (`locale`, `timestamp`, `experiments`) overwrite caller keys of the
    /// same name.
    pub async fn track(&self, event: &str, properties: Value) {
        let properties = self.enrich(properties);

        let delivery = match self.provider.get() {
            Some(provider) => match provider.capture(event, properties.clone()).await {
                Ok(()) => {
                    debug!("Event tracked: {}", event);
                    Delivery::Provider
                }
                Err(e) => {
                    warn!("Failed to capture '{}': {}", event, e);
                    let logged = Value::Object(properties.clone());
                    info!("[Analytics] {} {}", event, logged);
                    Delivery::Failed
                }
            },
            None => {
                let logged = Value::Object(properties.clone());
                info!(
                    "[Analytics] Provider not available, logging locally: {} {}",
                    event, logged
                );
                Delivery::Local
            }
        };

        self.record(TrackedEvent {
            event: event.to_string(),
            properties,
            delivery,
        });
    }

    /// Recently tracked events, oldest first.
    pub fn recent_events(&self) -> Vec<TrackedEvent> {
        self.journal.lock().iter().cloned().collect()
    }

    /// Most recent event with the given name.
    pub fn last_event(&self, event: &str) -> Option<TrackedEvent> {
        self.journal
            .lock()
            .iter()
            .rev()
            .find(|e| e.event == event)
            .cloned()
    }

    fn enrich(&self, properties: Value) -> Properties {
        let mut props = match properties {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };

        let locale = *self.locale.borrow();
        props.insert("locale".to_string(), Value::String(locale.as_str().to_string()));

        if self.embed_experiments {
            let experiments = serde_json::to_value(&*self.config.borrow()).unwrap_or(Value::Null);
            props.insert("experiments".to_string(), experiments);
        }

        props.insert(
            "timestamp".to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        props
    }

    fn record(&self, event: TrackedEvent) {
        if self.journal_capacity == 0 {
            return;
        }
        let mut journal = self.journal.lock();
        while journal.len() >= self.journal_capacity {
            journal.pop_front();
        }
        journal.push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::experiments::Variant;
    use crate::flags::InMemoryFlagProvider;
    use serde_json::json;

    fn tracker(slot: ProviderSlot, embed: bool, capacity: usize) -> (Tracker, watch::Sender<Locale>) {
        let (locale_tx, locale_rx) = watch::channel(Locale::Fr);
        let (_config_tx, config_rx) = watch::channel(Variant::B.config());
        (Tracker::new(slot, locale_rx, config_rx, embed, capacity), locale_tx)
    }

    #[tokio::test]
    async fn test_ambient_context_without_properties() {
        let (tracker, _locale) = tracker(ProviderSlot::empty(), false, 8);
        tracker.track("ping", Value::Null).await;

        let event = tracker.last_event("ping").unwrap();
        assert_eq!(event.delivery, Delivery::Local);
        assert_eq!(event.properties["locale"], json!("fr"));
        let timestamp = event.properties["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
        assert!(!event.properties.contains_key("experiments"));
    }

    #[tokio::test]
    async fn test_ambient_keys_overwrite_caller_keys() {
        let (tracker, locale) = tracker(ProviderSlot::empty(), true, 8);
        locale.send_replace(Locale::Es);

        tracker
            .track("x", json!({ "locale": "zz", "destination_id": "3" }))
            .await;

        let event = tracker.last_event("x").unwrap();
        assert_eq!(event.properties["locale"], json!("es"));
        assert_eq!(event.properties["destination_id"], json!("3"));
        assert_eq!(
            event.properties["experiments"],
            serde_json::to_value(Variant::B.config()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_forwards_to_provider() {
        let provider = Arc::new(InMemoryFlagProvider::new());
        let (tracker, _locale) = tracker(ProviderSlot::ready(provider.clone()), false, 8);

        tracker.track("cta_clicked", json!({ "destination_id": "1" })).await;

        let captured = provider.captured_named("cta_clicked");
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].properties["destination_id"], json!("1"));
        assert_eq!(tracker.last_event("cta_clicked").unwrap().delivery, Delivery::Provider);
    }

    #[tokio::test]
    async fn test_failed_capture_is_not_lost() {
        let provider = Arc::new(InMemoryFlagProvider::new());
        provider.set_failing(true);
        let (tracker, _locale) = tracker(ProviderSlot::ready(provider), false, 8);

        tracker.track("x", Value::Null).await;
        assert_eq!(tracker.last_event("x").unwrap().delivery, Delivery::Failed);
    }

    #[tokio::test]
    async fn test_journal_is_bounded() {
        let (tracker, _locale) = tracker(ProviderSlot::empty(), false, 2);
        for name in ["a", "b", "c"] {
            tracker.track(name, Value::Null).await;
        }

        let names: Vec<_> = tracker.recent_events().into_iter().map(|e| e.event).collect();
        assert_eq!(names, vec!["b", "c"]);
    }
}
