//! Tracking helpers for UI interactions.
//!
//! Each helper reads the current locale and config snapshots, so callers
//! only pass what the UI knows.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::watch;

use crate::analytics::{events, Tracker};
use crate::catalog::{Catalog, Destination};
use crate::experiments::ExperimentConfig;
use crate::locale::Locale;

pub const SUMMER_PROMO_BANNER: &str = "summer_promo";

#[derive(Clone)]
pub struct Interactions {
    tracker: Arc<Tracker>,
    locale: watch::Receiver<Locale>,
    config: watch::Receiver<ExperimentConfig>,
    catalog: Catalog,
}

impl Interactions {
    pub fn new(
        tracker: Arc<Tracker>,
        locale: watch::Receiver<Locale>,
        config: watch::Receiver<ExperimentConfig>,
    ) -> Self {
        Self {
            tracker,
            locale,
            config,
            catalog: Catalog,
        }
    }

    pub async fn cta_clicked(&self, destination_id: &str) {
        let (text, color) = {
            let config = self.config.borrow();
            (config.cta_text, config.cta_color.clone())
        };
        self.tracker
            .track(
                events::CTA_CLICKED,
                json!({ "destination_id": destination_id, "cta_text": text, "cta_color": color }),
            )
            .await;
    }

    pub async fn banner_clicked(&self, banner_type: &str) {
        let locale = *self.locale.borrow();
        self.tracker
            .track(
                events::BANNER_CLICKED,
                json!({ "locale": locale.as_str(), "banner_type": banner_type }),
            )
            .await;
    }

    pub async fn booking_initiated(&self, destination_id: &str) {
        let badge = self.config.borrow().premium_badge;
        self.tracker
            .track(
                events::BOOKING_INITIATED,
                json!({ "destination_id": destination_id, "premium_badge": badge }),
            )
            .await;
    }

    pub async fn local_deal_clicked(&self, deal_id: &str) {
        let locale = *self.locale.borrow();
        self.tracker
            .track(
                events::LOCAL_DEAL_CLICKED,
                json!({ "deal_id": deal_id, "locale": locale.as_str() }),
            )
            .await;
    }

    /// Run a search as the user types. Non-blank queries are tracked.
    pub async fn search(&self, query: &str) -> Vec<&'static Destination> {
        let results = self.catalog.search(query);
        if !query.trim().is_empty() {
            self.tracker
                .track(
                    events::SEARCH_QUERY,
                    json!({ "query": query, "results_count": results.len() }),
                )
                .await;
        }
        results
    }

    pub async fn search_submitted(&self, query: &str) {
        let results_count = self.catalog.search(query).len();
        self.tracker
            .track(
                events::SEARCH_SUBMITTED,
                json!({ "query": query, "results_count": results_count }),
            )
            .await;
    }

    pub async fn search_result_clicked(&self, destination_id: &str, query: &str) {
        self.tracker
            .track(
                events::SEARCH_RESULT_CLICKED,
                json!({ "destination_id": destination_id, "query": query }),
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiments::Variant;
    use crate::flags::ProviderSlot;

    fn interactions(locale: Locale, config: ExperimentConfig) -> (Interactions, Arc<Tracker>) {
        let (_locale_tx, locale_rx) = watch::channel(locale);
        let (_config_tx, config_rx) = watch::channel(config);
        let tracker = Arc::new(Tracker::new(
            ProviderSlot::empty(),
            locale_rx.clone(),
            config_rx.clone(),
            false,
            32,
        ));
        (Interactions::new(tracker.clone(), locale_rx, config_rx), tracker)
    }

    #[tokio::test]
    async fn test_cta_clicked_reports_current_variant() {
        let (ui, tracker) = interactions(Locale::En, Variant::B.config());
        ui.cta_clicked("4").await;

        let event = tracker.last_event(events::CTA_CLICKED).unwrap();
        assert_eq!(event.properties["destination_id"], json!("4"));
        assert_eq!(event.properties["cta_text"], json!("Reserve Spot"));
        assert_eq!(event.properties["cta_color"], json!("#4CAF50"));
    }

    #[tokio::test]
    async fn test_banner_and_deal_clicks_carry_locale() {
        let (ui, tracker) = interactions(Locale::Fr, ExperimentConfig::default());
        ui.banner_clicked(SUMMER_PROMO_BANNER).await;
        ui.local_deal_clicked("2").await;

        let banner = tracker.last_event(events::BANNER_CLICKED).unwrap();
        assert_eq!(banner.properties["locale"], json!("fr"));
        assert_eq!(banner.properties["banner_type"], json!("summer_promo"));
        let deal = tracker.last_event(events::LOCAL_DEAL_CLICKED).unwrap();
        assert_eq!(deal.properties["deal_id"], json!("2"));
    }

    #[tokio::test]
    async fn test_booking_reports_badge() {
        let (ui, tracker) = interactions(Locale::En, ExperimentConfig::default());
        ui.booking_initiated("1").await;

        let event = tracker.last_event(events::BOOKING_INITIATED).unwrap();
        assert_eq!(event.properties["premium_badge"], json!("pro"));
    }

    #[tokio::test]
    async fn test_search_submitted_reports_results() {
        let (ui, tracker) = interactions(Locale::En, ExperimentConfig::default());
        ui.search_submitted("culture").await;

        let event = tracker.last_event(events::SEARCH_SUBMITTED).unwrap();
        assert_eq!(event.properties["query"], json!("culture"));
        assert_eq!(event.properties["results_count"], json!(3));
    }

    #[tokio::test]
    async fn test_blank_search_is_not_tracked() {
        let (ui, tracker) = interactions(Locale::En, ExperimentConfig::default());

        assert!(ui.search("  ").await.is_empty());
        assert!(tracker.last_event(events::SEARCH_QUERY).is_none());

        let results = ui.search("Tokyo").await;
        assert_eq!(results.len(), 1);
        let event = tracker.last_event(events::SEARCH_QUERY).unwrap();
        assert_eq!(event.properties["query"], json!("Tokyo"));
        assert_eq!(event.properties["results_count"], json!(1));

        ui.search_result_clicked(results[0].id, "Tokyo").await;
        let click = tracker.last_event(events::SEARCH_RESULT_CLICKED).unwrap();
        assert_eq!(click.properties["destination_id"], json!("2"));
    }
}
