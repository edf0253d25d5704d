//! Static destination catalog.

mod data;

use serde::Serialize;

pub use data::{DESTINATIONS, LOCAL_DEALS};

/// A bookable destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Destination {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub image: &'static str,
    pub description: Option<&'static str>,
    pub price: Option<&'static str>,
}

impl Destination {
    /// Case-insensitive match against title, subtitle and description.
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.subtitle.to_lowercase().contains(needle)
            || self
                .description
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

/// A discounted local experience, offered in the `es` locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocalDeal {
    pub id: &'static str,
    pub title: &'static str,
    pub discount: &'static str,
    pub description: &'static str,
}

/// Read-only view over the compiled-in destinations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog;

impl Catalog {
    pub fn all(&self) -> &'static [Destination] {
        &DESTINATIONS
    }

    pub fn get(&self, id: &str) -> Option<&'static Destination> {
        DESTINATIONS.iter().find(|d| d.id == id)
    }

    /// Destinations matching `query`. A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&'static Destination> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        DESTINATIONS.iter().filter(|d| d.matches(&needle)).collect()
    }

    /// Catalog entries for `ids`, in catalog order. Unknown ids are skipped.
    pub fn resolve(&self, ids: &[String]) -> Vec<&'static Destination> {
        DESTINATIONS
            .iter()
            .filter(|d| ids.iter().any(|id| id == d.id))
            .collect()
    }

    pub fn local_deals(&self) -> &'static [LocalDeal] {
        &LOCAL_DEALS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let catalog = Catalog;
        assert_eq!(catalog.all().len(), 11);
        for d in catalog.all() {
            assert_eq!(catalog.get(d.id).map(|found| found.title), Some(d.title));
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let results = Catalog.search("  PARIS ");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "1");
    }

    #[test]
    fn test_search_covers_subtitle_and_description() {
        let titles: Vec<_> = Catalog.search("culture").iter().map(|d| d.title).collect();
        assert!(titles.contains(&"Paris"));
        assert!(titles.contains(&"Bali"));
        assert!(titles.contains(&"Kyoto"));

        assert_eq!(Catalog.search("big apple")[0].title, "New York");
    }

    #[test]
    fn test_blank_query_matches_nothing() {
        assert!(Catalog.search("   ").is_empty());
        assert!(Catalog.search("atlantis").is_empty());
    }

    #[test]
    fn test_resolve_skips_unknown_ids() {
        let ids = vec!["11".to_string(), "nope".to_string(), "2".to_string()];
        let titles: Vec<_> = Catalog.resolve(&ids).iter().map(|d| d.title).collect();
        assert_eq!(titles, vec!["Tokyo", "London"]);
    }
}
