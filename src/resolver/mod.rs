//! The place-lookup boundary. Real deployments plug in an API-backed
//! implementation; the crate ships a fixture-backed one for tests, demos,
//! and the CLI.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::PlaceCandidate;

/// External capability returning ranked real-world place candidates for a
/// text query. An empty list is a valid response, not an error; callers
/// decide what absence means.
#[async_trait]
pub trait PlaceResolver: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>>;
}

/// In-memory resolver over a fixed candidate list.
///
/// Matching is naive token overlap against name and category tags, and the
/// fixture order is preserved among equal matches, so tests can rely on
/// rank order.
#[derive(Debug, Clone, Default)]
pub struct StaticPlaceResolver {
    places: Vec<PlaceCandidate>,
}

impl StaticPlaceResolver {
    pub fn new(places: Vec<PlaceCandidate>) -> Self {
        Self { places }
    }

    /// Load a candidate list from a JSON array file
    pub fn from_json(json: &str) -> Result<Self> {
        let places: Vec<PlaceCandidate> = serde_json::from_str(json)?;
        Ok(Self { places })
    }

    fn matches(place: &PlaceCandidate, query: &str) -> bool {
        let haystack = format!(
            "{} {} {}",
            place.display_name,
            place.formatted_address,
            place.categories.join(" ")
        )
        .to_lowercase();

        query
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| token.len() > 2 && *token != "the")
            .any(|token| haystack.contains(token))
    }
}

#[async_trait]
impl PlaceResolver for StaticPlaceResolver {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>> {
        Ok(self
            .places
            .iter()
            .filter(|place| Self::matches(place, query))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> StaticPlaceResolver {
        StaticPlaceResolver::new(vec![
            PlaceCandidate::named("p1", "Louvre Museum", "Rue de Rivoli, Paris")
                .with_categories(&["museum", "art_gallery"]),
            PlaceCandidate::named("p2", "Musée d'Orsay", "Rue de la Légion d'Honneur, Paris")
                .with_categories(&["museum"]),
            PlaceCandidate::named("p3", "Jardin du Luxembourg", "Paris")
                .with_categories(&["park", "garden"]),
        ])
    }

    #[tokio::test]
    async fn test_search_matches_name_tokens() {
        let results = fixture().search("Louvre in Paris").await.unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].id, "p1");
    }

    #[tokio::test]
    async fn test_search_matches_categories_in_fixture_order() {
        let results = fixture().search("museum in Paris").await.unwrap();
        let ids: Vec<&str> = results.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids[..2], ["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_empty_result_is_not_an_error() {
        let results = fixture().search("xyzzy").await.unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_from_json() {
        let resolver = StaticPlaceResolver::from_json(
            r#"[{"id": "a", "displayName": "Test Spot", "formattedAddress": "Somewhere"}]"#,
        )
        .unwrap();
        assert_eq!(resolver.places.len(), 1);
    }
}
