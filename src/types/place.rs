use serde::{Deserialize, Serialize};

/// Geographic point, WGS84
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Price signal reported by the place resolver, mapped onto the fixed
/// five-tier cost scale when an activity is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    Free,
    Inexpensive,
    Moderate,
    Expensive,
    VeryExpensive,
    Unknown,
}

impl Default for PriceTier {
    fn default() -> Self {
        PriceTier::Unknown
    }
}

/// One ranked candidate returned by a place lookup.
///
/// Candidates arrive pre-ranked, highest relevance first; the engine consumes
/// them in order and never re-ranks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceCandidate {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price_tier: PriceTier,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
}

impl PlaceCandidate {
    /// Minimal candidate, handy for fixtures and tests
    pub fn named(
        id: impl Into<String>,
        display_name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            formatted_address: address.into(),
            coordinates: None,
            rating: None,
            price_tier: PriceTier::Unknown,
            categories: Vec::new(),
            photos: Vec::new(),
        }
    }

    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_price_tier(mut self, tier: PriceTier) -> Self {
        self.price_tier = tier;
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }
}
