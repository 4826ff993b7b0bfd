//! Fixed estimate tables: visit duration by place category and display cost
//! by resolver price tier.

use crate::types::PriceTier;

/// Category keyword → typical visit duration
const DURATION_TABLE: &[(&[&str], &str)] = &[
    (&["museum", "gallery"], "2-3h"),
    (&["park", "garden"], "1-2h"),
    (&["restaurant", "cafe"], "1-1.5h"),
    (&["shop", "store"], "1-3h"),
];

const DEFAULT_DURATION: &str = "1-2h";

/// Estimate a visit duration from a candidate's category tags. The first
/// table row any tag matches wins.
pub fn estimate_duration(categories: &[String]) -> &'static str {
    for (keywords, duration) in DURATION_TABLE {
        for category in categories {
            let category = category.to_lowercase();
            if keywords.iter().any(|k| category.contains(k)) {
                return duration;
            }
        }
    }
    DEFAULT_DURATION
}

/// Map the resolver's five-tier price signal onto a display cost estimate
pub fn estimate_cost(tier: PriceTier) -> &'static str {
    match tier {
        PriceTier::Free => "Free",
        PriceTier::Inexpensive => "$10-20",
        PriceTier::Moderate => "$20-40",
        PriceTier::Expensive => "$40-80",
        PriceTier::VeryExpensive => "$80+",
        PriceTier::Unknown => "$10-30",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_duration_by_category() {
        assert_eq!(estimate_duration(&cats(&["art_gallery"])), "2-3h");
        assert_eq!(estimate_duration(&cats(&["history_museum"])), "2-3h");
        assert_eq!(estimate_duration(&cats(&["botanical_garden"])), "1-2h");
        assert_eq!(estimate_duration(&cats(&["seafood_restaurant"])), "1-1.5h");
        assert_eq!(estimate_duration(&cats(&["coffee_shop"])), "1-3h");
        assert_eq!(estimate_duration(&cats(&["viewpoint"])), DEFAULT_DURATION);
        assert_eq!(estimate_duration(&[]), DEFAULT_DURATION);
    }

    #[test]
    fn test_first_matching_row_wins() {
        // museum outranks park because the table is ordered
        assert_eq!(estimate_duration(&cats(&["museum", "park"])), "2-3h");
    }

    #[test]
    fn test_cost_by_tier() {
        assert_eq!(estimate_cost(PriceTier::Free), "Free");
        assert_eq!(estimate_cost(PriceTier::Inexpensive), "$10-20");
        assert_eq!(estimate_cost(PriceTier::Moderate), "$20-40");
        assert_eq!(estimate_cost(PriceTier::Expensive), "$40-80");
        assert_eq!(estimate_cost(PriceTier::VeryExpensive), "$80+");
        assert_eq!(estimate_cost(PriceTier::Unknown), "$10-30");
    }
}
