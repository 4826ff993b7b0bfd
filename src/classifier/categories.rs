//! Static place-category reference data.
//!
//! The catalog is data, not logic: the augmentation call filters model output
//! against it, the keyword table maps a coarse query word to catalog entries,
//! and the default set is the last resort when both of those come up empty.

/// Hard-coded categories returned when neither the model nor the keyword
/// table produced anything usable
pub const DEFAULT_CATEGORIES: [&str; 3] = ["tourist_attraction", "museum", "park"];

/// The fixed category vocabulary. Model-suggested tags outside this list are
/// discarded.
pub const CATEGORY_CATALOG: &[&str] = &[
    "amusement_park",
    "aquarium",
    "archaeological_site",
    "art_gallery",
    "bakery",
    "bar",
    "basilica",
    "beach",
    "beer_garden",
    "bistro",
    "boat_tour",
    "book_store",
    "botanical_garden",
    "bowling_alley",
    "brewery",
    "bridge",
    "brunch_restaurant",
    "buffet_restaurant",
    "cafe",
    "campground",
    "canal",
    "casino",
    "castle",
    "cathedral",
    "cave",
    "cemetery",
    "chapel",
    "cheese_shop",
    "chocolate_shop",
    "church",
    "cinema",
    "city_hall",
    "cliff",
    "clothing_store",
    "cocktail_bar",
    "coffee_shop",
    "concert_hall",
    "convention_center",
    "craft_market",
    "cultural_center",
    "day_spa",
    "department_store",
    "dessert_shop",
    "distillery",
    "diving_center",
    "farmers_market",
    "ferry_terminal",
    "fine_dining_restaurant",
    "flea_market",
    "food_court",
    "food_market",
    "fort",
    "fountain",
    "garden",
    "gift_shop",
    "golf_course",
    "gondola_ride",
    "harbor",
    "heritage_site",
    "hiking_trail",
    "historical_landmark",
    "history_museum",
    "hot_spring",
    "ice_cream_shop",
    "island",
    "jazz_club",
    "karaoke_bar",
    "lake",
    "library",
    "lighthouse",
    "live_music_venue",
    "lookout_point",
    "market",
    "memorial",
    "monastery",
    "monument",
    "mosque",
    "mountain_peak",
    "movie_theater",
    "museum",
    "national_park",
    "nature_reserve",
    "night_club",
    "night_market",
    "observation_deck",
    "observatory",
    "old_town",
    "opera_house",
    "palace",
    "park",
    "pedestrian_street",
    "photography_spot",
    "pier",
    "planetarium",
    "playground",
    "plaza",
    "promenade",
    "pub",
    "ramen_restaurant",
    "river_cruise",
    "rock_climbing_gym",
    "rooftop_bar",
    "ruins",
    "science_museum",
    "sculpture_garden",
    "seafood_restaurant",
    "shopping_mall",
    "shrine",
    "skate_park",
    "ski_resort",
    "skyscraper",
    "souvenir_shop",
    "spa",
    "sports_stadium",
    "stadium",
    "steakhouse",
    "street_art",
    "street_food_stall",
    "surf_spot",
    "sushi_restaurant",
    "swimming_pool",
    "synagogue",
    "tapas_restaurant",
    "tea_house",
    "temple",
    "theater",
    "theme_park",
    "tourist_attraction",
    "tower",
    "town_square",
    "toy_store",
    "vegan_restaurant",
    "vegetarian_restaurant",
    "viewpoint",
    "village",
    "vineyard",
    "water_park",
    "waterfall",
    "waterfront",
    "wildlife_park",
    "windmill",
    "wine_bar",
    "winery",
    "zoo",
];

/// Coarse keyword → catalog categories, keyed by the classifier's extracted
/// `category` entity when the augmentation model call is unavailable
const KEYWORD_CATEGORIES: &[(&str, &[&str])] = &[
    ("museum", &["museum", "art_gallery", "history_museum"]),
    ("museums", &["museum", "art_gallery", "history_museum"]),
    ("art", &["art_gallery", "museum", "street_art"]),
    ("gallery", &["art_gallery", "museum"]),
    ("park", &["park", "garden", "botanical_garden"]),
    ("parks", &["park", "garden", "botanical_garden"]),
    ("garden", &["garden", "botanical_garden", "park"]),
    ("nature", &["national_park", "nature_reserve", "hiking_trail"]),
    ("hike", &["hiking_trail", "national_park", "mountain_peak"]),
    ("hiking", &["hiking_trail", "national_park", "mountain_peak"]),
    ("beach", &["beach", "waterfront", "promenade"]),
    ("beaches", &["beach", "waterfront", "promenade"]),
    ("food", &["seafood_restaurant", "food_market", "street_food_stall"]),
    ("restaurant", &["fine_dining_restaurant", "bistro", "seafood_restaurant"]),
    ("restaurants", &["fine_dining_restaurant", "bistro", "seafood_restaurant"]),
    ("coffee", &["coffee_shop", "cafe", "bakery"]),
    ("cafe", &["cafe", "coffee_shop", "tea_house"]),
    ("bar", &["cocktail_bar", "rooftop_bar", "wine_bar"]),
    ("bars", &["cocktail_bar", "rooftop_bar", "wine_bar"]),
    ("nightlife", &["night_club", "live_music_venue", "jazz_club"]),
    ("shopping", &["shopping_mall", "market", "department_store"]),
    ("market", &["market", "farmers_market", "night_market"]),
    ("history", &["historical_landmark", "monument", "heritage_site"]),
    ("historic", &["historical_landmark", "monument", "heritage_site"]),
    ("church", &["church", "cathedral", "basilica"]),
    ("temple", &["temple", "shrine", "monastery"]),
    ("castle", &["castle", "palace", "fort"]),
    ("view", &["viewpoint", "observation_deck", "lookout_point"]),
    ("views", &["viewpoint", "observation_deck", "lookout_point"]),
    ("kids", &["amusement_park", "zoo", "aquarium"]),
    ("family", &["amusement_park", "zoo", "aquarium"]),
    ("water", &["boat_tour", "river_cruise", "waterfront"]),
    ("wine", &["winery", "vineyard", "wine_bar"]),
    ("spa", &["spa", "day_spa", "hot_spring"]),
    ("theater", &["theater", "opera_house", "concert_hall"]),
    ("music", &["live_music_venue", "concert_hall", "jazz_club"]),
];

/// Whether a tag belongs to the fixed vocabulary
pub fn in_catalog(tag: &str) -> bool {
    CATEGORY_CATALOG.binary_search(&tag).is_ok()
}

/// Look up catalog categories for a coarse keyword (the classifier's
/// extracted `category` entity). Empty when the keyword is unknown.
pub fn categories_for_keyword(keyword: &str) -> Vec<String> {
    let keyword = keyword.trim().to_lowercase();
    KEYWORD_CATEGORIES
        .iter()
        .find(|(k, _)| *k == keyword)
        .map(|(_, cats)| cats.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default()
}

/// The last-resort category set
pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_sorted_for_binary_search() {
        let mut sorted = CATEGORY_CATALOG.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, CATEGORY_CATALOG);
    }

    #[test]
    fn test_in_catalog() {
        assert!(in_catalog("museum"));
        assert!(in_catalog("zoo"));
        assert!(!in_catalog("spaceport"));
    }

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(
            categories_for_keyword("Museums"),
            vec!["museum", "art_gallery", "history_museum"]
        );
        assert!(categories_for_keyword("quantum").is_empty());
    }

    #[test]
    fn test_keyword_table_only_references_catalog_entries() {
        for (_, cats) in KEYWORD_CATEGORIES {
            for cat in cats.iter() {
                assert!(in_catalog(cat), "{cat} missing from catalog");
            }
        }
        for cat in DEFAULT_CATEGORIES {
            assert!(in_catalog(cat));
        }
    }
}
