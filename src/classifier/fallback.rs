//! Deterministic keyword classifier used whenever the model path is
//! unavailable or returns unusable output.
//!
//! The rules are checked in a fixed priority order and are NOT mutually
//! exclusive, so the order is part of the contract: "add ... plan ..." must
//! fall through to the plan rules, not match the add rule.

use crate::types::{DetectedIntent, Intent};

/// Confidence assigned to every fallback classification
pub const FALLBACK_CONFIDENCE: f32 = 0.6;

/// Classify a query with the ordered keyword rule table. Pure function, no
/// I/O, safe to call from tests directly.
pub fn fallback_classify(query: &str) -> DetectedIntent {
    let q = query.to_lowercase();
    let has = |needle: &str| contains_keyword(&q, needle);
    let any = |needles: &[&str]| needles.iter().any(|n| contains_keyword(&q, n));

    let (intent, category_hint) = if any(&["add", "include"]) && !has("plan") {
        (Intent::AddActivity, None)
    } else if any(&["remove", "delete", "take out"]) {
        (Intent::RemoveActivity, None)
    } else if any(&["replace", "swap", "change to"]) {
        (Intent::ReplaceActivity, None)
    } else if has("move") && (has("day") || has("time")) {
        (Intent::MoveActivity, None)
    } else if any(&["modify", "adjust", "update"]) {
        (Intent::ModifyActivity, None)
    } else if any(&["hotel", "accommodation", "stay"]) {
        (Intent::SearchHotels, None)
    } else if any(&["flight", "fly"]) {
        (Intent::SearchFlights, None)
    } else if any(&["restaurant", "food", "eat"]) {
        (Intent::SearchRestaurants, None)
    } else if has("plan") && has("trip") {
        (Intent::PlanTrip, None)
    } else if has("weather") {
        (Intent::GetWeather, None)
    } else if any(&["distance", "how far"]) {
        (Intent::CalculateDistance, None)
    } else if any(&["nearby", "near"]) {
        (Intent::FindNearby, None)
    } else if has("museum") {
        (Intent::SearchAttractions, Some("museums"))
    } else if has("beach") {
        (Intent::SearchAttractions, Some("beach"))
    } else if has("park") {
        (Intent::SearchAttractions, Some("parks"))
    } else if any(&["search", "find", "show"]) {
        (Intent::SearchAttractions, None)
    } else {
        (Intent::CasualChat, None)
    };

    let mut detected = DetectedIntent::new(intent, FALLBACK_CONFIDENCE);
    detected.reasoning = "keyword fallback".to_string();
    detected.tools_needed = default_tools(intent);
    detected.entities.category = category_hint.map(str::to_string);
    detected.entities.target_day = extract_day_number(&q);
    detected.entities.time_slot = extract_time_slot(&q);

    // best-effort subject extraction for the modification intents; the
    // orchestrator's model-backed extraction takes over when this misses
    match intent {
        Intent::AddActivity => {
            detected.entities.place_name = extract_subject(query, &["add", "include"]);
        }
        Intent::RemoveActivity => {
            detected.entities.activity_name =
                extract_subject(query, &["remove", "delete", "take out"]);
        }
        Intent::MoveActivity => {
            detected.entities.activity_name = extract_subject(query, &["move"]);
        }
        Intent::ReplaceActivity => {
            detected.entities.activity_name = extract_subject(query, &["replace", "swap"]);
            detected.entities.place_name = extract_replacement(query);
        }
        _ => {}
    }
    detected
}

/// Keyword check for the rule table. Multi-word needles match as plain
/// substrings; single words anchor at a word start so that e.g. "weather"
/// does not satisfy "eat" ("museums" still satisfies "museum").
fn contains_keyword(query: &str, needle: &str) -> bool {
    if needle.contains(' ') {
        return query.contains(needle);
    }
    query
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word.starts_with(needle))
}

/// Static per-intent downstream tool list, used when no model supplied one
pub fn default_tools(intent: Intent) -> Vec<String> {
    let tools: &[&str] = match intent {
        Intent::SearchDestination | Intent::SearchAttractions | Intent::FindNearby => {
            &["places_search"]
        }
        Intent::SearchHotels => &["places_search", "hotel_search"],
        Intent::SearchFlights => &["flight_search"],
        Intent::SearchRestaurants => &["places_search"],
        Intent::PlanTrip => &["places_search", "itinerary_builder"],
        Intent::GetWeather => &["weather"],
        Intent::CalculateDistance | Intent::GetDirections => &["directions"],
        Intent::WebSearch | Intent::GetDetails => &["web_search"],
        Intent::ConvertCurrency | Intent::EstimateBudget => &["currency"],
        _ => &[],
    };
    tools.iter().map(|t| t.to_string()).collect()
}

/// Best-effort "day N" scan. Intent tags never depend on this; a miss just
/// leaves the entity unset.
fn extract_day_number(query: &str) -> Option<u32> {
    let mut words = query.split_whitespace().peekable();
    while let Some(word) = words.next() {
        if word.trim_matches(|c: char| !c.is_alphanumeric()) == "day" {
            if let Some(next) = words.peek() {
                let digits: String = next.chars().filter(|c| c.is_ascii_digit()).collect();
                if !digits.is_empty() {
                    return digits.parse().ok();
                }
            }
        } else if let Some(rest) = word.strip_prefix("day") {
            // "day2" written as one token
            let digits: String = rest.chars().filter(|c| c.is_ascii_digit()).collect();
            if !digits.is_empty() {
                return digits.parse().ok();
            }
        }
    }
    None
}

/// The phrase after the action verb, cut at the first connective, with
/// leading articles stripped: "add the Louvre to day 1" -> "Louvre"
fn extract_subject(query: &str, verbs: &[&str]) -> Option<String> {
    // ASCII-only lowering keeps byte offsets valid in the original string
    let lower: String = query.chars().map(|c| c.to_ascii_lowercase()).collect();

    let after_verb = verbs
        .iter()
        .find_map(|verb| lower.find(&format!("{} ", verb)).map(|pos| pos + verb.len() + 1))?;

    let rest = &query[after_verb..];
    let rest_lower = &lower[after_verb..];
    let cut = [" to ", " from ", " on ", " in ", " at ", " with ", " for "]
        .iter()
        .filter_map(|sep| rest_lower.find(sep))
        .min()
        .unwrap_or(rest.len());

    clean_phrase(&rest[..cut])
}

/// For a replace request, the phrase after "with"/"for" names the new place:
/// "swap the museum for a park" -> "park"
fn extract_replacement(query: &str) -> Option<String> {
    let lower: String = query.chars().map(|c| c.to_ascii_lowercase()).collect();
    let after = [" with ", " for "]
        .iter()
        .filter_map(|sep| lower.find(sep).map(|pos| pos + sep.len()))
        .min()?;
    clean_phrase(&query[after..])
}

fn clean_phrase(phrase: &str) -> Option<String> {
    let mut phrase = phrase.trim().trim_matches(|c: char| ",.!?".contains(c)).trim();
    for article in ["the ", "The ", "a ", "A ", "an ", "An "] {
        if let Some(stripped) = phrase.strip_prefix(article) {
            phrase = stripped;
            break;
        }
    }
    let phrase = phrase.trim();
    if phrase.is_empty() {
        None
    } else {
        Some(phrase.to_string())
    }
}

fn extract_time_slot(query: &str) -> Option<String> {
    ["morning", "afternoon", "evening"]
        .iter()
        .find(|slot| query.contains(*slot))
        .map(|slot| slot.to_string())
}
