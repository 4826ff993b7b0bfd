use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::place::{Coordinates, PlaceCandidate};
use crate::engine::estimates::{estimate_cost, estimate_duration};

/// A full multi-day trip plan: the value the mutation engine transforms.
///
/// Invariant: `duration == days.len()` and day numbers are exactly
/// `1..=duration` with no gaps. Every mutation that changes the day count
/// re-establishes this before returning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub destination: String,
    pub duration: u32,
    pub days: Vec<Day>,
}

impl Itinerary {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            duration: 0,
            days: Vec::new(),
        }
    }

    pub fn day(&self, day_number: u32) -> Option<&Day> {
        self.days.iter().find(|d| d.day_number == day_number)
    }

    pub fn day_mut(&mut self, day_number: u32) -> Option<&mut Day> {
        self.days.iter_mut().find(|d| d.day_number == day_number)
    }

    /// Comma-separated list of existing day numbers, for error messages
    pub fn available_days(&self) -> String {
        self.days
            .iter()
            .map(|d| d.day_number.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Total activity count across every day and slot
    pub fn activity_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| d.time_slots.iter())
            .map(|s| s.activities.len())
            .sum()
    }
}

/// One numbered day of the trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub day_number: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

impl Day {
    /// A fresh day with the three standard empty slots
    pub fn with_default_slots(day_number: u32) -> Self {
        Self {
            day_number,
            title: format!("Day {}", day_number),
            time_slots: vec![
                TimeSlot::empty("morning", "09:00 - 12:00"),
                TimeSlot::empty("afternoon", "14:00 - 18:00"),
                TimeSlot::empty("evening", "19:00 - 22:00"),
            ],
        }
    }

    /// Locate a slot by label, case-insensitively, across both historical
    /// label fields
    pub fn slot_mut(&mut self, wanted: &str) -> Option<&mut TimeSlot> {
        self.time_slots.iter_mut().find(|s| s.matches(wanted))
    }

    pub fn slot(&self, wanted: &str) -> Option<&TimeSlot> {
        self.time_slots.iter().find(|s| s.matches(wanted))
    }

    /// Comma-separated slot labels, for error messages
    pub fn available_slots(&self) -> String {
        self.time_slots
            .iter()
            .map(TimeSlot::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A fixed period of one day (morning / afternoon / evening).
///
/// Stored itineraries predate a field rename, so the period label may arrive
/// under either `label` or `period`. Both are kept as written and lookup
/// treats them as synonyms; new slots only set `label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl TimeSlot {
    pub fn empty(label: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            period: None,
            time: time.into(),
            activities: Vec::new(),
        }
    }

    /// The display name of this slot, whichever field carries it
    pub fn name(&self) -> &str {
        self.label
            .as_deref()
            .or(self.period.as_deref())
            .unwrap_or("unlabeled")
    }

    /// Case-insensitive label match against either label field
    pub fn matches(&self, wanted: &str) -> bool {
        let wanted = wanted.trim();
        [self.label.as_deref(), self.period.as_deref()]
            .into_iter()
            .flatten()
            .any(|l| l.eq_ignore_ascii_case(wanted))
    }
}

/// Who put an activity on the itinerary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddedBy {
    System,
    User,
}

impl Default for AddedBy {
    fn default() -> Self {
        AddedBy::System
    }
}

/// One bookable/visitable item inside a time slot.
///
/// Activities are value objects owned by exactly one slot; moving one between
/// slots transfers ownership, it never aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Opaque unique id (UUID for engine-created activities)
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Display estimate, e.g. "2-3h"
    #[serde(default)]
    pub duration: String,
    /// Display estimate, e.g. "$10-30" or "Free"
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub added_by: AddedBy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl Activity {
    /// Build a user-requested activity from a resolved place candidate,
    /// estimating duration from its category and cost from its price tier
    pub fn from_candidate(candidate: &PlaceCandidate, destination: &str) -> Self {
        let category = candidate
            .categories
            .first()
            .cloned()
            .unwrap_or_else(|| "attraction".to_string());
        let description = match candidate.categories.first() {
            Some(tag) => format!("{} in {}", tag.replace('_', " "), destination),
            None => format!("Suggested stop in {}", destination),
        };
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: candidate.display_name.clone(),
            description,
            duration: estimate_duration(&candidate.categories).to_string(),
            cost: estimate_cost(candidate.price_tier).to_string(),
            category,
            place_id: Some(candidate.id.clone()),
            coordinates: candidate.coordinates,
            rating: candidate.rating,
            photos: candidate.photos.clone(),
            address: Some(candidate.formatted_address.clone()),
            added_by: AddedBy::User,
            added_at: Some(Utc::now()),
        }
    }

    /// Case-insensitive substring match on the activity name
    pub fn name_matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_matches_either_label_field() {
        let labeled = TimeSlot::empty("morning", "09:00 - 12:00");
        assert!(labeled.matches("Morning"));
        assert!(labeled.matches("MORNING"));
        assert!(!labeled.matches("evening"));

        let legacy = TimeSlot {
            label: None,
            period: Some("morning".to_string()),
            time: String::new(),
            activities: Vec::new(),
        };
        assert!(legacy.matches("Morning"));
        assert_eq!(legacy.name(), "morning");
    }

    #[test]
    fn test_default_slots() {
        let day = Day::with_default_slots(3);
        assert_eq!(day.title, "Day 3");
        assert_eq!(day.time_slots.len(), 3);
        assert_eq!(day.available_slots(), "morning, afternoon, evening");
        assert_eq!(day.time_slots[1].time, "14:00 - 18:00");
    }

    #[test]
    fn test_legacy_period_field_round_trips() {
        let json = r#"{
            "destination": "Paris",
            "duration": 1,
            "days": [{
                "dayNumber": 1,
                "title": "Day 1",
                "timeSlots": [{"period": "morning", "time": "09:00 - 12:00", "activities": []}]
            }]
        }"#;
        let itinerary: Itinerary = serde_json::from_str(json).unwrap();
        let slot = &itinerary.days[0].time_slots[0];
        assert!(slot.label.is_none());
        assert_eq!(slot.period.as_deref(), Some("morning"));

        let back = serde_json::to_value(&itinerary).unwrap();
        let slot_json = &back["days"][0]["timeSlots"][0];
        assert!(slot_json.get("label").is_none());
        assert_eq!(slot_json["period"], "morning");
    }

    #[test]
    fn test_activity_name_match_is_substring_and_case_insensitive() {
        let mut activity = Activity::from_candidate(
            &PlaceCandidate::named("p1", "Eiffel Tower", "Champ de Mars, Paris"),
            "Paris",
        );
        activity.name = "Eiffel Tower".to_string();
        assert!(activity.name_matches("eiffel"));
        assert!(activity.name_matches("TOWER"));
        assert!(!activity.name_matches("louvre"));
    }
}
