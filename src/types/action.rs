use serde::{Deserialize, Serialize};

/// What kind of itinerary mutation an [`Action`] requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Add,
    Remove,
    Replace,
    Modify,
    Move,
    FindAndAdd,
    AddDay,
    RemoveDay,
}

/// Where in the itinerary the action applies. All fields optional; each
/// operation validates the subset it needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_name: Option<String>,
}

/// Free-text and lookup details accompanying an action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferences: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Destination day for a move
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_day: Option<u32>,
    /// Destination slot for a move
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_time_slot: Option<String>,
}

/// The typed command handed from intent detection to the mutation engine.
/// Constructible purely from classifier output plus minimal post-processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default)]
    pub target: ActionTarget,
    #[serde(default)]
    pub details: ActionDetails,
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            target: ActionTarget::default(),
            details: ActionDetails::default(),
        }
    }

    pub fn with_day(mut self, day: u32) -> Self {
        self.target.day = Some(day);
        self
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.target.time_slot = Some(slot.into());
        self
    }

    pub fn with_activity_name(mut self, name: impl Into<String>) -> Self {
        self.target.activity_name = Some(name.into());
        self
    }

    pub fn with_place_name(mut self, name: impl Into<String>) -> Self {
        self.details.place_name = Some(name.into());
        self
    }

    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.details.category = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_destination_slot(mut self, day: u32, slot: impl Into<String>) -> Self {
        self.details.new_day = Some(day);
        self.details.new_time_slot = Some(slot.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape_matches_request_surface() {
        let value = json!({
            "type": "move",
            "target": { "day": 1, "activityName": "Louvre" },
            "details": { "newDay": 2, "newTimeSlot": "afternoon" }
        });
        let action: Action = serde_json::from_value(value).unwrap();
        assert_eq!(action.kind, ActionKind::Move);
        assert_eq!(action.target.day, Some(1));
        assert_eq!(action.details.new_day, Some(2));
        assert_eq!(action.details.new_time_slot.as_deref(), Some("afternoon"));
    }

    #[test]
    fn test_kind_tags_are_snake_case() {
        assert_eq!(
            serde_json::to_value(ActionKind::FindAndAdd).unwrap(),
            json!("find_and_add")
        );
        assert_eq!(
            serde_json::to_value(ActionKind::RemoveDay).unwrap(),
            json!("remove_day")
        );
    }
}
