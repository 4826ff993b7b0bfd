use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The fixed, closed taxonomy of user intents. Part of the contract with
/// callers; adding a variant is a breaking change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    SearchDestination,
    SearchAttractions,
    SearchHotels,
    SearchFlights,
    SearchRestaurants,
    PlanTrip,
    GetDetails,
    FindNearby,
    CalculateDistance,
    GetDirections,
    WebSearch,
    GetWeather,
    ConvertCurrency,
    EstimateBudget,
    AddActivity,
    RemoveActivity,
    ReplaceActivity,
    ModifyActivity,
    MoveActivity,
    AddDay,
    RemoveDay,
    FindAndAdd,
    CasualChat,
    Unknown,
}

impl Intent {
    /// Whether this intent mutates an existing itinerary rather than
    /// producing new search results
    pub fn is_modification(&self) -> bool {
        matches!(
            self,
            Intent::AddActivity
                | Intent::RemoveActivity
                | Intent::ReplaceActivity
                | Intent::ModifyActivity
                | Intent::MoveActivity
                | Intent::AddDay
                | Intent::RemoveDay
                | Intent::FindAndAdd
        )
    }

    /// The snake_case wire tag for this intent
    pub fn tag(&self) -> &'static str {
        match self {
            Intent::SearchDestination => "search_destination",
            Intent::SearchAttractions => "search_attractions",
            Intent::SearchHotels => "search_hotels",
            Intent::SearchFlights => "search_flights",
            Intent::SearchRestaurants => "search_restaurants",
            Intent::PlanTrip => "plan_trip",
            Intent::GetDetails => "get_details",
            Intent::FindNearby => "find_nearby",
            Intent::CalculateDistance => "calculate_distance",
            Intent::GetDirections => "get_directions",
            Intent::WebSearch => "web_search",
            Intent::GetWeather => "get_weather",
            Intent::ConvertCurrency => "convert_currency",
            Intent::EstimateBudget => "estimate_budget",
            Intent::AddActivity => "add_activity",
            Intent::RemoveActivity => "remove_activity",
            Intent::ReplaceActivity => "replace_activity",
            Intent::ModifyActivity => "modify_activity",
            Intent::MoveActivity => "move_activity",
            Intent::AddDay => "add_day",
            Intent::RemoveDay => "remove_day",
            Intent::FindAndAdd => "find_and_add",
            Intent::CasualChat => "casual_chat",
            Intent::Unknown => "unknown",
        }
    }

    /// Every intent tag, in taxonomy order, for embedding into prompts
    pub fn all_tags() -> Vec<&'static str> {
        ALL_INTENTS.iter().map(Intent::tag).collect()
    }
}

const ALL_INTENTS: [Intent; 24] = [
    Intent::SearchDestination,
    Intent::SearchAttractions,
    Intent::SearchHotels,
    Intent::SearchFlights,
    Intent::SearchRestaurants,
    Intent::PlanTrip,
    Intent::GetDetails,
    Intent::FindNearby,
    Intent::CalculateDistance,
    Intent::GetDirections,
    Intent::WebSearch,
    Intent::GetWeather,
    Intent::ConvertCurrency,
    Intent::EstimateBudget,
    Intent::AddActivity,
    Intent::RemoveActivity,
    Intent::ReplaceActivity,
    Intent::ModifyActivity,
    Intent::MoveActivity,
    Intent::AddDay,
    Intent::RemoveDay,
    Intent::FindAndAdd,
    Intent::CasualChat,
    Intent::Unknown,
];

/// Slot-like entities extracted alongside the intent tag. Every field is
/// independently optional; the intent tag is the discriminant callers switch
/// on, never the shape of this bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IntentEntities {
    /// Destination or place context, e.g. "Paris"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Raw travel-date phrase, e.g. "next weekend"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<String>,
    /// Raw budget phrase, e.g. "under $2000"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    /// Party size phrase, e.g. "2 adults"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people: Option<String>,
    /// Stated preferences, e.g. ["vegetarian", "outdoors"]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferences: Vec<String>,
    /// Coarse category word from the query, e.g. "museum"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Day number the request targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_day: Option<u32>,
    /// Slot label the request targets (morning/afternoon/evening)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    /// Name of an existing activity being referenced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_name: Option<String>,
    /// Id of an existing activity being referenced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    /// Name of a new place to look up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,
    /// Verb the user used for the change, e.g. "add"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
}

/// The classifier's always-well-formed output: intent tag, entity bag,
/// downstream tool names, confidence, and a diagnostic reasoning string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectedIntent {
    pub primary_intent: Intent,
    #[serde(default)]
    pub entities: IntentEntities,
    #[serde(default)]
    pub tools_needed: Vec<String>,
    /// Ranked place-category tags from the augmentation pass, most relevant
    /// first; always drawn from the fixed catalog
    #[serde(default)]
    pub categories: Vec<String>,
    /// In [0, 1]
    pub confidence: f32,
    /// Diagnostic only, never used for control flow
    #[serde(default)]
    pub reasoning: String,
}

impl DetectedIntent {
    pub fn new(primary_intent: Intent, confidence: f32) -> Self {
        Self {
            primary_intent,
            entities: IntentEntities::default(),
            tools_needed: Vec::new(),
            categories: Vec::new(),
            confidence,
            reasoning: String::new(),
        }
    }
}
