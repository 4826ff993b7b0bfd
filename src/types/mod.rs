pub mod action;
pub mod intent;
pub mod itinerary;
pub mod place;

pub use action::{Action, ActionDetails, ActionKind, ActionTarget};
pub use intent::{DetectedIntent, Intent, IntentEntities};
pub use itinerary::{Activity, AddedBy, Day, Itinerary, TimeSlot};
pub use place::{Coordinates, PlaceCandidate, PriceTier};
