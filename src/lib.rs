//! tripcraft: a conversational itinerary-modification engine
//!
//! This library takes free-text travel messages ("add the Louvre to day 2
//! morning"), classifies them into a fixed intent taxonomy, and applies the
//! requested change to a structured day / time-slot / activity itinerary
//! while keeping its numbering and ownership invariants intact.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tripcraft::{
//!     IntentClassifier, InMemoryStore, LlmClient, ModificationOrchestrator,
//!     MutationEngine, PlacesSearchTool, StaticPlaceResolver, ToolRegistry,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let model = Arc::new(LlmClient::from_env()?);
//!     let resolver = Arc::new(StaticPlaceResolver::default());
//!     let mut tools = ToolRegistry::new();
//!     tools.register(PlacesSearchTool::new(resolver.clone()));
//!
//!     let orchestrator = ModificationOrchestrator::new(
//!         IntentClassifier::new(model.clone()),
//!         MutationEngine::new(resolver),
//!         model,
//!         Arc::new(InMemoryStore::new()),
//!         Arc::new(tools),
//!     );
//!
//!     let outcome = orchestrator
//!         .handle("conversation-1", "add the Louvre to day 2 morning", &[])
//!         .await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod resolver;
pub(crate) mod services;
pub mod tools;
pub mod types;

pub use classifier::{fallback_classify, IntentClassifier, CATEGORY_CATALOG, FALLBACK_CONFIDENCE};
pub use engine::{MutationEngine, MutationOutcome};
pub use error::{EngineError, Result};
pub use orchestrator::{
    ChatResponse, InMemoryStore, ItineraryStore, ModificationOrchestrator, Outcome,
    REQUEST_DEADLINE,
};
pub use resolver::{PlaceResolver, StaticPlaceResolver};
pub use services::{CompletionModel, LlmClient, OfflineModel};
pub use tools::{PlacesSearchTool, Tool, ToolRegistry};
pub use types::{
    Action, ActionDetails, ActionKind, ActionTarget, Activity, AddedBy, Coordinates, Day,
    DetectedIntent, Intent, IntentEntities, Itinerary, PlaceCandidate, PriceTier, TimeSlot,
};

#[cfg(feature = "cli")]
pub mod cli;
