use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tripcraft::{
    CompletionModel, Day, EngineError, InMemoryStore, Intent, IntentClassifier, Itinerary,
    ItineraryStore, ModificationOrchestrator, MutationEngine, Outcome, PlaceCandidate,
    PlaceResolver, PlacesSearchTool, ToolRegistry,
};

/// Model scripted with one canned response per call; errors once exhausted
struct ScriptedModel {
    responses: Mutex<Vec<tripcraft::Result<String>>>,
}

impl ScriptedModel {
    fn new(responses: Vec<tripcraft::Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
        })
    }

    /// A model that always fails, forcing the fallback classifier
    fn offline() -> Arc<Self> {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, _prompt: &str) -> tripcraft::Result<String> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(EngineError::Model("script exhausted".to_string()))
        } else {
            responses.remove(0)
        }
    }
}

struct FixedResolver {
    results: Vec<PlaceCandidate>,
}

#[async_trait]
impl PlaceResolver for FixedResolver {
    async fn search(&self, _query: &str) -> tripcraft::Result<Vec<PlaceCandidate>> {
        Ok(self.results.clone())
    }
}

/// Model whose calls never complete within any test deadline
struct HangingModel;

#[async_trait]
impl CompletionModel for HangingModel {
    async fn complete(&self, _prompt: &str) -> tripcraft::Result<String> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(EngineError::Model("unreachable".to_string()))
    }
}

/// Resolver that takes longer than any test deadline
struct SlowResolver;

#[async_trait]
impl PlaceResolver for SlowResolver {
    async fn search(&self, _query: &str) -> tripcraft::Result<Vec<PlaceCandidate>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Vec::new())
    }
}

fn paris_itinerary() -> Itinerary {
    Itinerary {
        destination: "Paris".to_string(),
        duration: 1,
        days: vec![Day::with_default_slots(1)],
    }
}

fn orchestrator_with(
    model: Arc<dyn CompletionModel>,
    resolver: Arc<dyn PlaceResolver>,
    store: Arc<InMemoryStore>,
) -> ModificationOrchestrator {
    let mut tools = ToolRegistry::new();
    tools.register(PlacesSearchTool::new(resolver.clone()));
    ModificationOrchestrator::new(
        IntentClassifier::new(model.clone()),
        MutationEngine::new(resolver),
        model,
        store,
        Arc::new(tools),
    )
}

#[tokio::test]
async fn modification_without_itinerary_is_delegated() {
    let store = Arc::new(InMemoryStore::new());
    let orchestrator = orchestrator_with(
        ScriptedModel::offline(),
        Arc::new(FixedResolver { results: vec![] }),
        store,
    );

    let outcome = orchestrator
        .handle("c1", "add the Louvre to day 1", &[])
        .await
        .unwrap();
    match outcome {
        Outcome::Delegated { intent, tool_results } => {
            assert_eq!(intent.primary_intent, Intent::AddActivity);
            assert!(tool_results.is_empty());
        }
        other => panic!("expected delegation, got {other:?}"),
    }
}

#[tokio::test]
async fn modification_with_itinerary_is_applied_and_persisted() {
    let store = Arc::new(InMemoryStore::new());
    store.seed("c1", paris_itinerary()).await;

    let louvre = PlaceCandidate::named("p1", "Louvre Museum", "Paris")
        .with_categories(&["museum"]);
    let orchestrator = orchestrator_with(
        ScriptedModel::offline(),
        Arc::new(FixedResolver { results: vec![louvre] }),
        store.clone(),
    );

    let outcome = orchestrator
        .handle("c1", "add the Louvre to day 1 morning", &[])
        .await
        .unwrap();
    match outcome {
        Outcome::Applied(response) => {
            assert!(response.error.is_none(), "unexpected error: {response:?}");
            assert!(response.message.starts_with("Added"));
        }
        other => panic!("expected applied, got {other:?}"),
    }

    // the updated itinerary was stored back
    let stored = store.load("c1").await.unwrap().unwrap();
    assert_eq!(stored.activity_count(), 1);
}

#[tokio::test]
async fn non_modification_intent_dispatches_tools() {
    let store = Arc::new(InMemoryStore::new());
    store.seed("c1", paris_itinerary()).await;

    let orchestrator = orchestrator_with(
        ScriptedModel::offline(),
        Arc::new(FixedResolver {
            results: vec![PlaceCandidate::named("p1", "Best Museum", "Paris")],
        }),
        store,
    );

    let outcome = orchestrator.handle("c1", "best museums?", &[]).await.unwrap();
    match outcome {
        Outcome::Delegated { intent, tool_results } => {
            assert_eq!(intent.primary_intent, Intent::SearchAttractions);
            assert_eq!(tool_results.len(), 1);
            assert_eq!(tool_results[0]["tool"], "places_search");
            assert_eq!(tool_results[0]["result"][0]["displayName"], "Best Museum");
        }
        other => panic!("expected delegation, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_tools_fail_per_item_without_aborting_others() {
    let store = Arc::new(InMemoryStore::new());
    // hand-written intent payload asking for one real and one missing tool
    let payload = json!({
        "primary_intent": "search_hotels",
        "entities": { "location": "Paris" },
        "tools_needed": ["places_search", "hotel_search"],
        "confidence": 0.9,
        "reasoning": "hotel query"
    })
    .to_string();
    let model = ScriptedModel::new(vec![
        Ok(payload),
        Ok("[]".to_string()), // category augmentation
    ]);

    let orchestrator = orchestrator_with(
        model,
        Arc::new(FixedResolver {
            results: vec![PlaceCandidate::named("h1", "Grand Hotel", "Paris")],
        }),
        store,
    );

    let outcome = orchestrator
        .handle("c1", "find me a hotel in Paris", &[])
        .await
        .unwrap();
    let Outcome::Delegated { tool_results, .. } = outcome else {
        panic!("expected delegation");
    };

    assert_eq!(tool_results.len(), 2);
    let missing = tool_results
        .iter()
        .find(|r| r["tool"] == "hotel_search")
        .unwrap();
    assert_eq!(missing["error"]["code"], "TOOL_NOT_FOUND");
    let ok = tool_results
        .iter()
        .find(|r| r["tool"] == "places_search")
        .unwrap();
    assert!(ok.get("error").is_none());
}

#[tokio::test]
async fn failed_extraction_surfaces_missing_subject() {
    let store = Arc::new(InMemoryStore::new());
    store.seed("c1", paris_itinerary()).await;

    // classification succeeds but yields no place name; the extraction call
    // then returns an apology, which must not be used as a place name
    let payload = json!({
        "primary_intent": "add_activity",
        "entities": { "target_day": 1, "time_slot": "morning" },
        "tools_needed": [],
        "confidence": 0.85,
        "reasoning": "add request with no subject"
    })
    .to_string();
    let model = ScriptedModel::new(vec![
        Ok(payload),
        Ok("[]".to_string()), // category augmentation
        Ok("Sorry, I could not find a place name in that message.".to_string()),
    ]);

    let orchestrator = orchestrator_with(
        model,
        Arc::new(FixedResolver { results: vec![] }),
        store.clone(),
    );

    let outcome = orchestrator
        .handle("c1", "add something nice to day 1", &[])
        .await
        .unwrap();
    let Outcome::Applied(response) = outcome else {
        panic!("expected applied");
    };
    let error = response.error.expect("expected an error");
    assert!(error.contains("place name or category"));
    assert!(response.suggestion.is_some());

    // the stored itinerary is untouched
    let stored = store.load("c1").await.unwrap().unwrap();
    assert_eq!(stored, paris_itinerary());
}

#[tokio::test]
async fn deadline_breach_becomes_timeout_response() {
    let store = Arc::new(InMemoryStore::new());
    store.seed("c1", paris_itinerary()).await;

    let mut tools = ToolRegistry::new();
    let resolver = Arc::new(SlowResolver);
    tools.register(PlacesSearchTool::new(resolver.clone()));
    let model = ScriptedModel::offline();
    let orchestrator = ModificationOrchestrator::new(
        IntentClassifier::new(model.clone()),
        MutationEngine::new(resolver),
        model,
        store.clone(),
        Arc::new(tools),
    )
    .with_deadline(Duration::from_millis(50));

    let outcome = orchestrator
        .handle("c1", "add the Louvre to day 1", &[])
        .await
        .unwrap();
    let Outcome::Applied(response) = outcome else {
        panic!("expected applied");
    };
    let error = response.error.expect("expected an error");
    assert!(error.to_lowercase().contains("did not finish"));

    // no partial mutation escaped the deadline
    let stored = store.load("c1").await.unwrap().unwrap();
    assert_eq!(stored, paris_itinerary());
}

#[tokio::test]
async fn deadline_covers_stalled_model_calls() {
    let store = Arc::new(InMemoryStore::new());
    store.seed("c1", paris_itinerary()).await;

    // classification itself hangs; the turn must still come back as a
    // timeout response instead of blocking on the model
    let orchestrator = orchestrator_with(
        Arc::new(HangingModel),
        Arc::new(FixedResolver { results: vec![] }),
        store.clone(),
    )
    .with_deadline(Duration::from_millis(100));

    let handled = tokio::time::timeout(
        Duration::from_secs(2),
        orchestrator.handle("c1", "add the Louvre to day 1", &[]),
    )
    .await
    .expect("handle returned within the deadline");

    let Outcome::Applied(response) = handled.unwrap() else {
        panic!("expected applied");
    };
    let error = response.error.expect("expected an error");
    assert!(error.to_lowercase().contains("did not finish"));
    assert_eq!(store.load("c1").await.unwrap().unwrap(), paris_itinerary());
}

#[tokio::test]
async fn add_without_day_surfaces_day_error() {
    let store = Arc::new(InMemoryStore::new());
    store.seed("c1", paris_itinerary()).await;

    let louvre = PlaceCandidate::named("p1", "Louvre Museum", "Paris");
    let orchestrator = orchestrator_with(
        ScriptedModel::offline(),
        Arc::new(FixedResolver { results: vec![louvre] }),
        store.clone(),
    );

    // no day mentioned anywhere: the engine's error comes back instead of a
    // silently guessed day 1
    let outcome = orchestrator
        .handle("c1", "please add the Louvre", &[])
        .await
        .unwrap();
    let Outcome::Applied(response) = outcome else {
        panic!("expected applied");
    };
    let error = response.error.expect("expected an error");
    assert!(error.contains("no day number"));
    assert!(response.suggestion.is_some());
    assert_eq!(store.load("c1").await.unwrap().unwrap(), paris_itinerary());
}

#[tokio::test]
async fn casual_message_is_delegated_without_tools() {
    let orchestrator = orchestrator_with(
        ScriptedModel::offline(),
        Arc::new(FixedResolver { results: vec![] }),
        Arc::new(InMemoryStore::new()),
    );

    let outcome = orchestrator.handle("c1", "thanks, you rock", &[]).await.unwrap();
    let Outcome::Delegated { intent, tool_results } = outcome else {
        panic!("expected delegation");
    };
    assert_eq!(intent.primary_intent, Intent::CasualChat);
    assert!(tool_results.is_empty());
}
