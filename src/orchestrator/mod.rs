//! Thin coordinator over the classifier, the mutation engine, and the
//! persistence boundary.
//!
//! A message is only treated as an itinerary modification when the detected
//! intent is a modification intent AND an itinerary already exists for the
//! conversation; otherwise the request is delegated to the general
//! conversational path with its downstream tools dispatched concurrently.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::classifier::{prompt, IntentClassifier};
use crate::engine::MutationEngine;
use crate::error::{EngineError, Result};
use crate::services::CompletionModel;
use crate::tools::ToolRegistry;
use crate::types::{
    Action, ActionKind, DetectedIntent, Intent, Itinerary,
};

/// Overall per-request ceiling, covering classification, extraction, and the
/// mutation itself
pub const REQUEST_DEADLINE: Duration = Duration::from_secs(30);

/// Persistence boundary: the orchestrator loads a full itinerary value and
/// stores the full updated value back. Conflict detection between concurrent
/// edits belongs to the caller, not here.
#[async_trait]
pub trait ItineraryStore: Send + Sync {
    async fn load(&self, conversation_id: &str) -> Result<Option<Itinerary>>;
    async fn save(&self, conversation_id: &str, itinerary: &Itinerary) -> Result<()>;
}

/// Simple in-process store, enough for the CLI and tests
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<HashMap<String, Itinerary>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, conversation_id: &str, itinerary: Itinerary) {
        self.inner
            .write()
            .await
            .insert(conversation_id.to_string(), itinerary);
    }
}

#[async_trait]
impl ItineraryStore for InMemoryStore {
    async fn load(&self, conversation_id: &str) -> Result<Option<Itinerary>> {
        Ok(self.inner.read().await.get(conversation_id).cloned())
    }

    async fn save(&self, conversation_id: &str, itinerary: &Itinerary) -> Result<()> {
        self.inner
            .write()
            .await
            .insert(conversation_id.to_string(), itinerary.clone());
        Ok(())
    }
}

/// What a handled message produced
#[derive(Debug)]
pub enum Outcome {
    /// A mutation was applied (or attempted); the response is ready to show
    Applied(ChatResponse),
    /// Not a modification for this conversation; the general conversational
    /// path takes over, with any downstream tool results already gathered
    Delegated {
        intent: DetectedIntent,
        tool_results: Vec<Value>,
    },
}

/// Structured response for a modification attempt. Errors arrive as a short
/// string plus an actionable suggestion, never a stack trace.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary: Option<Itinerary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ChatResponse {
    fn success(message: String, itinerary: Itinerary) -> Self {
        Self {
            message,
            itinerary: Some(itinerary),
            error: None,
            suggestion: None,
        }
    }

    fn failure(err: &EngineError) -> Self {
        Self {
            message: "Sorry, I couldn't make that change.".to_string(),
            itinerary: None,
            error: Some(err.to_string()),
            suggestion: Some(err.suggestion()),
        }
    }
}

/// Coordinates one conversation turn end to end
pub struct ModificationOrchestrator {
    classifier: IntentClassifier,
    engine: MutationEngine,
    model: Arc<dyn CompletionModel>,
    store: Arc<dyn ItineraryStore>,
    tools: Arc<ToolRegistry>,
    deadline: Duration,
}

impl ModificationOrchestrator {
    pub fn new(
        classifier: IntentClassifier,
        engine: MutationEngine,
        model: Arc<dyn CompletionModel>,
        store: Arc<dyn ItineraryStore>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            classifier,
            engine,
            model,
            store,
            tools,
            deadline: REQUEST_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Handle one user message for a conversation. The deadline covers the
    /// whole turn — a stalled model or resolver call becomes a timeout
    /// response, never a hung request.
    pub async fn handle(
        &self,
        conversation_id: &str,
        message: &str,
        history: &[String],
    ) -> Result<Outcome> {
        match tokio::time::timeout(
            self.deadline,
            self.handle_turn(conversation_id, message, history),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                let err = EngineError::Timeout(format!(
                    "the request did not finish within {:?}",
                    self.deadline
                ));
                warn!(target: "tripcraft::orchestrator", error = %err, "request deadline breached");
                Ok(Outcome::Applied(ChatResponse::failure(&err)))
            }
        }
    }

    async fn handle_turn(
        &self,
        conversation_id: &str,
        message: &str,
        history: &[String],
    ) -> Result<Outcome> {
        let intent = self.classifier.detect(message, history).await;
        info!(
            target: "tripcraft::orchestrator",
            intent = intent.primary_intent.tag(),
            confidence = intent.confidence,
            "classified message"
        );

        if !intent.primary_intent.is_modification() {
            let tool_results = self.dispatch_tools(&intent, message).await;
            return Ok(Outcome::Delegated { intent, tool_results });
        }

        // a modification intent without an existing itinerary is delegated,
        // not failed: the conversational path guides the user to create one
        let Some(itinerary) = self.store.load(conversation_id).await? else {
            info!(
                target: "tripcraft::orchestrator",
                intent = intent.primary_intent.tag(),
                "modification intent but no itinerary for conversation"
            );
            return Ok(Outcome::Delegated {
                intent,
                tool_results: Vec::new(),
            });
        };

        let action = self.build_action(&intent, message).await;
        let destination = itinerary.destination.clone();

        match self.engine.apply(&itinerary, &action, &destination).await {
            Ok(outcome) => {
                self.store.save(conversation_id, &outcome.itinerary).await?;
                Ok(Outcome::Applied(ChatResponse::success(
                    outcome.message,
                    outcome.itinerary,
                )))
            }
            Err(err) => {
                warn!(target: "tripcraft::orchestrator", error = %err, "mutation failed");
                Ok(Outcome::Applied(ChatResponse::failure(&err)))
            }
        }
    }

    /// Translate a detected modification intent into a typed engine action
    async fn build_action(&self, intent: &DetectedIntent, message: &str) -> Action {
        let entities = &intent.entities;
        let day_mentions = day_numbers(message);

        match intent.primary_intent {
            Intent::AddActivity => {
                let mut action = Action::new(ActionKind::Add);
                // no guessing: a request naming no day surfaces the engine's
                // "no day number was given" error instead of mutating day 1
                action.target.day = entities.target_day.or(day_mentions.first().copied());
                action.target.time_slot = entities.time_slot.clone();
                action.details.place_name = match &entities.place_name {
                    Some(name) => Some(name.clone()),
                    None => self.extract_place_name(message).await,
                };
                if action.details.place_name.is_none() && entities.category.is_some() {
                    action.details.category = intent.categories.clone();
                }
                action
            }
            Intent::RemoveActivity => {
                let mut action = Action::new(ActionKind::Remove);
                action.target.day = entities.target_day.or(day_mentions.first().copied());
                action.target.activity_id = entities.activity_id.clone();
                action.target.activity_name = entities
                    .activity_name
                    .clone()
                    .or_else(|| entities.place_name.clone());
                action
            }
            Intent::ReplaceActivity => {
                let mut action = Action::new(ActionKind::Replace);
                action.target.day = entities.target_day.or(day_mentions.first().copied());
                action.target.activity_id = entities.activity_id.clone();
                action.target.activity_name = entities.activity_name.clone();
                action.details.place_name = entities.place_name.clone();
                if entities.place_name.is_none() && entities.category.is_some() {
                    action.details.category = intent.categories.clone();
                }
                action
            }
            Intent::MoveActivity => {
                let mut action = Action::new(ActionKind::Move);
                // two day mentions mean "from X to Y"; one means a move
                // within (or into) that day
                let source = entities.target_day.or(day_mentions.first().copied());
                let dest = day_mentions.get(1).copied().or(source);
                action.target.day = source;
                action.target.activity_id = entities.activity_id.clone();
                action.target.activity_name = entities.activity_name.clone();
                action.details.new_day = dest;
                action.details.new_time_slot = entities.time_slot.clone();
                action
            }
            Intent::ModifyActivity => {
                let mut action = Action::new(ActionKind::Modify);
                action.target.day = entities.target_day;
                action.target.activity_name = entities.activity_name.clone();
                action
            }
            Intent::AddDay => Action::new(ActionKind::AddDay),
            Intent::RemoveDay => {
                let mut action = Action::new(ActionKind::RemoveDay);
                action.target.day = entities.target_day.or(day_mentions.first().copied());
                action
            }
            // any remaining modification intent is find_and_add
            _ => {
                let mut action = Action::new(ActionKind::FindAndAdd);
                action.target.day = entities.target_day.or(day_mentions.first().copied());
                action.target.time_slot = entities.time_slot.clone();
                action.details.category = if intent.categories.is_empty() {
                    crate::classifier::default_categories()
                } else {
                    intent.categories.clone()
                };
                action
            }
        }
    }

    /// One free-text extraction call whose only acceptable output is a bare
    /// place name. Anything else counts as extraction failure and leaves the
    /// subject unresolved.
    async fn extract_place_name(&self, message: &str) -> Option<String> {
        let response = match self.model.complete(&prompt::extraction_prompt(message)).await {
            Ok(text) => text,
            Err(err) => {
                warn!(target: "tripcraft::orchestrator", error = %err, "place-name extraction call failed");
                return None;
            }
        };

        let name = response.trim();
        let unusable = name.is_empty()
            || name.contains('\n')
            || name.to_lowercase().contains("sorry")
            || name.len() > 80;
        if unusable {
            warn!(
                target: "tripcraft::orchestrator",
                "place-name extraction returned a non-conforming response"
            );
            return None;
        }
        Some(name.to_string())
    }

    /// Run every requested, registered tool concurrently; one structured
    /// payload per tool, failures included, no cross-cancellation
    async fn dispatch_tools(&self, intent: &DetectedIntent, message: &str) -> Vec<Value> {
        let mut results = Vec::new();
        let mut join_set = JoinSet::new();

        for name in &intent.tools_needed {
            let Some(tool) = self.tools.get(name) else {
                results.push(json!({
                    "tool": name,
                    "error": { "code": "TOOL_NOT_FOUND", "message": format!("no tool named '{name}' is registered") }
                }));
                continue;
            };
            let name = name.clone();
            let params = json!({ "query": message });
            join_set.spawn(async move {
                match tool.execute(params).await {
                    Ok(value) => json!({ "tool": name, "result": value }),
                    Err(err) => json!({ "tool": name, "error": err.to_error_payload()["error"] }),
                }
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(payload) => results.push(payload),
                Err(err) => results.push(json!({
                    "error": { "code": "TOOL_PANIC", "message": err.to_string() }
                })),
            }
        }
        results
    }
}

/// Every "day N" mention in the message, in order of appearance
fn day_numbers(message: &str) -> Vec<u32> {
    let lowered = message.to_lowercase();
    let mut found = Vec::new();
    let mut words = lowered.split_whitespace().peekable();
    while let Some(word) = words.next() {
        let bare = word.trim_matches(|c: char| !c.is_alphanumeric());
        if bare == "day" {
            if let Some(next) = words.peek() {
                let digits: String = next.chars().filter(|c| c.is_ascii_digit()).collect();
                if let Ok(n) = digits.parse() {
                    found.push(n);
                }
            }
        } else if let Some(rest) = bare.strip_prefix("day") {
            if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
                if let Ok(n) = rest.parse() {
                    found.push(n);
                }
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_numbers_in_order() {
        assert_eq!(day_numbers("move the Louvre from day 1 to day 3"), vec![1, 3]);
        assert_eq!(day_numbers("remove it from Day 2"), vec![2]);
        assert_eq!(day_numbers("a lovely day outside"), Vec::<u32>::new());
    }
}
