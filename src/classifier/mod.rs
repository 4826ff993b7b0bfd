//! Intent detection over free-text travel messages.
//!
//! The classifier never fails: the model-backed path is tried (once, then
//! retried once on unusable output), and any remaining failure degrades to
//! the deterministic keyword fallback. Callers always receive a well-formed
//! [`DetectedIntent`].

pub mod categories;
pub mod fallback;
pub mod prompt;

use std::sync::{Arc, OnceLock};

use jsonschema::JSONSchema;
use schemars::schema_for;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::services::CompletionModel;
use crate::types::DetectedIntent;

pub use categories::{categories_for_keyword, default_categories, CATEGORY_CATALOG};
pub use fallback::{fallback_classify, FALLBACK_CONFIDENCE};

/// Classifies user messages into the fixed intent taxonomy
pub struct IntentClassifier {
    model: Arc<dyn CompletionModel>,
}

impl IntentClassifier {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Classify a query, optionally with recent conversation turns for
    /// context. Infallible: internal failures are logged and downgraded to
    /// the keyword fallback.
    pub async fn detect(&self, query: &str, history: &[String]) -> DetectedIntent {
        match self.classify_with_model(query, history).await {
            Ok(mut detected) => {
                detected.confidence = detected.confidence.clamp(0.0, 1.0);
                detected.categories = self.augment_categories(query, &detected).await;
                detected
            }
            Err(err) => {
                warn!(
                    target: "tripcraft::classifier",
                    error = %err,
                    "model classification unusable, using keyword fallback"
                );
                let mut detected = fallback_classify(query);
                // the fallback never calls external services, so the
                // category list comes straight from the static tables
                detected.categories = static_categories(&detected);
                detected
            }
        }
    }

    async fn classify_with_model(
        &self,
        query: &str,
        history: &[String],
    ) -> Result<DetectedIntent> {
        let prompt = prompt::classification_prompt(query, history, payload_schema_text());

        let mut last_err = EngineError::Model("classification not attempted".to_string());
        // one retry on unusable output, then the caller falls back
        for attempt in 0..2 {
            match self.model.complete(&prompt).await {
                Ok(text) => match parse_intent_payload(&text) {
                    Ok(detected) => return Ok(detected),
                    Err(err) => {
                        debug!(
                            target: "tripcraft::classifier",
                            attempt,
                            error = %err,
                            "model output failed to parse"
                        );
                        last_err = err;
                    }
                },
                Err(err) => {
                    debug!(target: "tripcraft::classifier", attempt, error = %err, "model call failed");
                    last_err = err;
                }
            }
        }
        Err(last_err)
    }

    /// Second, independent model call producing ranked category tags; falls
    /// back to the static keyword table, then to the default set
    async fn augment_categories(&self, query: &str, detected: &DetectedIntent) -> Vec<String> {
        match self
            .model
            .complete(&prompt::categories_prompt(query, CATEGORY_CATALOG))
            .await
        {
            Ok(text) => {
                let ranked = parse_category_list(&text);
                if !ranked.is_empty() {
                    return ranked;
                }
                debug!(
                    target: "tripcraft::classifier",
                    "category augmentation returned no catalog tags"
                );
                static_categories(detected)
            }
            Err(err) => {
                debug!(target: "tripcraft::classifier", error = %err, "category augmentation call failed");
                static_categories(detected)
            }
        }
    }
}

/// Keyword-table categories for the extracted `category` entity, or the
/// hard-coded defaults when that yields nothing
fn static_categories(detected: &DetectedIntent) -> Vec<String> {
    if let Some(keyword) = &detected.entities.category {
        let mapped = categories_for_keyword(keyword);
        if !mapped.is_empty() {
            return mapped;
        }
    }
    default_categories()
}

/// Parse a classification payload out of raw model output: first JSON
/// object, schema validation, then diagnosable deserialization
fn parse_intent_payload(text: &str) -> Result<DetectedIntent> {
    let raw = prompt::first_json_object(text)
        .ok_or_else(|| EngineError::Model("no JSON object in model output".to_string()))?;
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| EngineError::Model(format!("invalid JSON in model output: {err}")))?;

    if let Err(errors) = compiled_payload_schema().validate(&value) {
        let detail = errors
            .take(3)
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(EngineError::Model(format!(
            "model output failed schema validation: {detail}"
        )));
    }

    serde_path_to_error::deserialize(value).map_err(|err| {
        EngineError::Model(format!(
            "model output failed to deserialize at {}: {}",
            err.path(),
            err
        ))
    })
}

/// Parse the augmentation response: a JSON array if one is present, else a
/// comma/newline-separated list. Tags outside the catalog are discarded.
fn parse_category_list(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = match prompt::first_json_array(text)
        .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
    {
        Some(parsed) => parsed,
        None => text
            .split(|c| c == ',' || c == '\n')
            .map(|s| s.trim().trim_matches(|c| c == '"' || c == '`' || c == '-').trim().to_string())
            .collect(),
    };
    tags.retain(|tag| categories::in_catalog(tag));
    tags.dedup();
    tags.truncate(5);
    tags
}

fn payload_schema_value() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        serde_json::to_value(schema_for!(DetectedIntent))
            .unwrap_or_else(|err| panic!("failed to serialize intent payload schema: {err}"))
    })
}

fn payload_schema_text() -> &'static str {
    static TEXT: OnceLock<String> = OnceLock::new();
    TEXT.get_or_init(|| payload_schema_value().to_string())
}

fn compiled_payload_schema() -> &'static JSONSchema {
    static COMPILED: OnceLock<JSONSchema> = OnceLock::new();
    COMPILED.get_or_init(|| {
        JSONSchema::compile(payload_schema_value())
            .unwrap_or_else(|err| panic!("intent payload schema does not compile: {err}"))
    })
}
