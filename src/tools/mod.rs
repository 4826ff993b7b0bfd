//! Downstream tool surface for non-modification intents.
//!
//! The classifier names the tools a request needs; the orchestrator
//! dispatches them concurrently through this registry and collects one
//! payload (result or structured error) per tool.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{EngineError, Result};
use crate::resolver::PlaceResolver;

/// A tool that can be invoked for a classified request
#[async_trait]
pub trait Tool: Send + Sync {
    /// The name of the tool (matches the classifier's `tools_needed` entries)
    fn name(&self) -> &'static str;

    /// A description of what the tool does
    fn description(&self) -> &'static str;

    /// JSON Schema for the tool's parameters
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with given parameters
    async fn execute(&self, parameters: serde_json::Value) -> Result<serde_json::Value>;
}

/// Registry for available tools. Tools are held behind `Arc` so concurrent
/// dispatch can run each invocation on its own task.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Names of all registered tools
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }
}

#[derive(Debug, Deserialize)]
struct PlacesSearchParams {
    query: String,
    #[serde(default)]
    limit: Option<usize>,
}

/// Place lookup exposed as a dispatchable tool, backed by whatever
/// [`PlaceResolver`] the pipeline was built with
pub struct PlacesSearchTool {
    resolver: Arc<dyn PlaceResolver>,
}

impl PlacesSearchTool {
    pub fn new(resolver: Arc<dyn PlaceResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Tool for PlacesSearchTool {
    fn name(&self) -> &'static str {
        "places_search"
    }

    fn description(&self) -> &'static str {
        "Search for places matching a text query, ranked by relevance"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "limit": {"type": "integer", "minimum": 1}
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, parameters: serde_json::Value) -> Result<serde_json::Value> {
        let params: PlacesSearchParams = serde_json::from_value(parameters)
            .map_err(|e| EngineError::Resolver(format!("Invalid parameters: {}", e)))?;

        let mut results = self.resolver.search(&params.query).await?;
        if let Some(limit) = params.limit {
            results.truncate(limit);
        }
        serde_json::to_value(results).map_err(EngineError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::StaticPlaceResolver;
    use crate::types::PlaceCandidate;
    use serde_json::json;

    fn registry() -> ToolRegistry {
        let resolver = Arc::new(StaticPlaceResolver::new(vec![PlaceCandidate::named(
            "p1",
            "Louvre Museum",
            "Paris",
        )]));
        let mut registry = ToolRegistry::new();
        registry.register(PlacesSearchTool::new(resolver));
        registry
    }

    #[tokio::test]
    async fn test_places_search_tool() {
        let registry = registry();
        assert!(registry.has_tool("places_search"));
        assert!(!registry.has_tool("teleporter"));

        let tool = registry.get("places_search").unwrap();
        let result = tool
            .execute(json!({ "query": "Louvre in Paris" }))
            .await
            .unwrap();
        assert_eq!(result[0]["id"], "p1");
    }

    #[tokio::test]
    async fn test_places_search_rejects_bad_params() {
        let tool = registry().get("places_search").unwrap();
        let err = tool.execute(json!({ "limit": 3 })).await.unwrap_err();
        assert_eq!(err.error_code(), "RESOLVER_ERROR");
    }

    #[test]
    fn test_tool_schema_is_object() {
        let tool = registry().get("places_search").unwrap();
        let schema = tool.parameters_schema();
        assert!(schema.is_object());
        assert!(schema.get("properties").is_some());
    }
}
