use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{EngineError, Result};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "openai/gpt-4.1-mini";
const MAX_RETRIES: usize = 3;

/// The injected language-model capability. Both classification and place-name
/// extraction go through this, so everything above it can be unit-tested with
/// a scripted fake.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Send one prompt, get the completion text back
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// A model that is never available. Forces the classifier onto its
/// deterministic fallback; used by the offline CLI mode and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineModel;

#[async_trait]
impl CompletionModel for OfflineModel {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(EngineError::Model("offline mode, no model configured".to_string()))
    }
}

/// HTTP client for an OpenAI-compatible chat-completions endpoint
#[derive(Clone, Debug)]
pub struct LlmClient {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a client from `OPENAI_API_KEY` and optional
    /// `OPENAI_BASE_URL` / `OPENROUTER_BASE_URL`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            EngineError::Config(
                "OPENAI_API_KEY environment variable must be set before creating an LlmClient"
                    .to_string(),
            )
        })?;
        let mut client = Self::new(api_key);
        if let Ok(base_url) =
            std::env::var("OPENAI_BASE_URL").or_else(|_| std::env::var("OPENROUTER_BASE_URL"))
        {
            client.base_url = base_url;
        }
        Ok(client)
    }

    async fn chat_completion(&self, body: &Value) -> Result<Value> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| EngineError::Model(format!("Failed to build HTTP client: {err}")))?;

        let mut attempt = 0;
        let mut backoff = Duration::from_millis(250);

        loop {
            let request_url = build_chat_url(&self.base_url);

            let response = client
                .post(&request_url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(body)
                .send()
                .await
                .map_err(|err| EngineError::Model(format!("HTTP request failed: {err}")))?;

            let status = response.status();
            let headers = response.headers().clone();
            let response_text = response
                .text()
                .await
                .map_err(|err| EngineError::Model(format!("Failed to read response: {err}")))?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_duration = headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(backoff);

                if attempt < MAX_RETRIES {
                    tokio::time::sleep(retry_after_duration).await;
                    attempt += 1;
                    backoff *= 2;
                    continue;
                }

                return Err(EngineError::RateLimit {
                    retry_after: retry_after_duration.as_secs().max(1),
                });
            }

            if status.is_server_error() && attempt < MAX_RETRIES {
                debug!(target: "tripcraft::llm", %status, attempt, "server error, retrying");
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            let response_json: Value = serde_json::from_str(&response_text)
                .map_err(|err| EngineError::Model(format!("Failed to parse JSON: {err}")))?;

            if !status.is_success() {
                let api_message = response_json
                    .get("error")
                    .and_then(|error| error.get("message"))
                    .and_then(|value| value.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or(response_text.clone());

                return Err(EngineError::Model(format!(
                    "HTTP {} error: {}",
                    status, api_message
                )));
            }

            if let Some(error) = response_json.get("error") {
                let error_message = error
                    .get("message")
                    .and_then(|value| value.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| error.to_string());
                return Err(EngineError::Model(format!("API error: {}", error_message)));
            }

            return Ok(response_json);
        }
    }
}

#[async_trait]
impl CompletionModel for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self.chat_completion(&body).await?;
        response
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                EngineError::Model("Response contained no message content".to_string())
            })
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_chat_url() {
        assert_eq!(
            build_chat_url("https://openrouter.ai/api/v1"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(
            build_chat_url("https://openrouter.ai/api/v1/"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(
            build_chat_url("https://example.com/v1/chat/completions"),
            "https://example.com/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_offline_model_always_errs() {
        let err = OfflineModel.complete("anything").await.unwrap_err();
        assert_eq!(err.error_code(), "MODEL_ERROR");
    }
}
