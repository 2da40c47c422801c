//! OpenRouter-backed generator with automatic retry for transient errors.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::error::{LlmError, RetryConfig};
use super::{GenerationRequest, TextGenerator};

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Generator that sends each agent prompt to a hosted chat model.
///
/// The agent's rule-based draft is included in the prompt as a baseline the
/// model may refine.
pub struct OpenRouterGenerator {
    client: Client,
    api_key: String,
    model: String,
    retry_config: RetryConfig,
}

impl OpenRouterGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_retry_config(api_key, model, RetryConfig::default())
    }

    pub fn with_retry_config(
        api_key: impl Into<String>,
        model: impl Into<String>,
        retry_config: RetryConfig,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            retry_config,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &GenerationRequest) -> CompletionRequest {
        let user = format!(
            "{}\n\n## Baseline answer\n{}\n\nRewrite the baseline into a helpful reply. \
             Keep every concrete file change it mentions.",
            request.prompt, request.draft
        );
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                CompletionMessage {
                    role: "system",
                    content: request.system_prompt.clone(),
                },
                CompletionMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: Some(0.3),
        }
    }

    fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
        headers
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    async fn send_once(&self, body: &CompletionRequest) -> Result<String, LlmError> {
        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::network_error(format!("Request timeout: {}", e))
                } else {
                    LlmError::network_error(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let retry_after = Self::parse_retry_after(response.headers());
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(LlmError::from_status(status.as_u16(), text, retry_after));
        }

        let parsed: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::parse_error(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::parse_error("No content in response"))
    }

    async fn send_with_retry(&self, body: &CompletionRequest) -> Result<String, LlmError> {
        let start = Instant::now();
        let mut attempt = 0u32;

        loop {
            let error = match self.send_once(body).await {
                Ok(text) => {
                    if attempt > 0 {
                        tracing::info!(
                            "Generation succeeded after {} retries ({:?})",
                            attempt,
                            start.elapsed()
                        );
                    }
                    return Ok(text);
                }
                Err(error) => error,
            };

            if !self.retry_config.should_retry(&error, attempt) {
                return Err(error);
            }

            let remaining = self
                .retry_config
                .max_retry_duration
                .saturating_sub(start.elapsed());
            let delay = error.suggested_delay(attempt).min(remaining);
            if delay.is_zero() {
                return Err(error);
            }

            tracing::warn!(
                "Generation attempt {} failed with {}, retrying in {:?}",
                attempt + 1,
                error.kind,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl TextGenerator for OpenRouterGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        tracing::debug!(
            "Sending {} prompt to OpenRouter: model={}",
            request.agent,
            self.model
        );
        let body = self.build_request(request);
        self.send_with_retry(&body).await
    }

    fn name(&self) -> &str {
        "openrouter"
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<CompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct CompletionMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionContent,
}

#[derive(Debug, Deserialize)]
struct CompletionContent {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentType;

    #[test]
    fn test_request_embeds_draft_and_system_prompt() {
        let generator = OpenRouterGenerator::new("key", "test/model");
        let request = GenerationRequest {
            agent: AgentType::Architect,
            system_prompt: "You are an architect.".to_string(),
            prompt: "review my app".to_string(),
            draft: "Use semantic tags.".to_string(),
        };

        let body = generator.build_request(&request);
        assert_eq!(body.model, "test/model");
        assert_eq!(body.messages[0].role, "system");
        assert_eq!(body.messages[0].content, "You are an architect.");
        assert!(body.messages[1].content.contains("review my app"));
        assert!(body.messages[1].content.contains("Use semantic tags."));
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"Hello"}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Hello"));
    }
}
