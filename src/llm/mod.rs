//! Text generation behind the agents.
//!
//! Every agent composes a rule-based draft from keyword matching, then hands
//! it to a [`TextGenerator`] together with a prompt. The
//! [`TemplateGenerator`] returns the draft unchanged, which keeps the whole
//! router deterministic; [`OpenRouterGenerator`] asks a hosted model instead.
//! Swapping one for the other never touches the router or the action
//! pipeline.

mod error;
mod openrouter;

pub use error::{classify_http_status, LlmError, LlmErrorKind, RetryConfig};
pub use openrouter::OpenRouterGenerator;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agents::AgentType;

/// Input to a single generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Agent asking for text
    pub agent: AgentType,
    /// Role instructions for the model
    pub system_prompt: String,
    /// The user's request plus whatever context the agent gathered
    pub prompt: String,
    /// Rule-based response body the agent would send on its own
    pub draft: String,
}

/// Pluggable text generation capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce the response body for `request`.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Deterministic generator that returns the agent's draft verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

#[async_trait]
impl TextGenerator for TemplateGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        Ok(request.draft.clone())
    }

    fn name(&self) -> &str {
        "template"
    }
}
