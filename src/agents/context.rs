//! Per-request context handed to every agent.

use std::sync::Arc;

use crate::files::{FileContents, WellKnownFile};
use crate::history::ChatMessage;
use crate::llm::{GenerationRequest, TextGenerator};

use super::AgentType;

/// Everything an agent may look at while answering one request.
///
/// Built fresh by the router for each request and dropped afterwards.
/// Agents receive it by shared reference and cannot change it.
pub struct AgentContext {
    pub app_id: String,

    pub workspace_id: String,

    /// Raw user message
    pub message: String,

    /// Snapshot of the caller's files
    pub files: FileContents,

    /// Transcript up to (not including) this request
    pub history: Vec<ChatMessage>,

    /// Text generation backend for response prose
    pub generator: Arc<dyn TextGenerator>,
}

impl AgentContext {
    pub fn new(
        app_id: impl Into<String>,
        workspace_id: impl Into<String>,
        message: impl Into<String>,
        files: FileContents,
        history: Vec<ChatMessage>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            workspace_id: workspace_id.into(),
            message: message.into(),
            files,
            history,
            generator,
        }
    }

    /// Lower-cased message, the form all keyword matching works on.
    pub fn message_lower(&self) -> String {
        self.message.to_lowercase()
    }

    /// Content of a conventional file, `""` when absent.
    pub fn file(&self, file: WellKnownFile) -> &str {
        file.read(&self.files)
    }

    /// Run the draft through the generator, keeping the draft on failure.
    pub async fn render(&self, agent: AgentType, system_prompt: &str, draft: String) -> String {
        let request = GenerationRequest {
            agent,
            system_prompt: system_prompt.to_string(),
            prompt: self.message.clone(),
            draft,
        };

        match self.generator.generate(&request).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!(
                    "{} generator returned empty text for {}, using draft",
                    self.generator.name(),
                    agent
                );
                request.draft
            }
            Err(e) => {
                tracing::warn!(
                    "{} generator failed for {}, using draft: {}",
                    self.generator.name(),
                    agent,
                    e
                );
                request.draft
            }
        }
    }
}
