//! Agents module - the five roles behind the chat sidebar.
//!
//! # Agent Types
//! - **ManagerAgent**: triages every routed request and delegates to a specialist
//! - **EditorAgent**: proposes concrete edits to the app files
//! - **ArchitectAgent**: read-only structural review
//! - **AdvisorAgent**: read-only guidance and next steps
//! - **ShepherdAgent**: read-only progress and quality audit
//!
//! All five share the [`Agent`] trait. Each derives a draft from keyword
//! heuristics and passes it through the context's text generator.

mod context;
mod keywords;
mod task;
mod types;
pub mod leaf;
pub mod orchestrator;

pub use context::AgentContext;
pub use keywords::Keywords;
pub use leaf::{AdvisorAgent, ArchitectAgent, EditorAgent, ShepherdAgent};
pub use orchestrator::{DelegationRule, DelegationRules, ManagerAgent};
pub use task::{Complexity, Priority, Scope, TaskAnalysis};
pub use types::{
    ActionKind, AgentAction, AgentError, AgentIdentity, AgentResponse, AgentType, Capabilities,
    Delegation,
};

use async_trait::async_trait;

/// Base trait for all agents.
///
/// # Invariants
/// - `process()` never fails; when nothing actionable comes out of a request
///   it returns an explanatory, completed response with no actions
/// - `process()` output starts with the agent's display name
/// - `capabilities()` is fixed for the lifetime of the agent
#[async_trait]
pub trait Agent: Send + Sync {
    fn agent_type(&self) -> AgentType;

    fn capabilities(&self) -> Capabilities;

    /// Fixed role description. The first line is the advertised summary.
    fn description(&self) -> &str;

    /// Whether this agent is suited to a classified task.
    ///
    /// Advisory only: the router does not consult it before dispatch.
    fn is_capable_of(&self, task: &TaskAnalysis) -> bool;

    /// Answer one request.
    async fn process(&self, ctx: &AgentContext) -> AgentResponse;

    fn analyze_task(&self, ctx: &AgentContext) -> TaskAnalysis {
        TaskAnalysis::classify(&ctx.message)
    }

    fn can_handle(&self, ctx: &AgentContext) -> bool {
        self.is_capable_of(&self.analyze_task(ctx))
    }

    fn identity(&self) -> AgentIdentity {
        let agent_type = self.agent_type();
        AgentIdentity {
            agent_type,
            name: agent_type.display_name().to_string(),
            role: self
                .description()
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .to_string(),
            capabilities: self.capabilities(),
        }
    }
}

/// Prefix a response body with the agent's display name.
pub(crate) fn signed(agent: AgentType, body: &str) -> String {
    format!("**{}**\n\n{}", agent.display_name(), body.trim())
}

/// Markdown bullet list.
pub(crate) fn bullets<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_prefixes_display_name() {
        let text = signed(AgentType::Shepherd, "  All good.\n");
        assert_eq!(text, "**Project Shepherd**\n\nAll good.");
    }

    #[test]
    fn test_identity_uses_first_description_line() {
        let editor = EditorAgent::new();
        let identity = editor.identity();

        assert_eq!(identity.agent_type, AgentType::Editor);
        assert_eq!(identity.name, "Code Editor");
        assert!(!identity.role.contains('\n'));
        assert!(identity.capabilities.can_edit_files);
    }
}
