//! Request router.
//!
//! # Flow
//! 1. Build an [`AgentContext`] from the request and a history snapshot
//! 2. Record the user turn
//! 3. Run the manager; if it delegates, record its turn and run the specialist
//! 4. Record the answering agent's turn and return its response
//!
//! The router owns the conversation history and all entry points take
//! `&mut self`, so one router serves one conversation at a time. Share it
//! across tasks behind a `tokio::sync::Mutex`.

mod actions;
mod registry;

pub use actions::{execute, ActionOutcome, AgentAttribution, SaveFiles};
pub use registry::AgentRegistry;

use std::sync::Arc;

use crate::agents::{
    AgentAction, AgentContext, AgentError, AgentIdentity, AgentResponse, AgentType,
};
use crate::config::Config;
use crate::files::FileContents;
use crate::history::{ChatMessage, ConversationHistory};
use crate::llm::TextGenerator;

/// Routes requests to the agents and keeps the conversation transcript.
pub struct AgentManager {
    registry: AgentRegistry,
    history: ConversationHistory,
    generator: Arc<dyn TextGenerator>,
}

impl AgentManager {
    pub fn new(config: Config) -> Self {
        let generator = config.generator();
        Self::with_generator(config, generator)
    }

    /// Use a specific generator instead of the one the config implies.
    pub fn with_generator(config: Config, generator: Arc<dyn TextGenerator>) -> Self {
        tracing::debug!(
            "Agent router using '{}' generator, history limit {}",
            generator.name(),
            config.history_limit
        );
        Self {
            registry: AgentRegistry::new(config.delegation_rules),
            history: ConversationHistory::with_limit(config.history_limit),
            generator,
        }
    }

    fn context(
        &self,
        message: &str,
        app_id: &str,
        files: FileContents,
        workspace_id: &str,
    ) -> AgentContext {
        AgentContext::new(
            app_id,
            workspace_id,
            message,
            files,
            self.history.to_vec(),
            Arc::clone(&self.generator),
        )
    }

    fn record(&mut self, response: &AgentResponse) {
        self.history
            .push(ChatMessage::assistant(response.agent, response.transcript_text()));
    }

    /// Route a request through the manager.
    ///
    /// Returns the specialist's response when the manager delegates, the
    /// manager's own response otherwise.
    pub async fn process_request(
        &mut self,
        message: &str,
        app_id: &str,
        files: FileContents,
        workspace_id: &str,
    ) -> AgentResponse {
        let ctx = self.context(message, app_id, files, workspace_id);
        self.history.push(ChatMessage::user(message));
        tracing::info!("Routing request for app {} through manager", app_id);

        let triage = self.registry.get(AgentType::Manager).process(&ctx).await;
        self.record(&triage);

        let Some(delegation) = triage.delegation.clone() else {
            return triage;
        };

        tracing::info!(
            "Delegated to {} ({})",
            delegation.target,
            delegation.reason
        );
        let response = self.registry.get(delegation.target).process(&ctx).await;
        self.record(&response);
        response
    }

    /// Send a request straight to one agent, skipping the manager.
    ///
    /// # Errors
    ///
    /// Returns `AgentError::UnknownAgent` if `agent_type` names no agent.
    /// History is left untouched in that case.
    pub async fn process_with_agent(
        &mut self,
        agent_type: &str,
        message: &str,
        app_id: &str,
        files: FileContents,
        workspace_id: &str,
    ) -> Result<AgentResponse, AgentError> {
        let agent_type: AgentType = agent_type.parse()?;

        let ctx = self.context(message, app_id, files, workspace_id);
        self.history.push(ChatMessage::user(message));
        tracing::info!("Direct request to {} for app {}", agent_type, app_id);

        let response = self.registry.get(agent_type).process(&ctx).await;
        self.record(&response);
        Ok(response)
    }

    pub fn available_agents(&self) -> Vec<AgentIdentity> {
        self.registry.list()
    }

    /// Apply actions to a copy of `files`; see [`execute`].
    pub async fn execute_actions(
        &self,
        actions: &[AgentAction],
        files: &FileContents,
        agent: Option<AgentType>,
        save: Option<&dyn SaveFiles>,
    ) -> ActionOutcome {
        execute(actions, files, agent, save).await
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for AgentManager {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::ActionKind;
    use crate::history::Role;
    use crate::llm::{GenerationRequest, LlmError};
    use async_trait::async_trait;

    fn files(pairs: &[(&str, &str)]) -> FileContents {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    struct DownGenerator;

    #[async_trait]
    impl TextGenerator for DownGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, LlmError> {
            Err(LlmError::network_error("connection refused".to_string()))
        }

        fn name(&self) -> &str {
            "down"
        }
    }

    #[tokio::test]
    async fn test_delegation_records_both_turns() {
        let mut router = AgentManager::default();
        let response = router
            .process_request(
                "please implement a contact form",
                "app-1",
                files(&[("index.html", "<body></body>")]),
                "ws-1",
            )
            .await;

        assert_eq!(response.agent, AgentType::Editor);

        let turns: Vec<(Role, Option<AgentType>)> =
            router.history().iter().map(|m| (m.role, m.agent)).collect();
        assert_eq!(
            turns,
            vec![
                (Role::User, None),
                (Role::Assistant, Some(AgentType::Manager)),
                (Role::Assistant, Some(AgentType::Editor)),
            ]
        );
    }

    #[tokio::test]
    async fn test_manager_answers_without_signal() {
        let mut router = AgentManager::default();
        let response = router
            .process_request("hello there", "app-1", FileContents::new(), "ws-1")
            .await;

        assert_eq!(response.agent, AgentType::Manager);
        assert!(response.completed);
        assert_eq!(router.history().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_agent_leaves_history_alone() {
        let mut router = AgentManager::default();
        router
            .process_with_agent("advisor", "tips?", "app", FileContents::new(), "ws")
            .await
            .unwrap();
        let before = router.history().len();

        let err = router
            .process_with_agent("", "hello", "app", FileContents::new(), "ws")
            .await
            .unwrap_err();

        assert_eq!(err, AgentError::UnknownAgent(String::new()));
        assert_eq!(router.history().len(), before);
    }

    #[tokio::test]
    async fn test_direct_dispatch_skips_manager() {
        let mut router = AgentManager::default();
        let response = router
            .process_with_agent(
                "Editor",
                "can you add a button and style it",
                "app",
                files(&[("index.html", "<body></body>"), ("styles.css", "")]),
                "ws",
            )
            .await
            .unwrap();

        assert_eq!(response.agent, AgentType::Editor);
        let kinds: Vec<(&str, ActionKind)> = response
            .actions
            .iter()
            .map(|a| (a.target.as_str(), a.kind))
            .collect();
        assert!(kinds.contains(&("index.html", ActionKind::FileEdit)));
        assert!(kinds.contains(&("styles.css", ActionKind::FileEdit)));

        let last = router.history().iter().last().unwrap();
        assert_eq!(last.agent, Some(AgentType::Editor));
        assert!(last.content.contains("Proposed changes:"));
        assert_eq!(router.history().len(), 2);
    }

    #[tokio::test]
    async fn test_history_keeps_most_recent_fifty() {
        let mut router = AgentManager::default();
        for i in 0..30 {
            router
                .process_with_agent("advisor", &format!("question {}", i), "app", FileContents::new(), "ws")
                .await
                .unwrap();
        }

        let history = router.history();
        assert_eq!(history.len(), 50);
        let users: Vec<&str> = history
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(users.first(), Some(&"question 5"));
        assert_eq!(users.last(), Some(&"question 29"));
    }

    #[tokio::test]
    async fn test_configured_limit_and_clear() {
        let config = Config {
            history_limit: 3,
            ..Config::default()
        };
        let mut router = AgentManager::new(config);
        for _ in 0..3 {
            router
                .process_request("hello", "app", FileContents::new(), "ws")
                .await;
        }
        assert_eq!(router.history().len(), 3);

        router.clear_history();
        assert!(router.history().is_empty());
    }

    #[tokio::test]
    async fn test_generator_failure_falls_back_to_draft() {
        let mut router = AgentManager::with_generator(Config::default(), Arc::new(DownGenerator));
        let response = router
            .process_with_agent("shepherd", "status?", "app", FileContents::new(), "ws")
            .await
            .unwrap();

        assert!(response.message.starts_with("**Project Shepherd**"));
        assert!(response.message.contains("Overall progress: 0%"));
    }

    #[tokio::test]
    async fn test_repeated_audits_do_not_inflate_progress() {
        let empty = files(&[
            ("index.html", ""),
            ("styles.css", ""),
            ("script.js", ""),
            ("data.json", ""),
        ]);
        let mut router = AgentManager::default();

        for _ in 0..2 {
            let response = router
                .process_with_agent("shepherd", "status?", "app", empty.clone(), "ws")
                .await
                .unwrap();
            assert!(response.message.contains("Overall progress: 0%"));
        }

        router.clear_history();
        router
            .process_request("hello there", "app", empty.clone(), "ws")
            .await;
        let response = router
            .process_with_agent("shepherd", "status?", "app", empty, "ws")
            .await
            .unwrap();
        assert!(response.message.contains("Overall progress: 0%"));
        assert!(response.message.contains("[ ] Planning discussed"));
    }

    #[test]
    fn test_available_agents() {
        let router = AgentManager::default();
        let agents = router.available_agents();
        assert_eq!(agents.len(), 5);
        assert!(agents.iter().all(|a| !a.role.is_empty()));
    }

    #[tokio::test]
    async fn test_execute_actions_through_router() {
        let router = AgentManager::default();
        let original = files(&[("index.html", "<body></body>"), ("data.json", "{}")]);
        let actions = vec![
            AgentAction::file_edit("index.html", "<body>hi</body>", "greet"),
            AgentAction::file_delete("data.json", "unused"),
        ];

        let outcome = router
            .execute_actions(&actions, &original, Some(AgentType::Editor), None)
            .await;

        assert_eq!(outcome.updated_files["index.html"], "<body>hi</body>");
        assert!(!outcome.updated_files.contains_key("data.json"));
        assert_eq!(original["index.html"], "<body></body>");
        assert_eq!(
            outcome.agent_context.map(|a| a.agent_type),
            Some(AgentType::Editor)
        );
    }
}
