//! Manager agent - first stop for every auto-routed request.
//!
//! # Responsibilities
//! 1. Classify the request
//! 2. Look for a strong intent signal (see [`DelegationRules`])
//! 3. Hand off to the matching specialist, or answer with a triage summary

use async_trait::async_trait;

use crate::agents::{
    bullets, signed, Agent, AgentContext, AgentResponse, AgentType, Capabilities, Complexity,
    Delegation, TaskAnalysis,
};

use super::rules::DelegationRules;

const DESCRIPTION: &str = "Coordinates the team and routes each request to the right specialist.
Reads every incoming request, estimates its size, and either hands it to the
Editor, Architect, Advisor or Shepherd or answers it directly.";

const SYSTEM_PROMPT: &str = "You are the project manager of a small team that helps users \
build web apps from four files (index.html, styles.css, script.js, data.json). Summarise \
the request, say who on the team will handle it, and keep the reply short.";

pub struct ManagerAgent {
    rules: DelegationRules,
}

impl ManagerAgent {
    pub fn new() -> Self {
        Self::with_rules(DelegationRules::default())
    }

    pub fn with_rules(rules: DelegationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &DelegationRules {
        &self.rules
    }

    fn triage_draft(&self, task: &TaskAnalysis) -> String {
        let approach = match task.complexity {
            Complexity::Simple => {
                "This looks like a small change. Tell me exactly what you want to see \
                 and the Code Editor can apply it in one step."
            }
            Complexity::Moderate => {
                "This touches a few files. I suggest describing the visual result first, \
                 then letting the Code Editor make the changes."
            }
            Complexity::Complex => {
                "This is a structural change. The Software Architect should review the \
                 current files before anything is edited."
            }
            Complexity::Architectural => {
                "This affects the whole app. Start with a design discussion with the \
                 Software Architect, then break the work into smaller edits."
            }
        };

        let team = bullets(&[
            "Code Editor: makes changes to your files",
            "Software Architect: reviews structure and design",
            "Technical Advisor: answers questions and recommends approaches",
            "Project Shepherd: tracks progress and code quality",
        ]);

        format!(
            "Here is how I read your request:\n{}\n\n{}\n\nThe team:\n{}",
            task.summary(),
            approach,
            team
        )
    }
}

impl Default for ManagerAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for ManagerAgent {
    fn agent_type(&self) -> AgentType {
        AgentType::Manager
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            can_coordinate: true,
            can_make_decisions: true,
            ..Capabilities::default()
        }
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn is_capable_of(&self, _task: &TaskAnalysis) -> bool {
        true
    }

    async fn process(&self, ctx: &AgentContext) -> AgentResponse {
        let task = self.analyze_task(ctx);

        match self.rules.find(&ctx.message) {
            Some(found) => {
                tracing::info!(
                    "Manager delegating to {} (keyword '{}')",
                    found.target,
                    found.keyword
                );
                let draft = format!(
                    "I'm passing this to the {} because {}.\n\n{}",
                    found.target.display_name(),
                    found.reason,
                    task.summary()
                );
                let body = ctx.render(AgentType::Manager, SYSTEM_PROMPT, draft).await;
                let delegation = Delegation {
                    target: found.target,
                    reason: found.reason,
                    context: format!(
                        "complexity={} scope={} priority={} keyword={}",
                        task.complexity.as_str(),
                        task.scope.as_str(),
                        task.priority.as_str(),
                        found.keyword
                    ),
                };
                AgentResponse::text(AgentType::Manager, signed(AgentType::Manager, &body))
                    .with_delegation(delegation)
            }
            None => {
                tracing::debug!("Manager handling request directly");
                let body = ctx
                    .render(AgentType::Manager, SYSTEM_PROMPT, self.triage_draft(&task))
                    .await;
                AgentResponse::text(AgentType::Manager, signed(AgentType::Manager, &body))
            }
        }
    }
}
