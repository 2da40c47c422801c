//! Core types for the agent system.

use serde::{Deserialize, Serialize};

/// The five agent roles. The set is closed: the router holds exactly one
/// instance of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    /// Triage and delegation
    Manager,
    /// The only role that proposes file changes
    Editor,
    /// Read-only structural analysis
    Architect,
    /// Read-only guidance
    Advisor,
    /// Read-only progress and quality audit
    Shepherd,
}

impl AgentType {
    pub const ALL: [AgentType; 5] = [
        Self::Manager,
        Self::Editor,
        Self::Architect,
        Self::Advisor,
        Self::Shepherd,
    ];

    /// Registration key, also the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Editor => "editor",
            Self::Architect => "architect",
            Self::Advisor => "advisor",
            Self::Shepherd => "shepherd",
        }
    }

    /// Name shown at the top of every response.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Manager => "Project Manager",
            Self::Editor => "Code Editor",
            Self::Architect => "Software Architect",
            Self::Advisor => "Technical Advisor",
            Self::Shepherd => "Project Shepherd",
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgentType {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| AgentError::UnknownAgent(s.to_string()))
    }
}

/// What an agent is allowed to do.
///
/// Declared once at construction; agents expose it by value only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub can_edit_files: bool,
    pub can_analyze_code: bool,
    pub can_provide_guidance: bool,
    pub can_coordinate: bool,
    pub can_make_decisions: bool,
}

/// Advertised description of a registered agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIdentity {
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    pub name: String,
    /// First line of the agent's role description
    pub role: String,
    pub capabilities: Capabilities,
}

/// Kind of a proposed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    FileEdit,
    FileCreate,
    FileDelete,
    Analysis,
    Recommendation,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileEdit => "file_edit",
            Self::FileCreate => "file_create",
            Self::FileDelete => "file_delete",
            Self::Analysis => "analysis",
            Self::Recommendation => "recommendation",
        }
    }

    /// Whether applying this action changes the file map.
    pub fn mutates_files(&self) -> bool {
        matches!(self, Self::FileEdit | Self::FileCreate | Self::FileDelete)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change proposed by an agent, applied at most once by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Filename, or a logical component for non-file kinds
    pub target: String,
    /// Full replacement content (file_edit / file_create)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub description: String,
}

impl AgentAction {
    pub fn file_edit(
        target: impl Into<String>,
        content: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: ActionKind::FileEdit,
            target: target.into(),
            content: Some(content.into()),
            description: description.into(),
        }
    }

    pub fn file_create(
        target: impl Into<String>,
        content: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: ActionKind::FileCreate,
            ..Self::file_edit(target, content, description)
        }
    }

    pub fn file_delete(target: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::FileDelete,
            target: target.into(),
            content: None,
            description: description.into(),
        }
    }

    /// One-line description kept in the transcript in place of the action.
    pub fn summary(&self) -> String {
        format!("{} {}: {}", self.kind, self.target, self.description)
    }
}

/// Instruction from the manager to hand the request to a specialist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub target: AgentType,
    pub reason: String,
    /// Triage notes passed along for the specialist
    pub context: String,
}

/// Heading that introduces action summaries in a transcript turn.
pub(crate) const PROPOSED_CHANGES_HEADING: &str = "Proposed changes:";

/// Result of [`Agent::process`](super::Agent::process).
///
/// # Invariants
/// - `message` is never empty
/// - Read-only agents never populate `actions` with file kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub agent: AgentType,
    pub message: String,
    #[serde(default)]
    pub actions: Vec<AgentAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegation: Option<Delegation>,
    pub completed: bool,
}

impl AgentResponse {
    /// A finished response with no actions.
    pub fn text(agent: AgentType, message: impl Into<String>) -> Self {
        Self {
            agent,
            message: message.into(),
            actions: Vec::new(),
            delegation: None,
            completed: true,
        }
    }

    pub fn with_actions(mut self, actions: Vec<AgentAction>) -> Self {
        self.actions = actions;
        self
    }

    /// Mark the response as a hand-off; it is no longer complete on its own.
    pub fn with_delegation(mut self, delegation: Delegation) -> Self {
        self.delegation = Some(delegation);
        self.completed = false;
        self
    }

    /// Transcript form: the message followed by each action's summary.
    pub fn transcript_text(&self) -> String {
        if self.actions.is_empty() {
            return self.message.clone();
        }
        let mut text = self.message.clone();
        text.push_str("\n\n");
        text.push_str(PROPOSED_CHANGES_HEADING);
        for action in &self.actions {
            text.push_str("\n- ");
            text.push_str(&action.summary());
        }
        text
    }
}

/// Errors surfaced by the router.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error("Unknown agent type: '{0}'")]
    UnknownAgent(String),
}
