//! Action executor - applies proposed actions to a copy of the caller's files.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agents::{ActionKind, AgentAction, AgentType};
use crate::files::FileContents;

/// Who made a set of changes, passed to the save callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentAttribution {
    pub agent_type: AgentType,
    pub agent_name: String,
    /// All applied changes, joined
    pub description: String,
}

/// Persistence hook supplied by the caller.
///
/// Failures are logged and ignored by the executor; the in-memory result is
/// returned either way.
#[async_trait]
pub trait SaveFiles: Send + Sync {
    async fn save(
        &self,
        attribution: &AgentAttribution,
        description: &str,
        files: &FileContents,
    ) -> anyhow::Result<()>;
}

/// Result of [`execute`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub updated_files: FileContents,
    pub agent_context: Option<AgentAttribution>,
    /// At least one file changed
    pub should_save: bool,
    /// One line per applied change
    pub changes: Vec<String>,
}

fn apply(files: &mut FileContents, action: &AgentAction) -> Option<String> {
    match action.kind {
        ActionKind::FileEdit | ActionKind::FileCreate => {
            let Some(content) = &action.content else {
                tracing::warn!("Skipping {} without content", action.summary());
                return None;
            };
            let verb = if action.kind == ActionKind::FileCreate {
                "Created"
            } else {
                "Updated"
            };
            files.insert(action.target.clone(), content.clone());
            Some(format!("{} {}: {}", verb, action.target, action.description))
        }
        ActionKind::FileDelete => files
            .remove(&action.target)
            .map(|_| format!("Deleted {}: {}", action.target, action.description)),
        ActionKind::Analysis | ActionKind::Recommendation => None,
    }
}

/// Apply `actions` in order to a copy of `files`.
///
/// The caller's map is never touched. When something changed and `agent`
/// is given, an attribution is built and handed to `save`.
pub async fn execute(
    actions: &[AgentAction],
    files: &FileContents,
    agent: Option<AgentType>,
    save: Option<&dyn SaveFiles>,
) -> ActionOutcome {
    let mut updated_files = files.clone();
    let changes: Vec<String> = actions
        .iter()
        .filter_map(|action| apply(&mut updated_files, action))
        .collect();
    let should_save = !changes.is_empty();

    let agent_context = match agent {
        Some(agent_type) if should_save => Some(AgentAttribution {
            agent_type,
            agent_name: agent_type.display_name().to_string(),
            description: changes.join("; "),
        }),
        _ => None,
    };

    if let (Some(attribution), Some(save)) = (&agent_context, save) {
        tracing::info!(
            "Saving {} change(s) by {}",
            changes.len(),
            attribution.agent_name
        );
        if let Err(e) = save
            .save(attribution, &attribution.description, &updated_files)
            .await
        {
            tracing::error!("Save callback failed, keeping in-memory changes: {:#}", e);
        }
    }

    ActionOutcome {
        updated_files,
        agent_context,
        should_save,
        changes,
    }
}
