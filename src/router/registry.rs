use crate::agents::{
    AdvisorAgent, Agent, AgentIdentity, AgentType, ArchitectAgent, DelegationRules, EditorAgent,
    ManagerAgent, ShepherdAgent,
};

/// One instance per agent type, built once and reused for every request.
///
/// The lookup is an exhaustive match, so adding an [`AgentType`] variant
/// without registering an agent does not compile.
pub struct AgentRegistry {
    manager: ManagerAgent,
    editor: EditorAgent,
    architect: ArchitectAgent,
    advisor: AdvisorAgent,
    shepherd: ShepherdAgent,
}

impl AgentRegistry {
    pub fn new(rules: DelegationRules) -> Self {
        Self {
            manager: ManagerAgent::with_rules(rules),
            editor: EditorAgent::new(),
            architect: ArchitectAgent::new(),
            advisor: AdvisorAgent::new(),
            shepherd: ShepherdAgent::new(),
        }
    }

    pub fn get(&self, agent_type: AgentType) -> &dyn Agent {
        match agent_type {
            AgentType::Manager => &self.manager,
            AgentType::Editor => &self.editor,
            AgentType::Architect => &self.architect,
            AgentType::Advisor => &self.advisor,
            AgentType::Shepherd => &self.shepherd,
        }
    }

    pub fn list(&self) -> Vec<AgentIdentity> {
        AgentType::ALL
            .iter()
            .map(|agent_type| self.get(*agent_type).identity())
            .collect()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new(DelegationRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_matches_registration_key() {
        let registry = AgentRegistry::default();
        for agent_type in AgentType::ALL {
            assert_eq!(registry.get(agent_type).agent_type(), agent_type);
            assert_eq!(registry.get(agent_type).identity().agent_type, agent_type);
        }
    }

    #[test]
    fn test_list_is_in_canonical_order() {
        let types: Vec<AgentType> = AgentRegistry::default()
            .list()
            .into_iter()
            .map(|identity| identity.agent_type)
            .collect();
        assert_eq!(types, AgentType::ALL.to_vec());
    }

    #[test]
    fn test_only_editor_edits_files() {
        let registry = AgentRegistry::default();
        for identity in registry.list() {
            assert_eq!(
                identity.capabilities.can_edit_files,
                identity.agent_type == AgentType::Editor
            );
        }
    }
}
