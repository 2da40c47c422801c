//! Delegation keywords used by the manager.
//!
//! Rules are checked in order and the first rule with a matching keyword
//! picks the specialist. The default set mirrors the four intents the
//! manager recognises (edit, design, advice, progress/quality); deployments
//! can replace it from a JSON file (see [`crate::config::Config`]).

use serde::{Deserialize, Serialize};

use crate::agents::{AgentType, Keywords};

/// Route requests mentioning any of `keywords` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationRule {
    pub target: AgentType,
    pub keywords: Vec<String>,
    /// Shown to the user when this rule fires
    #[serde(default)]
    pub reason: Option<String>,
}

impl DelegationRule {
    pub fn new(target: AgentType, keywords: &[&str], reason: &str) -> Self {
        Self {
            target,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            reason: Some(reason.to_string()),
        }
    }
}

/// A matched rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationMatch {
    pub target: AgentType,
    pub keyword: String,
    pub reason: String,
}

/// Ordered delegation rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DelegationRules(Vec<DelegationRule>);

impl DelegationRules {
    pub fn new(rules: Vec<DelegationRule>) -> Self {
        Self(rules)
    }

    pub fn rules(&self) -> &[DelegationRule] {
        &self.0
    }

    /// First rule matching `message`.
    ///
    /// Rules targeting the manager itself are skipped.
    pub fn find(&self, message: &str) -> Option<DelegationMatch> {
        let kw = Keywords::new(message);
        self.0
            .iter()
            .filter(|rule| rule.target != AgentType::Manager)
            .find_map(|rule| {
                kw.first_match(&rule.keywords).map(|keyword| DelegationMatch {
                    target: rule.target,
                    keyword: keyword.to_string(),
                    reason: rule.reason.clone().unwrap_or_else(|| {
                        format!("the request mentions \"{}\"", keyword)
                    }),
                })
            })
    }
}

impl Default for DelegationRules {
    fn default() -> Self {
        Self(vec![
            DelegationRule::new(
                AgentType::Editor,
                &[
                    "add", "change", "edit", "modify", "update", "fix", "implement", "create",
                    "make", "build", "remove", "delete", "insert", "replace", "rename", "write",
                ],
                "this needs concrete changes to your files",
            ),
            DelegationRule::new(
                AgentType::Architect,
                &[
                    "design",
                    "architecture",
                    "architect",
                    "structure",
                    "refactor",
                    "organize",
                    "scale",
                    "scalable",
                ],
                "this is a question about how the app is put together",
            ),
            DelegationRule::new(
                AgentType::Advisor,
                &[
                    "advice",
                    "advise",
                    "recommend",
                    "recommendation",
                    "suggest",
                    "suggestion",
                    "best practice",
                    "which",
                    "tips",
                    "opinion",
                ],
                "you are asking for guidance",
            ),
            DelegationRule::new(
                AgentType::Shepherd,
                &[
                    "progress",
                    "quality",
                    "review",
                    "stuck",
                    "status",
                    "audit",
                    "what next",
                    "do next",
                    "next step",
                ],
                "you want a check on progress and quality",
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_cover_each_specialist() {
        let rules = DelegationRules::default();

        let cases = [
            ("please implement a login form", AgentType::Editor),
            ("how should I design this", AgentType::Architect),
            ("any advice for a beginner", AgentType::Advisor),
            ("I'm stuck", AgentType::Shepherd),
        ];
        for (message, expected) in cases {
            let found = rules.find(message).map(|m| m.target);
            assert_eq!(found, Some(expected), "message: {}", message);
        }
    }

    #[test]
    fn test_no_signal() {
        assert_eq!(DelegationRules::default().find("hello there"), None);
    }

    #[test]
    fn test_earlier_rule_wins() {
        let found = DelegationRules::default()
            .find("review and fix the header")
            .unwrap();
        assert_eq!(found.target, AgentType::Editor);
        assert_eq!(found.keyword, "fix");
    }

    #[test]
    fn test_manager_rule_is_ignored() {
        let rules = DelegationRules::new(vec![
            DelegationRule::new(AgentType::Manager, &["hello"], "self"),
            DelegationRule::new(AgentType::Advisor, &["hello"], "greet"),
        ]);
        assert_eq!(rules.find("hello").unwrap().target, AgentType::Advisor);
    }

    #[test]
    fn test_rules_deserialize_from_json() {
        let raw = r#"[{"target": "shepherd", "keywords": ["ship it"]}]"#;
        let rules: DelegationRules = serde_json::from_str(raw).unwrap();

        let found = rules.find("can we ship it today").unwrap();
        assert_eq!(found.target, AgentType::Shepherd);
        assert_eq!(found.reason, "the request mentions \"ship it\"");
    }
}
