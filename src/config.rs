//! Configuration for the agent router.
//!
//! Configuration can be set via environment variables:
//! - `VIBE_HISTORY_LIMIT` - Optional. Conversation history cap. Defaults to `50`.
//! - `OPENROUTER_API_KEY` - Optional. When set, responses are phrased by an OpenRouter model.
//! - `VIBE_MODEL` - Optional. Model used with OpenRouter. Defaults to `anthropic/claude-sonnet-4.5`.
//! - `VIBE_DELEGATION_RULES` - Optional. Path to a JSON file replacing the manager's delegation keywords.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::agents::DelegationRules;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::llm::{OpenRouterGenerator, TemplateGenerator, TextGenerator};

pub const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4.5";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to load delegation rules from {}: {reason}", .path.display())]
    RulesFile { path: PathBuf, reason: String },
}

/// Router configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of messages kept in the conversation history
    pub history_limit: usize,

    /// OpenRouter API key; `None` keeps the rule-based responses as they are
    pub api_key: Option<String>,

    /// Model identifier (OpenRouter format)
    pub model: String,

    /// Keywords the manager delegates on
    pub delegation_rules: DelegationRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            delegation_rules: DelegationRules::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a malformed history limit and
    /// `ConfigError::RulesFile` when the rules file cannot be read or parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with an explicit variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let history_limit = match lookup("VIBE_HISTORY_LIMIT") {
            Some(raw) => parse_limit(&raw)?,
            None => DEFAULT_HISTORY_LIMIT,
        };

        let api_key = lookup("OPENROUTER_API_KEY").filter(|key| !key.trim().is_empty());

        let model = lookup("VIBE_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let delegation_rules = match lookup("VIBE_DELEGATION_RULES") {
            Some(path) => load_rules(Path::new(&path))?,
            None => DelegationRules::default(),
        };

        Ok(Self {
            history_limit,
            api_key,
            model,
            delegation_rules,
        })
    }

    /// Text generator implied by this configuration.
    pub fn generator(&self) -> Arc<dyn TextGenerator> {
        match &self.api_key {
            Some(key) => Arc::new(OpenRouterGenerator::new(key.clone(), self.model.clone())),
            None => Arc::new(TemplateGenerator),
        }
    }
}

fn parse_limit(raw: &str) -> Result<usize, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue("VIBE_HISTORY_LIMIT".to_string(), reason);
    let limit: usize = raw.trim().parse().map_err(|e| invalid(format!("{}", e)))?;
    if limit == 0 {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(limit)
}

/// Read a JSON delegation rules file.
pub fn load_rules(path: &Path) -> Result<DelegationRules, ConfigError> {
    let rules_error = |reason: String| ConfigError::RulesFile {
        path: path.to_path_buf(),
        reason,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| rules_error(e.to_string()))?;
    let rules: DelegationRules =
        serde_json::from_str(&raw).map_err(|e| rules_error(e.to_string()))?;
    tracing::debug!(
        "Loaded {} delegation rule(s) from {}",
        rules.rules().len(),
        path.display()
    );
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentType;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.api_key.is_none());
        assert_eq!(config.generator().name(), "template");
        assert_eq!(config.delegation_rules, DelegationRules::default());
    }

    #[test]
    fn test_history_limit_must_be_positive() {
        assert!(matches!(
            Config::from_vars(vars(&[("VIBE_HISTORY_LIMIT", "0")])),
            Err(ConfigError::InvalidValue(..))
        ));
        assert!(matches!(
            Config::from_vars(vars(&[("VIBE_HISTORY_LIMIT", "lots")])),
            Err(ConfigError::InvalidValue(..))
        ));
        let config = Config::from_vars(vars(&[("VIBE_HISTORY_LIMIT", " 10 ")])).unwrap();
        assert_eq!(config.history_limit, 10);
    }

    #[test]
    fn test_api_key_selects_openrouter() {
        let config = Config::from_vars(vars(&[
            ("OPENROUTER_API_KEY", "sk-test"),
            ("VIBE_MODEL", "openai/gpt-4o-mini"),
        ]))
        .unwrap();
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.generator().name(), "openrouter");
    }

    #[test]
    fn test_rules_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"target": "advisor", "keywords": ["help"], "reason": "you asked for help"}}]"#
        )
        .unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = Config::from_vars(vars(&[("VIBE_DELEGATION_RULES", path.as_str())])).unwrap();
        let found = config.delegation_rules.find("help me please").unwrap();
        assert_eq!(found.target, AgentType::Advisor);
        assert_eq!(found.reason, "you asked for help");
    }

    #[test]
    fn test_bad_rules_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_rules(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::RulesFile { .. }));

        let err = load_rules(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
