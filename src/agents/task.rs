//! Keyword-based task classification shared by all agents.
//!
//! # Algorithm
//! Rules run in a fixed order and the first one that fires decides:
//! 1. architectural terms → architectural / full-app / high
//! 2. moderate terms → moderate / multi-file
//! 3. structural terms → complex / structural
//! 4. multi-file phrasing → multi-file scope only
//!
//! Nothing matching leaves the defaults: simple / single-file / medium.
//! The estimate is looked up from the final complexity.

use serde::{Deserialize, Serialize};

use super::keywords::Keywords;

pub const ARCHITECTURAL_TERMS: &[&str] = &[
    "refactor",
    "restructure",
    "architecture",
    "database",
    "api",
    "apis",
    "backend",
    "server",
    "authentication",
    "migrate",
    "scalability",
];

pub const MODERATE_TERMS: &[&str] = &[
    "component",
    "style",
    "feature",
    "layout",
    "form",
    "animation",
    "theme",
    "navigation",
];

pub const STRUCTURAL_TERMS: &[&str] = &[
    "organize",
    "framework",
    "structure",
    "modular",
    "module",
    "pattern",
    "separate",
];

pub const MULTI_FILE_TERMS: &[&str] = &[
    "multiple files",
    "all files",
    "every file",
    "across files",
    "each file",
    "multi file",
    "all the files",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
    Architectural,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
            Self::Architectural => "architectural",
        }
    }

    /// Time estimate lookup.
    pub fn estimated_time(&self) -> &'static str {
        match self {
            Self::Simple => "5-10 minutes",
            Self::Moderate => "10-20 minutes",
            Self::Complex => "20-30 minutes",
            Self::Architectural => "30-60 minutes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    SingleFile,
    MultiFile,
    Structural,
    FullApp,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleFile => "single-file",
            Self::MultiFile => "multi-file",
            Self::Structural => "structural",
            Self::FullApp => "full-app",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Coarse classification of a request.
///
/// # Invariants
/// - `estimated_time == complexity.estimated_time()`
/// - `complexity == Architectural` implies `scope == FullApp`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskAnalysis {
    pub complexity: Complexity,
    pub scope: Scope,
    pub priority: Priority,
    pub estimated_time: &'static str,
}

impl TaskAnalysis {
    /// Classify a free-text request. Pure function of `message`.
    pub fn classify(message: &str) -> Self {
        let kw = Keywords::new(message);

        let (complexity, scope, priority) = if kw.mentions_any(ARCHITECTURAL_TERMS) {
            (Complexity::Architectural, Scope::FullApp, Priority::High)
        } else if kw.mentions_any(MODERATE_TERMS) {
            (Complexity::Moderate, Scope::MultiFile, Priority::Medium)
        } else if kw.mentions_any(STRUCTURAL_TERMS) {
            (Complexity::Complex, Scope::Structural, Priority::Medium)
        } else if kw.mentions_any(MULTI_FILE_TERMS) {
            (Complexity::Simple, Scope::MultiFile, Priority::Medium)
        } else {
            (Complexity::Simple, Scope::SingleFile, Priority::Medium)
        };

        tracing::debug!(
            "Classified request: complexity={} scope={} priority={}",
            complexity.as_str(),
            scope.as_str(),
            priority.as_str()
        );

        Self {
            complexity,
            scope,
            priority,
            estimated_time: complexity.estimated_time(),
        }
    }

    /// Markdown bullet summary used in responses.
    pub fn summary(&self) -> String {
        format!(
            "- Complexity: {}\n- Scope: {}\n- Priority: {}\n- Estimated time: {}",
            self.complexity.as_str(),
            self.scope.as_str(),
            self.priority.as_str(),
            self.estimated_time
        )
    }
}
