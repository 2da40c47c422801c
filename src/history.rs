//! Conversation transcript kept by the router.
//!
//! # Invariants
//! - Messages are immutable once appended
//! - `len() <= limit()` after every append; the oldest entries go first

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agents::AgentType;

/// Default number of messages retained.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Role of a transcript entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn in the transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    /// Agent that produced this turn (assistant turns only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentType>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            agent: None,
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(agent: AgentType, content: impl Into<String>) -> Self {
        Self {
            agent: Some(agent),
            ..Self::new(Role::Assistant, content)
        }
    }
}

/// Bounded, ordered transcript.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: VecDeque<ChatMessage>,
    limit: usize,
}

impl ConversationHistory {
    /// Create an empty history keeping at most `limit` messages.
    ///
    /// A limit of zero is raised to one.
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            messages: VecDeque::new(),
            limit,
        }
    }

    /// Append a message, trimming from the front to stay within the limit.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        let mut dropped = 0usize;
        while self.messages.len() > self.limit {
            self.messages.pop_front();
            dropped += 1;
        }
        if dropped > 0 {
            tracing::debug!("History trimmed {} oldest message(s)", dropped);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    /// Snapshot of the transcript, oldest first.
    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}
