//! # Vibe Agents
//!
//! Multi-agent request router for a browser-based app editor.
//!
//! A user chats with a small team of agents about an app made of four
//! files (index.html, styles.css, script.js, data.json). This library
//! provides:
//! - Five agents behind one [`agents::Agent`] trait
//! - A router that triages through the manager and delegates to a specialist
//! - A bounded conversation history
//! - An action executor that applies proposed edits to a copy of the files
//!
//! ## Architecture
//!
//! ```text
//!                 ┌────────────────────┐
//!   request ────▶ │    AgentManager    │ ◀── history (last 50 turns)
//!                 └─────────┬──────────┘
//!                           │
//!                           ▼
//!                 ┌────────────────────┐
//!                 │   ManagerAgent     │  triage + delegation rules
//!                 └─────────┬──────────┘
//!          ┌────────────┬───┴────────┬────────────┐
//!          ▼            ▼            ▼            ▼
//!       Editor      Architect     Advisor     Shepherd
//!     (edits)     (review)     (guidance)   (progress)
//! ```
//!
//! Every agent writes a rule-based draft and passes it through a
//! [`llm::TextGenerator`]. The default generator returns the draft as is;
//! with `OPENROUTER_API_KEY` set, a hosted model rewrites it.
//!
//! ## Modules
//! - `agents`: the agent trait, the five agents, task classification
//! - `router`: `AgentManager`, the agent registry, the action executor
//! - `history`: transcript types
//! - `llm`: text generation backends
//! - `config`: environment configuration

pub mod agents;
pub mod config;
pub mod files;
pub mod history;
pub mod llm;
pub mod router;

pub use agents::{AgentAction, AgentError, AgentResponse, AgentType};
pub use config::{Config, ConfigError};
pub use files::{FileContents, WellKnownFile};
pub use history::{ChatMessage, ConversationHistory, Role};
pub use router::{ActionOutcome, AgentAttribution, AgentManager, SaveFiles};
