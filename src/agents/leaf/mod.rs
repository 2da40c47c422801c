//! Leaf agents - the specialists the manager delegates to.
//!
//! # Agents
//! - `EditorAgent`: proposes file changes (the only one that does)
//! - `ArchitectAgent`: structural review and recommendations
//! - `AdvisorAgent`: guidance and best practices
//! - `ShepherdAgent`: progress and quality audit

mod advisor;
mod architect;
mod editor;
mod shepherd;
mod templates;

pub use advisor::{AdviceCategory, AdvisorAgent};
pub use architect::{ArchitectAgent, Finding};
pub use editor::EditorAgent;
pub use shepherd::{CheckStatus, QualityCheck, ShepherdAgent};
