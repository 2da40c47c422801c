//! Orchestrator agents - triage and delegation.

mod manager;
mod rules;

pub use manager::ManagerAgent;
pub use rules::{DelegationRule, DelegationRules};
