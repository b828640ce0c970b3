//! Agent capability contract.
//!
//! Agents are domain-specific observers and hypothesis generators (application,
//! database, network, ...). Their internal logic — how an observation or a
//! confidence value is computed, which model is called, what it costs — is
//! outside the core; they report cost alongside each result and the
//! orchestrator does the accounting. Agents are registered in a deterministic
//! ordered list and dispatched strictly sequentially.

mod bounded;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{DisproofStrategy, Hypothesis, Incident, Observation};
use crate::error::AgentError;

pub use bounded::{BoundedCall, CallOutcome};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Capability contract implemented by each agent variant.
///
/// Every call returns its result together with the cost it incurred. A call
/// may fail with a recoverable [`AgentError`]; `BudgetExceeded` bubbling up
/// from an agent's own accounting must be propagated by the caller, never
/// swallowed by a generic failure handler.
#[async_trait]
pub trait InvestigationAgent: Send + Sync {
    fn id(&self) -> &AgentId;

    async fn observe(&self, incident: &Incident) -> Result<(Vec<Observation>, f64), AgentError>;

    async fn generate_hypothesis(
        &self,
        observations: &[Observation],
    ) -> Result<(Hypothesis, f64), AgentError>;

    async fn generate_disproof_strategies(
        &self,
        hypothesis: &Hypothesis,
    ) -> Result<(Vec<DisproofStrategy>, f64), AgentError>;
}
