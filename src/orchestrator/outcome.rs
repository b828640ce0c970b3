use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentId;
use crate::budget::CostReport;
use crate::domain::{DisproofStrategy, Hypothesis};

use super::state::{InvestigationState, StateTransition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Observe,
    Orient,
    Test,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Observe => "observe",
            Self::Orient => "orient",
            Self::Test => "test",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Succeeded { cost: f64 },
    TimedOut,
    Failed { error: String },
    Skipped { reason: String },
}

impl OutcomeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Per-agent, per-phase record used for reporting and graceful-degradation
/// bookkeeping. Built once, never re-entered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOutcome {
    pub agent: AgentId,
    pub phase: Phase,
    pub status: OutcomeStatus,
    pub elapsed: Duration,
}

impl AgentOutcome {
    pub fn new(agent: AgentId, phase: Phase, status: OutcomeStatus, elapsed: Duration) -> Self {
        Self {
            agent,
            phase,
            status,
            elapsed,
        }
    }
}

/// A selected hypothesis together with the disproof strategies generated for
/// it during the Act phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestedHypothesis {
    pub hypothesis: Hypothesis,
    pub strategies: Vec<DisproofStrategy>,
}

/// Everything a caller needs after a run: ranked and tested hypotheses, full
/// cost accounting, and the per-agent outcome log including skipped,
/// timed-out, and errored agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestigationReport {
    pub incident_id: String,
    pub state: InvestigationState,
    pub ranked: Vec<Hypothesis>,
    pub tested: Vec<TestedHypothesis>,
    pub costs: CostReport,
    pub outcomes: Vec<AgentOutcome>,
    pub transitions: Vec<StateTransition>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl InvestigationReport {
    pub fn total_cost(&self) -> f64 {
        self.costs.total
    }
}
