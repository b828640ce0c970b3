//! sleuth — an OODA-loop incident investigation orchestrator.
//!
//! The core is a strictly sequential control loop that drives registered
//! investigation agents through Observe, Orient, Decide, and Act phases under
//! a hard cost budget and per-call deadlines, surfacing partial results when
//! individual agents fail.

pub mod agent;
pub mod budget;
pub mod cli;
pub mod config;
pub mod decision;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod ranking;
pub mod scenario;

pub use agent::{AgentId, BoundedCall, CallOutcome, InvestigationAgent};
pub use budget::{BudgetTracker, CostReport};
pub use config::{DecideMode, SleuthConfig};
pub use decision::{Decision, DecisionMaker};
pub use domain::{
    DisproofStrategy, Evidence, EvidenceQuality, Hypothesis, HypothesisId, Incident, Observation,
    Severity,
};
pub use error::{AgentError, Result, SleuthError};
pub use orchestrator::{
    AgentOutcome, CancelHandle, InvestigationReport, InvestigationState, Investigator,
    OutcomeStatus, Phase, TestedHypothesis,
};
pub use ranking::rank_by_confidence;
