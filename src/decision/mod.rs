//! Decision collaborator contract.
//!
//! The Decide step hands the ranked hypothesis list to a collaborator — a
//! human behind a terminal, or anything else satisfying the contract — which
//! picks exactly one hypothesis to test. The wait is unbounded by design
//! (human deliberation gets no timeout from the core); cancellation during the
//! wait is a distinct response, never an error value shared with other failure
//! kinds. Automatic top-N selection bypasses this contract entirely and lives
//! inside the orchestrator.

use async_trait::async_trait;

use crate::domain::{Hypothesis, HypothesisId, Incident};

/// Response from a decision collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Selected(HypothesisId),
    Cancelled,
}

#[async_trait]
pub trait DecisionMaker: Send + Sync {
    /// Pick exactly one hypothesis from the ranked list, or cancel.
    ///
    /// `ranked` is non-empty and sorted by descending confidence.
    async fn select(&self, ranked: &[Hypothesis], incident: &Incident) -> Decision;
}
