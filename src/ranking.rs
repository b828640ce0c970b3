//! Hypothesis ranking.
//!
//! Ranking is presentation/selection only: it never mutates a hypothesis, and
//! it deliberately does not deduplicate — hypotheses from different agents
//! about the same root cause stay distinct.

use crate::domain::Hypothesis;

/// Sort by current confidence, descending. The input list is built in dispatch
/// order (agent registration order, then generation order within an agent), and
/// the sort is stable, so ties preserve exactly that order.
pub fn rank_by_confidence(mut hypotheses: Vec<Hypothesis>) -> Vec<Hypothesis> {
    hypotheses.sort_by(|a, b| b.current_confidence.total_cmp(&a.current_confidence));
    hypotheses
}
