use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::agent::AgentId;
use crate::error::SleuthError;

/// Spend accounting for one investigation run.
///
/// Charges are applied unconditionally and then compared to the limit, so
/// audit totals stay accurate even for the call that crossed the line. The
/// worst-case overspend is therefore bounded by the cost of a single call;
/// checking before a call would require knowing its cost in advance, which is
/// not available before an LLM call completes.
#[derive(Debug, Clone)]
pub struct BudgetTracker {
    limit: f64,
    spent: f64,
    by_agent: BTreeMap<AgentId, f64>,
}

impl BudgetTracker {
    pub fn new(limit: f64) -> Self {
        Self {
            limit,
            spent: 0.0,
            by_agent: BTreeMap::new(),
        }
    }

    /// Apply a charge, then check the limit. On overrun the charge is still
    /// recorded and the caller must treat the error as fatal.
    pub fn charge(&mut self, agent: &AgentId, amount: f64) -> Result<(), SleuthError> {
        self.spent += amount;
        *self.by_agent.entry(agent.clone()).or_insert(0.0) += amount;

        if self.spent > self.limit {
            warn!(
                agent = %agent,
                amount,
                spent = self.spent,
                limit = self.limit,
                "budget limit crossed"
            );
            return Err(SleuthError::BudgetExceeded {
                spent: self.spent,
                limit: self.limit,
            });
        }
        Ok(())
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn total_cost(&self) -> f64 {
        self.spent
    }

    pub fn cost_by_agent(&self) -> &BTreeMap<AgentId, f64> {
        &self.by_agent
    }

    pub fn remaining(&self) -> f64 {
        (self.limit - self.spent).max(0.0)
    }

    pub fn report(&self) -> CostReport {
        CostReport {
            limit: self.limit,
            total: self.spent,
            by_agent: self.by_agent.clone(),
        }
    }
}

/// Snapshot of accounting state, renderable even after a fatal abort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostReport {
    pub limit: f64,
    pub total: f64,
    pub by_agent: BTreeMap<AgentId, f64>,
}
