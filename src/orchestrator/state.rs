use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phase state of one investigation run.
///
/// The happy path walks Idle through Completed in order. `BudgetExceeded` and
/// `Cancelled` are terminal and reachable from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestigationState {
    #[default]
    Idle,
    Observing,
    Orienting,
    Deciding,
    Testing,
    Completed,
    BudgetExceeded,
    Cancelled,
}

impl InvestigationState {
    pub fn allowed_transitions(&self) -> &'static [InvestigationState] {
        use InvestigationState::*;
        match self {
            Idle => &[Observing, BudgetExceeded, Cancelled],
            Observing => &[Orienting, BudgetExceeded, Cancelled],
            Orienting => &[Deciding, BudgetExceeded, Cancelled],
            // A run with zero hypotheses completes straight from Deciding.
            Deciding => &[Testing, Completed, BudgetExceeded, Cancelled],
            Testing => &[Completed, BudgetExceeded, Cancelled],
            Completed => &[],
            BudgetExceeded => &[],
            Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, target: InvestigationState) -> bool {
        self.allowed_transitions().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InvestigationState::Completed
                | InvestigationState::BudgetExceeded
                | InvestigationState::Cancelled
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, InvestigationState::BudgetExceeded)
    }
}

impl fmt::Display for InvestigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "Idle",
            Self::Observing => "Observing",
            Self::Orienting => "Orienting",
            Self::Deciding => "Deciding",
            Self::Testing => "Testing",
            Self::Completed => "Completed",
            Self::BudgetExceeded => "BudgetExceeded",
            Self::Cancelled => "Cancelled",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: InvestigationState,
    pub to: InvestigationState,
    pub at: DateTime<Utc>,
}

impl StateTransition {
    pub fn new(from: InvestigationState, to: InvestigationState) -> Self {
        Self {
            from,
            to,
            at: Utc::now(),
        }
    }
}
