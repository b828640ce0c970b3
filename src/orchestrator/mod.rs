//! The investigation control loop.
//!
//! - `engine`: the Observe/Orient/Decide/Act state machine
//! - `state`: phase states and the allowed-transition table
//! - `outcome`: per-agent outcome records and the final report
//! - `signal`: cooperative cancellation handle

mod engine;
mod outcome;
mod signal;
mod state;

pub use engine::Investigator;
pub use outcome::{AgentOutcome, InvestigationReport, OutcomeStatus, Phase, TestedHypothesis};
pub use signal::CancelHandle;
pub use state::{InvestigationState, StateTransition};
