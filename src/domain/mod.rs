//! Core investigation data model.
//!
//! Data flows strictly forward through the loop:
//! Incident -> Observations -> Hypotheses -> Selected -> Tested.

mod hypothesis;
mod incident;

pub use hypothesis::{
    DisproofStrategy, Evidence, EvidenceQuality, Hypothesis, HypothesisId,
};
pub use incident::{Incident, Observation, Severity};
