use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

/// The unit of investigation. Created by the caller and read-only for the
/// orchestrator once a run starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub description: String,
    pub severity: Severity,
    pub reported_at: DateTime<Utc>,
}

impl Incident {
    pub fn new(id: impl Into<String>, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            severity,
            reported_at: Utc::now(),
        }
    }
}

/// One piece of evidence-gathering output from a single agent. The payload is
/// opaque to the orchestrator; it is only handed back to the producing agent
/// for hypothesis generation and not retained afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub agent: AgentId,
    pub content: String,
}

impl Observation {
    pub fn new(agent: AgentId, content: impl Into<String>) -> Self {
        Self {
            agent,
            content: content.into(),
        }
    }
}
