use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::AgentId;

/// Quality tier of an evidence item. The weight governs how far a single item
/// can shift a hypothesis's confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceQuality {
    Direct,
    Corroborated,
    Indirect,
    Circumstantial,
    Weak,
}

impl EvidenceQuality {
    pub fn weight(&self) -> f64 {
        match self {
            Self::Direct => 1.0,
            Self::Corroborated => 0.9,
            Self::Indirect => 0.6,
            Self::Circumstantial => 0.3,
            Self::Weak => 0.1,
        }
    }
}

impl fmt::Display for EvidenceQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Direct => "direct",
            Self::Corroborated => "corroborated",
            Self::Indirect => "indirect",
            Self::Circumstantial => "circumstantial",
            Self::Weak => "weak",
        };
        write!(f, "{}", s)
    }
}

/// A single evidence item attached to exactly one hypothesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub source: String,
    pub quality: EvidenceQuality,
    /// Confidence in this evidence item itself, in [0, 1].
    pub confidence: f64,
    /// True if the item supports the hypothesis, false if it contradicts it.
    pub supports: bool,
}

impl Evidence {
    pub fn new(
        source: impl Into<String>,
        quality: EvidenceQuality,
        confidence: f64,
        supports: bool,
    ) -> Self {
        Self {
            source: source.into(),
            quality,
            confidence: confidence.clamp(0.0, 1.0),
            supports,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HypothesisId(Uuid);

impl HypothesisId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for HypothesisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A candidate explanation produced during Orient. Evidence is appended during
/// Act only; hypotheses are never deleted and are retained for the lifetime of
/// the investigation for audit purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hypothesis {
    pub id: HypothesisId,
    pub agent: AgentId,
    pub statement: String,
    pub initial_confidence: f64,
    pub current_confidence: f64,
    /// Insertion order is significant for audit, not for ranking.
    pub evidence: Vec<Evidence>,
}

impl Hypothesis {
    pub fn new(agent: AgentId, statement: impl Into<String>, confidence: f64) -> Self {
        let confidence = confidence.clamp(0.0, 1.0);
        Self {
            id: HypothesisId::generate(),
            agent,
            statement: statement.into(),
            initial_confidence: confidence,
            current_confidence: confidence,
            evidence: Vec::new(),
        }
    }

    /// Append an evidence item and recompute confidence.
    ///
    /// Supporting evidence moves confidence toward 1.0, contradicting evidence
    /// toward 0.0, scaled by the tier weight and the item's own confidence.
    /// Moving a fraction of the remaining distance keeps the value in [0, 1]
    /// without needing a separate clamp, but one is applied anyway to hold the
    /// invariant against float drift.
    pub fn add_evidence(&mut self, evidence: Evidence) {
        let shift = evidence.quality.weight() * evidence.confidence;
        let next = if evidence.supports {
            self.current_confidence + (1.0 - self.current_confidence) * shift
        } else {
            self.current_confidence - self.current_confidence * shift
        };
        self.current_confidence = next.clamp(0.0, 1.0);
        self.evidence.push(evidence);
    }
}

/// A test designed to falsify a hypothesis rather than confirm it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisproofStrategy {
    pub description: String,
}

impl DisproofStrategy {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}
