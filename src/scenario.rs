//! Scripted investigation scenarios.
//!
//! A scenario file describes an incident and a set of scripted agents —
//! canned observations, one hypothesis, disproof strategies, and the cost of
//! each call — so a full run can be driven from the CLI without any live
//! backend. Delay and failure knobs exist to demonstrate the timeout and
//! graceful-degradation behavior.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::agent::{AgentId, InvestigationAgent};
use crate::domain::{DisproofStrategy, Hypothesis, Incident, Observation, Severity};
use crate::error::{AgentError, Result, SleuthError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub incident: IncidentSpec,
    #[serde(rename = "agent", default)]
    pub agents: Vec<AgentScript>,
}

impl Scenario {
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let scenario: Self = toml::from_str(&content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.incident.id.is_empty() {
            errors.push("incident.id must not be empty".to_string());
        }
        if self.agents.is_empty() {
            errors.push("at least one [[agent]] is required".to_string());
        }
        for script in &self.agents {
            if script.name.is_empty() {
                errors.push("agent.name must not be empty".to_string());
            }
            if let Some(h) = &script.hypothesis {
                if !(0.0..=1.0).contains(&h.confidence) {
                    errors.push(format!(
                        "agent '{}': hypothesis confidence must be in [0, 1]",
                        script.name
                    ));
                }
            }
        }
        let mut names: Vec<&str> = self.agents.iter().map(|a| a.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != self.agents.len() {
            errors.push("agent names must be unique".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SleuthError::Scenario(errors.join("; ")))
        }
    }

    pub fn incident(&self) -> Incident {
        Incident::new(
            self.incident.id.clone(),
            self.incident.description.clone(),
            self.incident.severity,
        )
    }

    /// Build the agent roster in file order, which becomes dispatch order.
    pub fn agents(&self) -> Vec<Arc<dyn InvestigationAgent>> {
        self.agents
            .iter()
            .map(|script| {
                Arc::new(ScriptedAgent::new(script.clone())) as Arc<dyn InvestigationAgent>
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentSpec {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentScript {
    pub name: String,
    pub observations: Vec<String>,
    pub observe_cost: f64,
    pub hypothesis: Option<HypothesisScript>,
    pub hypothesis_cost: f64,
    pub strategies: Vec<String>,
    pub strategies_cost: f64,
    /// Artificial latency applied to every call, for timeout demonstrations.
    pub delay_ms: u64,
    /// Fail the observe call with a recoverable error.
    pub fail_observe: bool,
}

impl Default for AgentScript {
    fn default() -> Self {
        Self {
            name: String::new(),
            observations: Vec::new(),
            observe_cost: 0.0,
            hypothesis: None,
            hypothesis_cost: 0.0,
            strategies: Vec::new(),
            strategies_cost: 0.0,
            delay_ms: 0,
            fail_observe: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HypothesisScript {
    pub statement: String,
    pub confidence: f64,
}

/// Agent that replays a script instead of calling a live backend.
pub struct ScriptedAgent {
    id: AgentId,
    script: AgentScript,
}

impl ScriptedAgent {
    pub fn new(script: AgentScript) -> Self {
        Self {
            id: AgentId::new(&script.name),
            script,
        }
    }

    async fn apply_delay(&self) {
        if self.script.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.script.delay_ms)).await;
        }
    }
}

#[async_trait]
impl InvestigationAgent for ScriptedAgent {
    fn id(&self) -> &AgentId {
        &self.id
    }

    async fn observe(&self, _incident: &Incident) -> std::result::Result<(Vec<Observation>, f64), AgentError> {
        self.apply_delay().await;
        if self.script.fail_observe {
            return Err(AgentError::failed(format!(
                "scripted failure for agent '{}'",
                self.id
            )));
        }
        let observations = self
            .script
            .observations
            .iter()
            .map(|content| Observation::new(self.id.clone(), content.as_str()))
            .collect();
        Ok((observations, self.script.observe_cost))
    }

    async fn generate_hypothesis(
        &self,
        _observations: &[Observation],
    ) -> std::result::Result<(Hypothesis, f64), AgentError> {
        self.apply_delay().await;
        let script = self
            .script
            .hypothesis
            .as_ref()
            .ok_or_else(|| AgentError::failed(format!("agent '{}' has no hypothesis", self.id)))?;
        let hypothesis =
            Hypothesis::new(self.id.clone(), script.statement.as_str(), script.confidence);
        Ok((hypothesis, self.script.hypothesis_cost))
    }

    async fn generate_disproof_strategies(
        &self,
        _hypothesis: &Hypothesis,
    ) -> std::result::Result<(Vec<DisproofStrategy>, f64), AgentError> {
        self.apply_delay().await;
        let strategies = self
            .script
            .strategies
            .iter()
            .map(|description| DisproofStrategy::new(description.as_str()))
            .collect();
        Ok((strategies, self.script.strategies_cost))
    }
}
