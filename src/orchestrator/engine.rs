use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::agent::{AgentId, BoundedCall, CallOutcome, InvestigationAgent};
use crate::budget::{BudgetTracker, CostReport};
use crate::config::{DecideMode, SleuthConfig};
use crate::decision::{Decision, DecisionMaker};
use crate::domain::{Hypothesis, Incident, Observation};
use crate::error::{Result, SleuthError};
use crate::ranking::rank_by_confidence;

use super::outcome::{
    AgentOutcome, InvestigationReport, OutcomeStatus, Phase, TestedHypothesis,
};
use super::signal::CancelHandle;
use super::state::{InvestigationState, StateTransition};

/// The investigation control loop.
///
/// Composes the budget tracker, the bounded-call wrapper, the registered
/// agents, and the decision collaborator into a strictly sequential
/// Observe/Orient/Decide/Act cycle. All agent calls run back-to-back in
/// registration order, never concurrently; per-agent failures degrade
/// gracefully while budget exhaustion aborts the whole run.
pub struct Investigator {
    config: SleuthConfig,
    agents: Vec<Arc<dyn InvestigationAgent>>,
    decider: Arc<dyn DecisionMaker>,
    bounded: BoundedCall,
    budget: BudgetTracker,
    cancel: CancelHandle,
    state: InvestigationState,
    transitions: Vec<StateTransition>,
    outcomes: Vec<AgentOutcome>,
}

impl Investigator {
    pub fn new(
        config: SleuthConfig,
        agents: Vec<Arc<dyn InvestigationAgent>>,
        decider: Arc<dyn DecisionMaker>,
    ) -> Self {
        let bounded = BoundedCall::new(config.agent.timeout());
        let budget = BudgetTracker::new(config.budget.limit);
        Self {
            config,
            agents,
            decider,
            bounded,
            budget,
            cancel: CancelHandle::new(),
            state: InvestigationState::Idle,
            transitions: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    /// Handle for cooperative cancellation. Observed only during the
    /// interactive Decide wait.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn state(&self) -> InvestigationState {
        self.state
    }

    // Accounting stays queryable at any point, including after a fatal abort,
    // so a caller can render a cost breakdown even on failure.

    pub fn total_cost(&self) -> f64 {
        self.budget.total_cost()
    }

    pub fn cost_by_agent(&self) -> &std::collections::BTreeMap<AgentId, f64> {
        self.budget.cost_by_agent()
    }

    pub fn cost_report(&self) -> CostReport {
        self.budget.report()
    }

    pub fn outcomes(&self) -> &[AgentOutcome] {
        &self.outcomes
    }

    /// Run one full investigation of `incident`.
    ///
    /// Returns a report for completed and cancelled runs. Budget exhaustion
    /// returns `Err(SleuthError::BudgetExceeded)`; the accessors above still
    /// expose the accumulated accounting and outcome log afterwards.
    pub async fn run(&mut self, incident: &Incident) -> Result<InvestigationReport> {
        let started_at = Utc::now();
        info!(
            incident = %incident.id,
            severity = %incident.severity,
            agents = self.agents.len(),
            budget = self.budget.limit(),
            "starting investigation"
        );

        match self.run_phases(incident, started_at).await {
            Ok(report) => {
                info!(
                    state = %report.state,
                    total_cost = report.total_cost(),
                    hypotheses = report.ranked.len(),
                    tested = report.tested.len(),
                    "investigation finished"
                );
                Ok(report)
            }
            Err(err) => {
                if matches!(err, SleuthError::BudgetExceeded { .. }) {
                    self.transition(InvestigationState::BudgetExceeded);
                }
                error!(error = %err, total_cost = self.total_cost(), "investigation aborted");
                Err(err)
            }
        }
    }

    async fn run_phases(
        &mut self,
        incident: &Incident,
        started_at: DateTime<Utc>,
    ) -> Result<InvestigationReport> {
        self.transition(InvestigationState::Observing);
        let observations = self.observe_phase(incident).await?;

        self.transition(InvestigationState::Orienting);
        let hypotheses = self.orient_phase(&observations).await?;

        self.transition(InvestigationState::Deciding);
        let ranked = rank_by_confidence(hypotheses);

        if ranked.is_empty() {
            info!("no hypotheses generated; nothing to decide or test");
            self.transition(InvestigationState::Completed);
            return Ok(self.report(incident, ranked, Vec::new(), started_at));
        }

        let selected = match self.decide_phase(&ranked, incident).await? {
            Some(selected) => selected,
            None => {
                // Cancellation: clean terminal stop, full cost report, no Act
                // phase calls.
                self.transition(InvestigationState::Cancelled);
                return Ok(self.report(incident, ranked, Vec::new(), started_at));
            }
        };

        self.transition(InvestigationState::Testing);
        let tested = self.test_phase(selected).await?;

        self.transition(InvestigationState::Completed);
        Ok(self.report(incident, ranked, tested, started_at))
    }

    /// One bounded `observe` call per registered agent, in registration order.
    async fn observe_phase(
        &mut self,
        incident: &Incident,
    ) -> Result<Vec<(AgentId, Vec<Observation>)>> {
        let mut collected = Vec::new();

        for agent in self.agents.clone() {
            let id = agent.id().clone();
            let incident = incident.clone();
            let fut = async move { agent.observe(&incident).await };

            if let Some(observations) = self.dispatch(&id, Phase::Observe, fut).await? {
                debug!(agent = %id, count = observations.len(), "observations collected");
                collected.push((id, observations));
            }
        }

        Ok(collected)
    }

    /// One bounded `generate_hypothesis` call per agent that produced
    /// observations. The resulting list is the union across agents in
    /// dispatch order; no merging, no deduplication.
    async fn orient_phase(
        &mut self,
        observations: &[(AgentId, Vec<Observation>)],
    ) -> Result<Vec<Hypothesis>> {
        let mut hypotheses = Vec::new();

        for agent in self.agents.clone() {
            let id = agent.id().clone();
            let Some((_, agent_observations)) =
                observations.iter().find(|(a, obs)| a == &id && !obs.is_empty())
            else {
                debug!(agent = %id, "skipping orient: no observations");
                self.outcomes.push(AgentOutcome::new(
                    id,
                    Phase::Orient,
                    OutcomeStatus::Skipped {
                        reason: "no observations".into(),
                    },
                    Duration::ZERO,
                ));
                continue;
            };

            let agent_observations = agent_observations.clone();
            let fut = async move { agent.generate_hypothesis(&agent_observations).await };

            if let Some(hypothesis) = self.dispatch(&id, Phase::Orient, fut).await? {
                debug!(
                    agent = %id,
                    hypothesis = %hypothesis.id,
                    confidence = hypothesis.current_confidence,
                    "hypothesis generated"
                );
                hypotheses.push(hypothesis);
            }
        }

        Ok(hypotheses)
    }

    /// Resolve the selected hypothesis set, or `None` on cancellation.
    async fn decide_phase(
        &mut self,
        ranked: &[Hypothesis],
        incident: &Incident,
    ) -> Result<Option<Vec<Hypothesis>>> {
        match self.config.decide.mode {
            DecideMode::Automatic => {
                let n = self.config.decide.top_n.min(ranked.len());
                info!(top_n = n, "automatic decide: selecting top-ranked hypotheses");
                Ok(Some(ranked.iter().take(n).cloned().collect()))
            }
            DecideMode::Interactive => {
                info!("interactive decide: waiting for selection");
                let cancel = self.cancel.clone();
                let decision = tokio::select! {
                    decision = self.decider.select(ranked, incident) => decision,
                    _ = cancel.cancelled() => Decision::Cancelled,
                };

                match decision {
                    Decision::Cancelled => {
                        info!("investigation cancelled during decide");
                        Ok(None)
                    }
                    Decision::Selected(id) => {
                        let chosen = ranked
                            .iter()
                            .find(|h| h.id == id)
                            .cloned()
                            .ok_or_else(|| SleuthError::Decision(id.to_string()))?;
                        info!(hypothesis = %chosen.id, agent = %chosen.agent, "hypothesis selected");
                        Ok(Some(vec![chosen]))
                    }
                }
            }
        }
    }

    /// One bounded disproof-strategy call per selected hypothesis, routed to
    /// its owning agent. Cancellation is not observed here; the phase runs to
    /// completion or a fatal budget error.
    async fn test_phase(&mut self, selected: Vec<Hypothesis>) -> Result<Vec<TestedHypothesis>> {
        let mut tested = Vec::new();

        for hypothesis in selected {
            let id = hypothesis.agent.clone();
            let Some(agent) = self.agents.iter().find(|a| *a.id() == id).cloned() else {
                warn!(agent = %id, hypothesis = %hypothesis.id, "owning agent not registered");
                self.outcomes.push(AgentOutcome::new(
                    id,
                    Phase::Test,
                    OutcomeStatus::Skipped {
                        reason: "owning agent not registered".into(),
                    },
                    Duration::ZERO,
                ));
                continue;
            };

            let subject = hypothesis.clone();
            let fut = async move { agent.generate_disproof_strategies(&subject).await };

            if let Some(strategies) = self.dispatch(&id, Phase::Test, fut).await? {
                debug!(
                    hypothesis = %hypothesis.id,
                    strategies = strategies.len(),
                    "disproof strategies generated"
                );
                tested.push(TestedHypothesis {
                    hypothesis,
                    strategies,
                });
            }
        }

        Ok(tested)
    }

    /// Issue one bounded agent call, record its outcome, and charge the
    /// budget on success.
    ///
    /// Recoverable failures (timeout, agent error) return `Ok(None)` so the
    /// phase continues with the next agent. Budget exhaustion — whether from
    /// our own tracker after the charge, or raised by the agent's internal
    /// accounting — is returned as the fatal top-level error and is never
    /// absorbed here.
    async fn dispatch<V, F>(
        &mut self,
        agent: &AgentId,
        phase: Phase,
        fut: F,
    ) -> Result<Option<V>>
    where
        F: Future<Output = std::result::Result<(V, f64), crate::error::AgentError>>
            + Send
            + 'static,
        V: Send + 'static,
    {
        let operation = format!("{}/{}", agent, phase);
        let (outcome, elapsed) = self.bounded.invoke(&operation, fut).await;

        match outcome {
            CallOutcome::Completed(Ok((value, cost))) => {
                self.outcomes.push(AgentOutcome::new(
                    agent.clone(),
                    phase,
                    OutcomeStatus::Succeeded { cost },
                    elapsed,
                ));
                // Charge after the call completes; the overrun check happens
                // inside and aborts the run on failure.
                self.budget.charge(agent, cost)?;
                Ok(Some(value))
            }
            CallOutcome::Completed(Err(err)) if err.is_fatal() => {
                error!(agent = %agent, %phase, error = %err, "agent raised budget exhaustion");
                // The call that ends the run still belongs in the outcome log.
                self.outcomes.push(AgentOutcome::new(
                    agent.clone(),
                    phase,
                    OutcomeStatus::Failed {
                        error: err.to_string(),
                    },
                    elapsed,
                ));
                Err(SleuthError::BudgetExceeded {
                    spent: self.budget.total_cost(),
                    limit: self.budget.limit(),
                })
            }
            CallOutcome::Completed(Err(err)) => {
                warn!(agent = %agent, %phase, error = %err, "agent call failed; continuing");
                self.outcomes.push(AgentOutcome::new(
                    agent.clone(),
                    phase,
                    OutcomeStatus::Failed {
                        error: err.to_string(),
                    },
                    elapsed,
                ));
                Ok(None)
            }
            CallOutcome::TimedOut => {
                warn!(agent = %agent, %phase, ?elapsed, "agent call timed out; continuing");
                self.outcomes.push(AgentOutcome::new(
                    agent.clone(),
                    phase,
                    OutcomeStatus::TimedOut,
                    elapsed,
                ));
                Ok(None)
            }
        }
    }

    fn transition(&mut self, to: InvestigationState) {
        debug_assert!(
            self.state.can_transition_to(to),
            "illegal transition {} -> {}",
            self.state,
            to
        );
        debug!(from = %self.state, to = %to, "state transition");
        self.transitions.push(StateTransition::new(self.state, to));
        self.state = to;
    }

    fn report(
        &self,
        incident: &Incident,
        ranked: Vec<Hypothesis>,
        tested: Vec<TestedHypothesis>,
        started_at: DateTime<Utc>,
    ) -> InvestigationReport {
        InvestigationReport {
            incident_id: incident.id.clone(),
            state: self.state,
            ranked,
            tested,
            costs: self.budget.report(),
            outcomes: self.outcomes.clone(),
            transitions: self.transitions.clone(),
            started_at,
            finished_at: Utc::now(),
        }
    }
}
