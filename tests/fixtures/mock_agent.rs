//! Mock investigation agent for testing without a live backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use sleuth::agent::{AgentId, InvestigationAgent};
use sleuth::domain::{DisproofStrategy, Hypothesis, Incident, Observation};
use sleuth::error::AgentError;

/// What a mocked phase call does when dispatched.
#[derive(Debug, Clone)]
pub enum CallBehavior {
    /// Return canned output with the given cost.
    Succeed { cost: f64 },
    /// Return a recoverable error.
    Fail { message: String },
    /// Raise budget exhaustion from inside the agent.
    BudgetError,
    /// Sleep far past any test deadline.
    Hang,
}

impl CallBehavior {
    pub fn succeed(cost: f64) -> Self {
        Self::Succeed { cost }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail {
            message: message.into(),
        }
    }
}

#[derive(Default)]
struct CallCounts {
    observe: AtomicUsize,
    orient: AtomicUsize,
    test: AtomicUsize,
}

pub struct MockAgent {
    id: AgentId,
    observations: Vec<String>,
    confidence: f64,
    strategies: Vec<String>,
    observe_behavior: CallBehavior,
    orient_behavior: CallBehavior,
    test_behavior: CallBehavior,
    counts: Arc<CallCounts>,
}

impl MockAgent {
    pub fn builder(name: &str) -> MockAgentBuilder {
        MockAgentBuilder::new(name)
    }

    pub fn observe_calls(&self) -> usize {
        self.counts.observe.load(Ordering::SeqCst)
    }

    pub fn orient_calls(&self) -> usize {
        self.counts.orient.load(Ordering::SeqCst)
    }

    pub fn test_calls(&self) -> usize {
        self.counts.test.load(Ordering::SeqCst)
    }

    async fn apply<T>(&self, behavior: &CallBehavior, value: T) -> Result<(T, f64), AgentError> {
        match behavior {
            CallBehavior::Succeed { cost } => Ok((value, *cost)),
            CallBehavior::Fail { message } => Err(AgentError::failed(message.clone())),
            CallBehavior::BudgetError => Err(AgentError::BudgetExceeded {
                detail: format!("agent '{}' exhausted its internal allowance", self.id),
            }),
            CallBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                unreachable!("hang behavior must be aborted by the deadline")
            }
        }
    }
}

#[async_trait]
impl InvestigationAgent for MockAgent {
    fn id(&self) -> &AgentId {
        &self.id
    }

    async fn observe(
        &self,
        _incident: &Incident,
    ) -> Result<(Vec<Observation>, f64), AgentError> {
        self.counts.observe.fetch_add(1, Ordering::SeqCst);
        let observations = self
            .observations
            .iter()
            .map(|content| Observation::new(self.id.clone(), content.as_str()))
            .collect();
        self.apply(&self.observe_behavior, observations).await
    }

    async fn generate_hypothesis(
        &self,
        _observations: &[Observation],
    ) -> Result<(Hypothesis, f64), AgentError> {
        self.counts.orient.fetch_add(1, Ordering::SeqCst);
        let hypothesis = Hypothesis::new(
            self.id.clone(),
            format!("{} root cause", self.id),
            self.confidence,
        );
        self.apply(&self.orient_behavior, hypothesis).await
    }

    async fn generate_disproof_strategies(
        &self,
        _hypothesis: &Hypothesis,
    ) -> Result<(Vec<DisproofStrategy>, f64), AgentError> {
        self.counts.test.fetch_add(1, Ordering::SeqCst);
        let strategies = self
            .strategies
            .iter()
            .map(|description| DisproofStrategy::new(description.as_str()))
            .collect();
        self.apply(&self.test_behavior, strategies).await
    }
}

pub struct MockAgentBuilder {
    id: AgentId,
    observations: Vec<String>,
    confidence: f64,
    strategies: Vec<String>,
    observe_behavior: CallBehavior,
    orient_behavior: CallBehavior,
    test_behavior: CallBehavior,
}

impl MockAgentBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            id: AgentId::new(name),
            observations: vec![format!("{} baseline observation", name)],
            confidence: 0.5,
            strategies: vec![format!("{} disproof check", name)],
            observe_behavior: CallBehavior::succeed(1.0),
            orient_behavior: CallBehavior::succeed(1.0),
            test_behavior: CallBehavior::succeed(1.0),
        }
    }

    pub fn observations(mut self, observations: Vec<&str>) -> Self {
        self.observations = observations.into_iter().map(String::from).collect();
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn strategies(mut self, strategies: Vec<&str>) -> Self {
        self.strategies = strategies.into_iter().map(String::from).collect();
        self
    }

    pub fn on_observe(mut self, behavior: CallBehavior) -> Self {
        self.observe_behavior = behavior;
        self
    }

    pub fn on_orient(mut self, behavior: CallBehavior) -> Self {
        self.orient_behavior = behavior;
        self
    }

    pub fn on_test(mut self, behavior: CallBehavior) -> Self {
        self.test_behavior = behavior;
        self
    }

    /// Flat per-call cost across all three phases.
    pub fn cost(mut self, cost: f64) -> Self {
        self.observe_behavior = CallBehavior::succeed(cost);
        self.orient_behavior = CallBehavior::succeed(cost);
        self.test_behavior = CallBehavior::succeed(cost);
        self
    }

    pub fn build(self) -> Arc<MockAgent> {
        Arc::new(MockAgent {
            id: self.id,
            observations: self.observations,
            confidence: self.confidence,
            strategies: self.strategies,
            observe_behavior: self.observe_behavior,
            orient_behavior: self.orient_behavior,
            test_behavior: self.test_behavior,
            counts: Arc::new(CallCounts::default()),
        })
    }
}
