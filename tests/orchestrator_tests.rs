mod fixtures;

use std::sync::Arc;

use async_trait::async_trait;

use sleuth::agent::InvestigationAgent;
use sleuth::config::{DecideMode, SleuthConfig};
use sleuth::decision::{Decision, DecisionMaker};
use sleuth::domain::{Hypothesis, Incident, Severity};
use sleuth::error::SleuthError;
use sleuth::orchestrator::{InvestigationState, Investigator, OutcomeStatus, Phase};

use fixtures::mock_agent::{CallBehavior, MockAgent};

fn config(limit: f64, timeout_secs: u64, mode: DecideMode, top_n: usize) -> SleuthConfig {
    let mut config = SleuthConfig::default();
    config.budget.limit = limit;
    config.agent.timeout_secs = timeout_secs;
    config.decide.mode = mode;
    config.decide.top_n = top_n;
    config
}

fn incident() -> Incident {
    Incident::new("inc-1", "checkout latency spike", Severity::High)
}

/// Picks the ranked hypothesis with the given confidence.
struct SelectByConfidence(f64);

#[async_trait]
impl DecisionMaker for SelectByConfidence {
    async fn select(&self, ranked: &[Hypothesis], _incident: &Incident) -> Decision {
        let chosen = ranked
            .iter()
            .find(|h| (h.current_confidence - self.0).abs() < 1e-9)
            .expect("hypothesis with requested confidence");
        Decision::Selected(chosen.id.clone())
    }
}

/// Blocks forever, standing in for a human who never answers.
struct NeverDecide;

#[async_trait]
impl DecisionMaker for NeverDecide {
    async fn select(&self, _ranked: &[Hypothesis], _incident: &Incident) -> Decision {
        std::future::pending().await
    }
}

struct PickFirst;

#[async_trait]
impl DecisionMaker for PickFirst {
    async fn select(&self, ranked: &[Hypothesis], _incident: &Incident) -> Decision {
        Decision::Selected(ranked[0].id.clone())
    }
}

#[tokio::test]
async fn test_budget_overrun_aborts_with_full_accounting() {
    // Limit 10, three agents at 4.00 per observe call. The third charge takes
    // the total to 12.00, past the limit, and aborts the run.
    let agents: Vec<Arc<MockAgent>> = ["database", "application", "network"]
        .iter()
        .map(|name| MockAgent::builder(name).cost(4.0).build())
        .collect();

    let mut investigator = Investigator::new(
        config(10.0, 30, DecideMode::Automatic, 3),
        agents.iter().map(|a| a.clone() as _).collect(),
        Arc::new(PickFirst),
    );

    let err = investigator.run(&incident()).await.unwrap_err();
    assert!(matches!(
        err,
        SleuthError::BudgetExceeded { spent, limit } if spent == 12.0 && limit == 10.0
    ));

    // Accounting stays queryable after the abort, overrun included.
    assert_eq!(investigator.state(), InvestigationState::BudgetExceeded);
    assert_eq!(investigator.total_cost(), 12.0);
    assert_eq!(investigator.cost_by_agent().len(), 3);
    let sum: f64 = investigator.cost_by_agent().values().sum();
    assert_eq!(sum, investigator.total_cost());

    // All three observe calls ran and got charged before the abort.
    for agent in &agents {
        assert_eq!(agent.observe_calls(), 1);
        assert_eq!(agent.orient_calls(), 0);
    }
}

#[tokio::test(start_paused = true)]
async fn test_hanging_agent_does_not_block_the_others() {
    let database = MockAgent::builder("database")
        .on_observe(CallBehavior::Hang)
        .build();
    let application = MockAgent::builder("application").confidence(0.7).build();
    let network = MockAgent::builder("network").confidence(0.4).build();

    let mut investigator = Investigator::new(
        config(100.0, 5, DecideMode::Automatic, 3),
        vec![
            database.clone() as _,
            application.clone() as _,
            network.clone() as _,
        ],
        Arc::new(PickFirst),
    );

    let report = investigator.run(&incident()).await.expect("run completes");

    assert_eq!(report.state, InvestigationState::Completed);
    assert_eq!(application.orient_calls(), 1);
    assert_eq!(network.orient_calls(), 1);

    // The hung observe call is recorded as timed out and produces neither
    // observations nor a charge; orient is then skipped for lack of them.
    let database_outcomes: Vec<_> = report
        .outcomes
        .iter()
        .filter(|o| o.agent.as_str() == "database")
        .collect();
    assert!(database_outcomes
        .iter()
        .any(|o| o.phase == Phase::Observe && matches!(o.status, OutcomeStatus::TimedOut)));
    assert!(database_outcomes
        .iter()
        .any(|o| o.phase == Phase::Orient && matches!(o.status, OutcomeStatus::Skipped { .. })));
    assert!(!investigator.cost_by_agent().contains_key(database.id()));

    // The surviving agents still yield a ranked report.
    assert_eq!(report.ranked.len(), 2);
    assert_eq!(report.ranked[0].current_confidence, 0.7);
}

#[tokio::test]
async fn test_interactive_selection_tests_exactly_one_hypothesis() {
    let database = MockAgent::builder("database").confidence(0.85).build();
    let application = MockAgent::builder("application").confidence(0.60).build();
    let network = MockAgent::builder("network").confidence(0.72).build();

    let mut investigator = Investigator::new(
        config(100.0, 30, DecideMode::Interactive, 3),
        vec![
            database.clone() as _,
            application.clone() as _,
            network.clone() as _,
        ],
        Arc::new(SelectByConfidence(0.72)),
    );

    let report = investigator.run(&incident()).await.expect("run completes");

    assert_eq!(report.state, InvestigationState::Completed);

    let confidences: Vec<f64> = report
        .ranked
        .iter()
        .map(|h| h.current_confidence)
        .collect();
    assert_eq!(confidences, vec![0.85, 0.72, 0.60]);

    // Only the selected hypothesis reaches the Act phase.
    assert_eq!(report.tested.len(), 1);
    assert_eq!(report.tested[0].hypothesis.current_confidence, 0.72);
    assert_eq!(network.test_calls(), 1);
    assert_eq!(database.test_calls(), 0);
    assert_eq!(application.test_calls(), 0);
}

#[tokio::test]
async fn test_automatic_mode_tests_top_n() {
    let agents: Vec<Arc<MockAgent>> = [
        ("database", 0.9),
        ("application", 0.8),
        ("network", 0.7),
        ("storage", 0.6),
        ("dns", 0.5),
    ]
    .iter()
    .map(|(name, confidence)| MockAgent::builder(name).confidence(*confidence).build())
    .collect();

    let mut investigator = Investigator::new(
        config(100.0, 30, DecideMode::Automatic, 3),
        agents.iter().map(|a| a.clone() as _).collect(),
        Arc::new(PickFirst),
    );

    let report = investigator.run(&incident()).await.expect("run completes");

    assert_eq!(report.ranked.len(), 5);
    assert_eq!(report.tested.len(), 3);
    for (agent, tested) in agents.iter().zip([1, 1, 1, 0, 0]) {
        assert_eq!(agent.test_calls(), tested, "agent {}", agent.id());
    }
}

#[tokio::test]
async fn test_cancellation_during_decide() {
    let database = MockAgent::builder("database").cost(2.0).build();
    let application = MockAgent::builder("application").cost(1.0).build();

    let mut investigator = Investigator::new(
        config(100.0, 30, DecideMode::Interactive, 3),
        vec![database.clone() as _, application.clone() as _],
        Arc::new(NeverDecide),
    );

    // Cancel up front; the flag is only observed once the run reaches the
    // interactive decide wait, after Observe and Orient complete.
    investigator.cancel_handle().cancel();

    let report = investigator.run(&incident()).await.expect("clean stop");

    assert_eq!(report.state, InvestigationState::Cancelled);
    assert_eq!(report.tested.len(), 0);
    assert_eq!(database.test_calls(), 0);
    assert_eq!(application.test_calls(), 0);

    // Costs accumulated before cancellation are all reported.
    assert_eq!(report.costs.total, 6.0);
    assert_eq!(investigator.total_cost(), 6.0);
}

#[tokio::test]
async fn test_failed_agent_degrades_gracefully() {
    let database = MockAgent::builder("database")
        .on_observe(CallBehavior::fail("backend unreachable"))
        .build();
    let application = MockAgent::builder("application").confidence(0.6).build();

    let mut investigator = Investigator::new(
        config(100.0, 30, DecideMode::Automatic, 3),
        vec![database.clone() as _, application.clone() as _],
        Arc::new(PickFirst),
    );

    let report = investigator.run(&incident()).await.expect("run completes");

    assert_eq!(report.state, InvestigationState::Completed);
    assert_eq!(report.ranked.len(), 1);
    assert!(report.outcomes.iter().any(|o| {
        o.agent.as_str() == "database"
            && matches!(&o.status, OutcomeStatus::Failed { error } if error.contains("backend unreachable"))
    }));
    // Failed calls cost nothing.
    assert!(!investigator.cost_by_agent().contains_key(database.id()));
}

#[tokio::test]
async fn test_failed_disproof_call_yields_no_tested_hypothesis() {
    let database = MockAgent::builder("database")
        .confidence(0.9)
        .strategies(vec!["replay the migration on staging"])
        .on_test(CallBehavior::fail("strategy generator crashed"))
        .build();
    let application = MockAgent::builder("application")
        .confidence(0.7)
        .strategies(vec!["diff generated SQL between versions"])
        .build();

    let mut investigator = Investigator::new(
        config(100.0, 30, DecideMode::Automatic, 2),
        vec![database.clone() as _, application.clone() as _],
        Arc::new(PickFirst),
    );

    let report = investigator.run(&incident()).await.expect("run completes");

    // Both selected hypotheses were attempted; only the healthy agent's made
    // it into the tested list.
    assert_eq!(database.test_calls(), 1);
    assert_eq!(application.test_calls(), 1);
    assert_eq!(report.tested.len(), 1);
    assert_eq!(report.tested[0].hypothesis.agent.as_str(), "application");
    assert_eq!(
        report.tested[0].strategies[0].description,
        "diff generated SQL between versions"
    );
    assert!(report.outcomes.iter().any(|o| {
        o.phase == Phase::Test && matches!(&o.status, OutcomeStatus::Failed { .. })
    }));
}

#[tokio::test]
async fn test_agent_raised_budget_error_is_fatal() {
    let database = MockAgent::builder("database")
        .on_orient(CallBehavior::BudgetError)
        .build();
    let application = MockAgent::builder("application").build();

    let mut investigator = Investigator::new(
        config(100.0, 30, DecideMode::Automatic, 3),
        vec![database.clone() as _, application.clone() as _],
        Arc::new(PickFirst),
    );

    let err = investigator.run(&incident()).await.unwrap_err();
    assert!(matches!(err, SleuthError::BudgetExceeded { .. }));
    assert_eq!(investigator.state(), InvestigationState::BudgetExceeded);

    // The run aborted during database's orient call; application never
    // reached Orient.
    assert_eq!(application.observe_calls(), 1);
    assert_eq!(application.orient_calls(), 0);

    // The fatal call itself is still in the outcome log for transparency.
    assert!(investigator.outcomes().iter().any(|o| {
        o.agent.as_str() == "database"
            && o.phase == Phase::Orient
            && matches!(&o.status, OutcomeStatus::Failed { error } if error.contains("budget"))
    }));
}

#[tokio::test]
async fn test_no_hypotheses_completes_without_deciding() {
    let database = MockAgent::builder("database")
        .observations(vec![])
        .build();

    let mut investigator = Investigator::new(
        config(100.0, 30, DecideMode::Interactive, 3),
        vec![database.clone() as _],
        // Would hang if the decide phase ran.
        Arc::new(NeverDecide),
    );

    let report = investigator.run(&incident()).await.expect("run completes");

    assert_eq!(report.state, InvestigationState::Completed);
    assert!(report.ranked.is_empty());
    assert!(report.tested.is_empty());
    assert_eq!(database.orient_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_call_is_never_charged() {
    // The orient call hangs past the deadline; its cost must not appear in
    // the tracker even though the underlying future carried one.
    let database = MockAgent::builder("database")
        .on_observe(CallBehavior::succeed(3.0))
        .on_orient(CallBehavior::Hang)
        .build();

    let mut investigator = Investigator::new(
        config(100.0, 5, DecideMode::Automatic, 3),
        vec![database.clone() as _],
        Arc::new(PickFirst),
    );

    let report = investigator.run(&incident()).await.expect("run completes");

    assert_eq!(report.state, InvestigationState::Completed);
    assert_eq!(investigator.total_cost(), 3.0);
    assert!(report
        .outcomes
        .iter()
        .any(|o| o.phase == Phase::Orient && matches!(o.status, OutcomeStatus::TimedOut)));
}

#[tokio::test]
async fn test_state_transitions_recorded_in_order() {
    let database = MockAgent::builder("database").confidence(0.8).build();

    let mut investigator = Investigator::new(
        config(100.0, 30, DecideMode::Automatic, 1),
        vec![database as _],
        Arc::new(PickFirst),
    );

    let report = investigator.run(&incident()).await.expect("run completes");

    let states: Vec<InvestigationState> =
        report.transitions.iter().map(|t| t.to).collect();
    assert_eq!(
        states,
        vec![
            InvestigationState::Observing,
            InvestigationState::Orienting,
            InvestigationState::Deciding,
            InvestigationState::Testing,
            InvestigationState::Completed,
        ]
    );
}
