use async_trait::async_trait;
use console::style;
use tracing::warn;

use crate::decision::{Decision, DecisionMaker};
use crate::domain::{Hypothesis, Incident};

/// Interactive decision collaborator on stdin/stdout.
///
/// Renders the ranked hypotheses and blocks on a line of input: a number picks
/// that hypothesis, `q` cancels. The wait is deliberately unbounded; the
/// orchestrator races it against its cancel handle.
pub struct ConsolePrompt;

impl ConsolePrompt {
    pub fn new() -> Self {
        Self
    }

    fn render(ranked: &[Hypothesis], incident: &Incident) {
        println!();
        println!(
            "{} {} ({})",
            style("Incident:").bold(),
            incident.description,
            incident.severity
        );
        println!();
        for (i, h) in ranked.iter().enumerate() {
            println!(
                "  {}. [{}] {} ({:.0}%)",
                style(i + 1).cyan().bold(),
                style(&h.agent).cyan(),
                h.statement,
                h.current_confidence * 100.0
            );
        }
        println!();
        println!(
            "Select a hypothesis to test [1-{}], or {} to cancel:",
            ranked.len(),
            style("q").yellow()
        );
    }

    fn read_line() -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(err) => {
                warn!(error = %err, "failed to read selection");
                None
            }
        }
    }
}

impl Default for ConsolePrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionMaker for ConsolePrompt {
    async fn select(&self, ranked: &[Hypothesis], incident: &Incident) -> Decision {
        Self::render(ranked, incident);
        let count = ranked.len();

        loop {
            let input = tokio::task::spawn_blocking(Self::read_line).await;
            let line = match input {
                Ok(Some(line)) => line,
                // EOF or a poisoned stdin reader; treat as cancellation.
                Ok(None) | Err(_) => return Decision::Cancelled,
            };

            if line.eq_ignore_ascii_case("q") {
                return Decision::Cancelled;
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => {
                    return Decision::Selected(ranked[n - 1].id.clone());
                }
                _ => {
                    println!(
                        "{} enter a number between 1 and {}, or q",
                        style("?").yellow(),
                        count
                    );
                }
            }
        }
    }
}
