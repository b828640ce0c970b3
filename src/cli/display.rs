use console::{Style, style};
use indicatif::{ProgressBar, ProgressStyle};

use crate::budget::CostReport;
use crate::orchestrator::{AgentOutcome, InvestigationReport, InvestigationState, OutcomeStatus};

pub struct Display;

impl Display {
    pub fn new() -> Self {
        Self
    }

    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", style(text).bold().cyan());
        println!("{}", style("═".repeat(60)).dim());
        println!();
    }

    pub fn print_success(&self, msg: &str) {
        println!("{} {}", style("✓").green().bold(), msg);
    }

    pub fn print_warning(&self, msg: &str) {
        println!("{} {}", style("!").yellow().bold(), msg);
    }

    pub fn print_error(&self, msg: &str) {
        eprintln!("{} {}", style("✗").red().bold(), msg);
    }

    pub fn print_info(&self, msg: &str) {
        println!("{} {}", style("·").dim(), msg);
    }

    pub fn create_spinner(&self, msg: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| {
                ProgressStyle::default_spinner()
            }),
        );
        spinner.set_message(msg.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        spinner
    }

    pub fn print_report(&self, report: &InvestigationReport) {
        self.print_header(&format!("Investigation: {}", report.incident_id));

        let state_style = self.state_style(report.state);
        println!(
            "State: {}",
            state_style.apply_to(report.state.to_string())
        );
        println!();

        if !report.ranked.is_empty() {
            println!("{}", style("Ranked hypotheses:").bold());
            for (i, h) in report.ranked.iter().enumerate() {
                println!(
                    "  {}. [{}] {} ({:.0}%)",
                    i + 1,
                    style(&h.agent).cyan(),
                    h.statement,
                    h.current_confidence * 100.0
                );
            }
            println!();
        }

        if !report.tested.is_empty() {
            println!("{}", style("Tested hypotheses:").bold());
            for tested in &report.tested {
                println!(
                    "  [{}] {}",
                    style(&tested.hypothesis.agent).cyan(),
                    tested.hypothesis.statement
                );
                for strategy in &tested.strategies {
                    println!("      disproof: {}", style(&strategy.description).dim());
                }
            }
            println!();
        }

        self.print_outcomes(&report.outcomes);
        self.print_costs(&report.costs);
    }

    pub fn print_outcomes(&self, outcomes: &[AgentOutcome]) {
        if outcomes.is_empty() {
            return;
        }
        println!("{}", style("Agent outcomes:").bold());
        for outcome in outcomes {
            let status = match &outcome.status {
                OutcomeStatus::Succeeded { cost } => {
                    format!("{} (${:.2})", style("ok").green(), cost)
                }
                OutcomeStatus::TimedOut => style("timed out").yellow().to_string(),
                OutcomeStatus::Failed { error } => {
                    format!("{}: {}", style("failed").red(), error)
                }
                OutcomeStatus::Skipped { reason } => {
                    format!("{}: {}", style("skipped").dim(), reason)
                }
            };
            println!(
                "  {:<12} {:<8} {:<6.1}s {}",
                outcome.agent,
                outcome.phase,
                outcome.elapsed.as_secs_f64(),
                status
            );
        }
        println!();
    }

    /// Cost breakdown, rendered even for aborted or cancelled runs.
    pub fn print_costs(&self, costs: &CostReport) {
        println!("{}", style("Cost breakdown:").bold());
        for (agent, cost) in &costs.by_agent {
            println!("  {:<12} ${:.2}", agent, cost);
        }
        let total_line = format!("  {:<12} ${:.2} / ${:.2}", "total", costs.total, costs.limit);
        if costs.total > costs.limit {
            println!("{}", style(total_line).red().bold());
        } else {
            println!("{}", style(total_line).bold());
        }
        println!();
    }

    fn state_style(&self, state: InvestigationState) -> Style {
        match state {
            InvestigationState::Completed => Style::new().green().bold(),
            InvestigationState::BudgetExceeded => Style::new().red().bold(),
            InvestigationState::Cancelled => Style::new().yellow().bold(),
            _ => Style::new().white(),
        }
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}
