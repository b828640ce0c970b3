use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use sleuth::cli::{Cli, Commands, ConsolePrompt, Display};
use sleuth::config::{DecideMode, SleuthConfig};
use sleuth::error::{Result, SleuthError};
use sleuth::orchestrator::Investigator;
use sleuth::scenario::Scenario;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Display::new().print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sleuth=debug")
    } else {
        EnvFilter::new("sleuth=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let display = Display::new();

    match cli.command {
        Commands::Run {
            scenario,
            config,
            auto,
            top_n,
            budget,
            timeout_secs,
        } => {
            let config = resolve_config(config.as_deref(), auto, top_n, budget, timeout_secs).await?;
            cmd_run(&display, &scenario, config).await
        }
        Commands::Validate { scenario } => cmd_validate(&display, &scenario).await,
    }
}

async fn resolve_config(
    path: Option<&Path>,
    auto: bool,
    top_n: Option<usize>,
    budget: Option<f64>,
    timeout_secs: Option<u64>,
) -> Result<SleuthConfig> {
    let mut config = match path {
        Some(path) => SleuthConfig::load(path).await?,
        None => SleuthConfig::default(),
    };

    if auto {
        config.decide.mode = DecideMode::Automatic;
    }
    if let Some(n) = top_n {
        config.decide.top_n = n;
    }
    if let Some(limit) = budget {
        config.budget.limit = limit;
    }
    if let Some(secs) = timeout_secs {
        config.agent.timeout_secs = secs;
    }
    config.validate()?;

    Ok(config)
}

async fn cmd_run(display: &Display, scenario_path: &PathBuf, config: SleuthConfig) -> Result<()> {
    let scenario = Scenario::load(scenario_path).await?;
    let incident = scenario.incident();
    let agents = scenario.agents();

    display.print_header(&format!("Investigating: {}", incident.description));
    display.print_info(&format!(
        "{} agents, budget ${:.2}, timeout {}s",
        agents.len(),
        config.budget.limit,
        config.agent.timeout_secs
    ));

    let automatic = config.decide.mode == DecideMode::Automatic;
    let mut investigator = Investigator::new(config, agents, Arc::new(ConsolePrompt::new()));

    // Ctrl-C cancels the run cooperatively; the loop observes the handle
    // during the interactive decide wait.
    let cancel = investigator.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; cancelling investigation");
            cancel.cancel();
        }
    });

    // Interactive runs hand the terminal to the decide prompt mid-run, so the
    // spinner is reserved for automatic mode.
    let spinner = automatic.then(|| display.create_spinner("Investigating..."));

    let result = investigator.run(&incident).await;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    match result {
        Ok(report) => {
            display.print_report(&report);
            match report.state {
                sleuth::InvestigationState::Cancelled => {
                    display.print_warning("Investigation cancelled.");
                }
                _ => display.print_success("Investigation complete."),
            }
            Ok(())
        }
        Err(err @ SleuthError::BudgetExceeded { .. }) => {
            // Render what accounting we have before reporting the abort.
            display.print_outcomes(investigator.outcomes());
            display.print_costs(&investigator.cost_report());
            Err(err)
        }
        Err(err) => Err(err),
    }
}

async fn cmd_validate(display: &Display, scenario_path: &PathBuf) -> Result<()> {
    let scenario = Scenario::load(scenario_path).await?;
    display.print_success(&format!(
        "Scenario '{}' is valid: {} agents.",
        scenario.incident.id,
        scenario.agents.len()
    ));
    Ok(())
}
