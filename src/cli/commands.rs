use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sleuth", about = "OODA-loop incident investigation orchestrator", version)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an investigation from a scenario file.
    Run {
        /// Path to the scenario TOML file.
        scenario: PathBuf,

        /// Optional config TOML; defaults are used when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Select the top-N hypotheses automatically instead of prompting.
        #[arg(long)]
        auto: bool,

        /// How many hypotheses to test in automatic mode.
        #[arg(long)]
        top_n: Option<usize>,

        /// Override the total budget limit in dollars.
        #[arg(long)]
        budget: Option<f64>,

        /// Override the per-call timeout in seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Parse and validate a scenario file without running it.
    Validate {
        /// Path to the scenario TOML file.
        scenario: PathBuf,
    },
}
