//! Command-line interface.
//!
//! - `Cli`, `Commands`: argument definitions via clap
//! - `Display`: styled terminal output for reports and cost breakdowns
//! - `ConsolePrompt`: interactive decision collaborator on stdin/stdout

mod commands;
mod display;
mod interactive;

pub use commands::{Cli, Commands};
pub use display::Display;
pub use interactive::ConsolePrompt;
