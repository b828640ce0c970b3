use thiserror::Error;

/// Recoverable error raised by a single agent call.
///
/// These are absorbed at per-agent granularity: the orchestrator records the
/// failure in the agent's outcome and moves on to the next agent. The one
/// exception is `BudgetExceeded`, which an agent raises when its own internal
/// accounting trips a limit; that must bubble up to the control loop instead of
/// being treated like any other agent failure. Timeouts are not represented
/// here: a call that overruns its deadline never returns, so the bounded-call
/// wrapper reports them as a distinct outcome instead.
#[derive(Debug, Clone)]
pub enum AgentError {
    BudgetExceeded { detail: String },
    Failed(String),
}

impl AgentError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::BudgetExceeded { .. })
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

impl std::fmt::Display for AgentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BudgetExceeded { detail } => write!(f, "agent budget exceeded: {}", detail),
            Self::Failed(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AgentError {}

#[derive(Error, Debug)]
pub enum SleuthError {
    /// Fatal: the hard cost limit was crossed. The run halts at the point of
    /// detection; accounting stays queryable so a cost report can still be
    /// rendered. Kept as its own variant so a broad agent-error handler can
    /// never catch and discard it.
    #[error("budget exceeded: spent {spent:.2} of limit {limit:.2}")]
    BudgetExceeded { spent: f64, limit: f64 },

    #[error("decision collaborator returned unknown hypothesis: {0}")]
    Decision(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SleuthError>;
