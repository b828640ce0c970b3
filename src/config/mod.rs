//! Configuration surface consumed, not owned, by the control loop.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{Result, SleuthError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SleuthConfig {
    pub budget: BudgetConfig,
    pub agent: AgentCallConfig,
    pub decide: DecideConfig,
}

impl SleuthConfig {
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| SleuthError::Config(e.to_string()))?;
        fs::write(path, content).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.budget.limit <= 0.0 {
            errors.push("budget.limit must be greater than 0");
        }
        if !self.budget.limit.is_finite() {
            errors.push("budget.limit must be finite");
        }
        if self.agent.timeout_secs == 0 {
            errors.push("agent.timeout_secs must be greater than 0");
        }
        if self.decide.top_n == 0 {
            errors.push("decide.top_n must be greater than 0");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SleuthError::Config(errors.join("; ")))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Hard total spend limit in dollars for one investigation run.
    pub limit: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self { limit: 10.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentCallConfig {
    /// Wall-clock deadline for a single agent call.
    pub timeout_secs: u64,
}

impl AgentCallConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AgentCallConfig {
    fn default() -> Self {
        Self { timeout_secs: 120 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecideMode {
    /// Block on the decision collaborator for a human selection.
    #[default]
    Interactive,
    /// Take the top-N ranked hypotheses without blocking.
    Automatic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecideConfig {
    pub mode: DecideMode,
    /// Number of hypotheses tested in automatic mode.
    pub top_n: usize,
}

impl Default for DecideConfig {
    fn default() -> Self {
        Self {
            mode: DecideMode::Interactive,
            top_n: 3,
        }
    }
}
