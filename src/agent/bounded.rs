//! Wall-clock deadline wrapper for single external calls.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::AgentError;

/// Outcome of a bounded call.
#[derive(Debug)]
pub enum CallOutcome<T> {
    /// The call finished before the deadline, successfully or not.
    Completed(Result<T, AgentError>),
    /// The deadline elapsed first. The worker has been aborted and any result
    /// it would have produced is discarded.
    TimedOut,
}

/// Executes exactly one external call with a hard wall-clock deadline.
///
/// The work runs on a single throwaway tokio task while the control thread
/// waits up to the deadline; the task is never reused and never shared across
/// calls. On timeout the task is aborted so that a late-arriving result — and
/// any cost charge it carries — has no path into shared accounting state.
/// This is not a pool: only one bounded call is ever in flight at a time.
#[derive(Debug, Clone, Copy)]
pub struct BoundedCall {
    deadline: Duration,
}

impl BoundedCall {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Run `fut` under the deadline, returning the outcome and elapsed time.
    ///
    /// A worker that panics or is cancelled surfaces as a recoverable
    /// `AgentError::Failed`, not a crash of the control loop.
    pub async fn invoke<F, T>(&self, operation: &str, fut: F) -> (CallOutcome<T>, Duration)
    where
        F: Future<Output = Result<T, AgentError>> + Send + 'static,
        T: Send + 'static,
    {
        let start = Instant::now();
        let mut handle = tokio::spawn(fut);

        match tokio::time::timeout(self.deadline, &mut handle).await {
            Ok(Ok(result)) => {
                let elapsed = start.elapsed();
                debug!(operation, ?elapsed, "bounded call completed");
                (CallOutcome::Completed(result), elapsed)
            }
            Ok(Err(join_err)) => {
                let elapsed = start.elapsed();
                warn!(operation, error = %join_err, "bounded call worker died");
                (
                    CallOutcome::Completed(Err(AgentError::failed(format!(
                        "worker for {} died: {}",
                        operation, join_err
                    )))),
                    elapsed,
                )
            }
            Err(_) => {
                // Abort the abandoned worker; its eventual result must be
                // discarded, not applied, since the orchestrator moves on.
                handle.abort();
                let elapsed = start.elapsed();
                warn!(operation, deadline = ?self.deadline, "bounded call timed out, aborting worker");
                (CallOutcome::TimedOut, elapsed)
            }
        }
    }
}
