//! Reset service - admits one reset at a time and races it against the deadline

use crate::core::config::MAX_DEADLINE_SECS;
use crate::core::{Outcome, Pipeline, ResetSession};
use crate::execution::{AdmissionGuard, PipelineExecutor};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tracing::{error, info, warn};

/// Why a reset request did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResetError {
    /// Another reset holds the admission slot
    #[error("failed to process request since a previous request is running")]
    InProgress,

    /// A step failed; later steps did not run
    #[error("failed to process: step '{step}' failed: {error}")]
    StepFailed { step: String, error: String },

    /// The deadline passed first; the demo is in an unknown state
    #[error("timed out")]
    TimedOut,

    /// The reset task ended without an outcome (panic)
    #[error("failed to process: reset task aborted: {0}")]
    Aborted(String),
}

/// Aborts the reset task when the caller waiting on it goes away
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Entry point for reset requests
#[derive(Debug, Clone)]
pub struct ResetService {
    guard: AdmissionGuard,
    executor: PipelineExecutor,
    deadline: Duration,
}

impl ResetService {
    /// Deadlines longer than `MAX_DEADLINE_SECS` are clamped to it.
    pub fn new(pipeline: Pipeline, deadline: Duration) -> Self {
        Self {
            guard: AdmissionGuard::new(),
            executor: PipelineExecutor::new(pipeline),
            deadline: deadline.min(Duration::from_secs(MAX_DEADLINE_SECS)),
        }
    }

    pub fn guard(&self) -> &AdmissionGuard {
        &self.guard
    }

    /// Run one reset.
    ///
    /// Fails immediately with `InProgress` when another reset is running.
    /// Otherwise the pipeline runs in its own task while this call waits for
    /// either its outcome or the deadline.
    ///
    /// The admission permit lives inside the task, so the slot stays taken
    /// until the pipeline has actually stopped. The task is aborted on
    /// timeout and when this future is dropped, which kills any step process
    /// still running. On timeout the aborted task is awaited, so the slot is
    /// free again by the time this returns.
    pub async fn reset(&self) -> Result<ResetSession, ResetError> {
        let Some(permit) = self.guard.try_acquire() else {
            warn!("Rejecting reset: a previous request is running");
            return Err(ResetError::InProgress);
        };

        let mut session = ResetSession::new(self.deadline);
        let session_id = session.id;
        let deadline = Instant::now() + self.deadline;

        info!(
            "Reset {} admitted, deadline {}s",
            session_id,
            self.deadline.as_secs_f64()
        );

        let executor = self.executor.clone();
        let mut task = AbortOnDrop(tokio::spawn(async move {
            let _permit = permit;
            executor.run(&mut session, deadline).await;
            session
        }));

        let session = match timeout_at(deadline, &mut task.0).await {
            Ok(Ok(session)) => session,
            Ok(Err(e)) => {
                error!("Reset {} task failed: {}", session_id, e);
                return Err(ResetError::Aborted(e.to_string()));
            }
            Err(_) => {
                warn!("Reset {} timed out, abandoning pipeline", session_id);
                task.0.abort();
                let _ = (&mut task.0).await;
                return Err(ResetError::TimedOut);
            }
        };

        match &session.outcome {
            Some(Outcome::Succeeded) => Ok(session),
            Some(Outcome::StepFailed { step, error, .. }) => Err(ResetError::StepFailed {
                step: step.clone(),
                error: error.clone(),
            }),
            Some(Outcome::TimedOut { .. }) => Err(ResetError::TimedOut),
            None => Err(ResetError::Aborted(
                "pipeline stopped without an outcome".to_string(),
            )),
        }
    }
}
