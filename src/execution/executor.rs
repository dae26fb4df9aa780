//! Pipeline executor - runs the reset steps in order

use crate::core::{Outcome, Pipeline, ResetSession};
use tokio::time::{timeout_at, Instant};
use tracing::{error, info, warn};

/// Runs every step of a pipeline, one after another
#[derive(Debug, Clone)]
pub struct PipelineExecutor {
    pipeline: Pipeline,
}

impl PipelineExecutor {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    /// Execute the pipeline until it finishes, a step fails or `deadline` passes.
    ///
    /// Step N+1 only starts after step N succeeded. A step still running at the
    /// deadline is dropped, and a step not yet started never starts. Steps that
    /// already ran are not undone.
    ///
    /// The outcome is recorded on `session` and returned.
    pub async fn run(&self, session: &mut ResetSession, deadline: Instant) -> Outcome {
        let total = self.pipeline.len();
        info!("Starting reset {} ({} steps)", session.id, total);

        for (index, step) in self.pipeline.steps().iter().enumerate() {
            if Instant::now() >= deadline {
                warn!("Reset {} out of time before step {}", session.id, step.name());
                return finish(session, Outcome::TimedOut {
                    step: Some(step.name().to_string()),
                });
            }

            info!("[{}/{}] Running step: {}", index + 1, total, step.name());

            match timeout_at(deadline, step.run()).await {
                Ok(Ok(())) => {
                    info!("Step {} completed", step.name());
                    session.complete_step(step.name());
                }
                Ok(Err(e)) => {
                    error!("Step {} failed: {}", step.name(), e);
                    return finish(session, Outcome::StepFailed {
                        step: step.name().to_string(),
                        index,
                        error: e.to_string(),
                    });
                }
                Err(_) => {
                    warn!("Reset {} timed out during step {}", session.id, step.name());
                    return finish(session, Outcome::TimedOut {
                        step: Some(step.name().to_string()),
                    });
                }
            }
        }

        info!(
            "Reset {} completed in {:.1}s",
            session.id,
            session.elapsed().as_secs_f64()
        );
        finish(session, Outcome::Succeeded)
    }
}

fn finish(session: &mut ResetSession, outcome: Outcome) -> Outcome {
    session.finish(outcome.clone());
    outcome
}
