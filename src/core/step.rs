//! Step domain model

use crate::command::{CommandError, CommandRunner, CommandSpec};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Error returned by a failed step
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("{0}")]
    Other(String),
}

/// One external operation in the reset pipeline.
///
/// Steps are stateless descriptors: running one twice performs its effect twice.
/// The future returned by `run` may be dropped at any await point when the
/// reset deadline fires, and implementations must stop their effect when that
/// happens.
#[async_trait]
pub trait Step: Send + Sync {
    /// Name used in logs and failure messages
    fn name(&self) -> &str;

    /// Perform the step's effect
    async fn run(&self) -> Result<(), StepError>;
}

impl fmt::Debug for dyn Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").field("name", &self.name()).finish()
    }
}

/// A step that runs an external command
pub struct CommandStep {
    name: String,
    spec: CommandSpec,
    runner: Arc<dyn CommandRunner>,
}

impl CommandStep {
    pub fn new(name: impl Into<String>, spec: CommandSpec, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            name: name.into(),
            spec,
            runner,
        }
    }
}

#[async_trait]
impl Step for CommandStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> Result<(), StepError> {
        let output = self.runner.run(&self.spec).await?;
        debug!("Step {} output: {}", self.name, output.stdout.trim());
        Ok(())
    }
}

/// Unconditional pause giving freshly started services time to come up
#[derive(Debug, Clone)]
pub struct DelayStep {
    name: String,
    duration: Duration,
}

impl DelayStep {
    pub fn new(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

#[async_trait]
impl Step for DelayStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> Result<(), StepError> {
        info!("Waiting {}s for services to settle", self.duration.as_secs_f64());
        tokio::time::sleep(self.duration).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandOutput;
    use std::sync::Mutex;

    struct RecordingRunner {
        calls: Mutex<Vec<String>>,
        exit_code: Option<i32>,
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
            self.calls.lock().unwrap().push(spec.display());
            match self.exit_code {
                Some(code) => Err(CommandError::Exit {
                    program: spec.program.clone(),
                    code,
                    stderr: "boom".to_string(),
                }),
                None => Ok(CommandOutput {
                    stdout: "ok".to_string(),
                    stderr: String::new(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_command_step_runs_its_command() {
        let runner = Arc::new(RecordingRunner {
            calls: Mutex::new(Vec::new()),
            exit_code: None,
        });
        let step = CommandStep::new("stop-agents", CommandSpec::new("sh").arg("./stop"), runner.clone());

        step.run().await.unwrap();

        assert_eq!(step.name(), "stop-agents");
        assert_eq!(*runner.calls.lock().unwrap(), vec!["sh ./stop".to_string()]);
    }

    #[tokio::test]
    async fn test_command_step_maps_command_failure() {
        let runner = Arc::new(RecordingRunner {
            calls: Mutex::new(Vec::new()),
            exit_code: Some(1),
        });
        let step = CommandStep::new("replace-db", CommandSpec::new("sh").arg("./replaceDB"), runner);

        let err = step.run().await.unwrap_err();
        assert!(matches!(err, StepError::Command(CommandError::Exit { code: 1, .. })));
        assert_eq!(err.to_string(), "sh exited with code 1: boom");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_step_sleeps_for_duration() {
        let step = DelayStep::new("settle", Duration::from_secs(25));
        let started = tokio::time::Instant::now();
        step.run().await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(25));
    }
}
