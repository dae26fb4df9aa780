//! Test utility functions for demo-reset

#![allow(dead_code)]

use async_trait::async_trait;
use demo_reset::core::{Pipeline, Step, StepError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Names of the standard reset steps, in order
pub const STANDARD_STEPS: [&str; 5] = [
    "stop-agents",
    "replace-db",
    "start-agents",
    "settle",
    "reset-access-rules",
];

/// Shared record of step invocations
#[derive(Debug, Clone, Default)]
pub struct StepLog(Arc<Mutex<Vec<String>>>);

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, name: &str) {
        self.0.lock().unwrap().push(name.to_string());
    }

    /// Steps invoked so far, in invocation order
    pub fn invocations(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

/// What a mock step does when run
#[derive(Debug, Clone)]
pub enum Behavior {
    Succeed,
    Fail(String),
    Sleep(Duration),
    /// Block until notified
    WaitFor(Arc<Notify>),
}

/// Mock step that records its invocation and then behaves as told
pub struct MockStep {
    name: String,
    log: StepLog,
    behavior: Behavior,
}

impl MockStep {
    pub fn new(name: &str, log: &StepLog, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            behavior,
        }
    }
}

#[async_trait]
impl Step for MockStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> Result<(), StepError> {
        self.log.record(&self.name);
        match &self.behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Fail(message) => Err(StepError::Other(message.clone())),
            Behavior::Sleep(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(())
            }
            Behavior::WaitFor(notify) => {
                notify.notified().await;
                Ok(())
            }
        }
    }
}

/// Build the standard five-step pipeline.
///
/// Every step succeeds immediately except the settle step, which sleeps for
/// `settle`, and any step listed in `overrides`, which behaves as given.
pub fn standard_pipeline(
    log: &StepLog,
    settle: Duration,
    overrides: &[(&str, Behavior)],
) -> Pipeline {
    let mut pipeline = Pipeline::new();
    for name in STANDARD_STEPS {
        let behavior = overrides
            .iter()
            .find(|(step, _)| *step == name)
            .map(|(_, behavior)| behavior.clone())
            .unwrap_or_else(|| {
                if name == "settle" {
                    Behavior::Sleep(settle)
                } else {
                    Behavior::Succeed
                }
            });
        pipeline.push(MockStep::new(name, log, behavior));
    }
    pipeline
}

/// Wait until the admission slot of `guard` is taken
pub async fn wait_until_held(guard: &demo_reset::AdmissionGuard) {
    while !guard.is_held() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

/// Poll until the admission slot is free again
pub async fn wait_until_released(guard: &demo_reset::AdmissionGuard) {
    while guard.is_held() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}
