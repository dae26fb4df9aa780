//! Reset session and outcome models

use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

/// Final classification of a reset session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every step ran and succeeded
    Succeeded,
    /// A step failed; nothing after it ran
    StepFailed {
        step: String,
        /// Zero-based position of the step in the pipeline
        index: usize,
        error: String,
    },
    /// The deadline elapsed before the pipeline finished
    TimedOut {
        /// Step that was running or about to start when time ran out
        step: Option<String>,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}

/// One attempt to run the reset pipeline
#[derive(Debug, Clone)]
pub struct ResetSession {
    /// Unique session ID, used to correlate log lines
    pub id: Uuid,

    /// When the session was admitted
    pub started_at: DateTime<Utc>,

    /// Time allowed for the whole pipeline
    pub deadline: Duration,

    /// Names of the steps that completed successfully, in order
    pub completed: Vec<String>,

    /// Set once, when the pipeline stops
    pub outcome: Option<Outcome>,
}

impl ResetSession {
    pub fn new(deadline: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            deadline,
            completed: Vec::new(),
            outcome: None,
        }
    }

    /// Record a successful step
    pub fn complete_step(&mut self, step: &str) {
        self.completed.push(step.to_string());
    }

    /// Set the outcome. The first outcome wins; later calls are ignored.
    pub fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn is_success(&self) -> bool {
        self.outcome.as_ref().is_some_and(Outcome::is_success)
    }

    /// Time spent since the session was admitted
    pub fn elapsed(&self) -> Duration {
        (Utc::now() - self.started_at).to_std().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_pending() {
        let session = ResetSession::new(Duration::from_secs(30));
        assert!(!session.is_finished());
        assert!(!session.is_success());
        assert!(session.completed.is_empty());
    }

    #[test]
    fn test_first_outcome_wins() {
        let mut session = ResetSession::new(Duration::from_secs(30));
        session.complete_step("stop-agents");
        session.finish(Outcome::StepFailed {
            step: "replace-db".to_string(),
            index: 1,
            error: "exit 1".to_string(),
        });
        session.finish(Outcome::Succeeded);

        assert!(session.is_finished());
        assert!(!session.is_success());
        assert_eq!(session.completed, vec!["stop-agents".to_string()]);
        assert!(matches!(session.outcome, Some(Outcome::StepFailed { index: 1, .. })));
    }
}
