//! demo-reset - an HTTP service that resets the demo agents to a known state

pub mod cli;
pub mod command;
pub mod core;
pub mod execution;
pub mod server;

// Re-export commonly used types
pub use command::{CommandError, CommandRunner, CommandSpec, SubprocessRunner};
pub use core::{Outcome, Pipeline, ResetConfig, ResetSession, Step, StepError};
pub use execution::{AdmissionGuard, AdmissionPermit, PipelineExecutor, ResetError, ResetService};
