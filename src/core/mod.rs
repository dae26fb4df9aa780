//! Core domain models for the reset pipeline
//!
//! This module defines the steps, the ordered pipeline they form, the
//! configuration they are built from and the session that records one run.

pub mod config;
pub mod pipeline;
pub mod session;
pub mod step;

pub use config::{ResetConfig, StepConfig, MAX_DEADLINE_SECS};
pub use pipeline::*;
pub use session::*;
pub use step::*;
