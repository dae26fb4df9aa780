//! Reset execution: admission, pipeline running and deadline handling

pub mod executor;
pub mod guard;
pub mod service;

pub use executor::PipelineExecutor;
pub use guard::{AdmissionGuard, AdmissionPermit};
pub use service::{ResetError, ResetService};
