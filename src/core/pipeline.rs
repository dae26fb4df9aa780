//! Pipeline domain model

use crate::core::step::Step;
use std::sync::Arc;

/// The ordered list of steps run by one reset.
///
/// The order is the execution order. Steps are shared, so cloning a pipeline is
/// cheap and a clone can be moved into the task that executes it.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    steps: Vec<Arc<dyn Step>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to the end of the pipeline
    pub fn push(&mut self, step: impl Step + 'static) {
        self.steps.push(Arc::new(step));
    }

    /// Builder form of `push`
    pub fn with_step(mut self, step: impl Step + 'static) -> Self {
        self.push(step);
        self
    }

    pub fn steps(&self) -> &[Arc<dyn Step>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in execution order
    pub fn step_names(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.name().to_string()).collect()
    }
}

impl FromIterator<Arc<dyn Step>> for Pipeline {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Step>>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}
