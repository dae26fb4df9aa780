//! Reset service configuration from YAML

use crate::command::{CommandRunner, CommandSpec};
use crate::core::{
    pipeline::Pipeline,
    step::{CommandStep, DelayStep, Step},
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Directory holding the demo's control scripts
const SCRIPTS_DIR: &str = "/home/dedis/bin";

/// Longest accepted reset deadline (one day)
pub const MAX_DEADLINE_SECS: u64 = 24 * 60 * 60;

/// Top-level service configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetConfig {
    /// Time allowed for one whole reset (in seconds)
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,

    /// Time allowed for in-flight requests to finish on shutdown (in seconds)
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,

    /// Reset steps, in execution order
    pub steps: Vec<StepConfig>,
}

/// Step configuration as defined in YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Step name, reported when the step fails
    pub name: String,

    /// Program to run
    #[serde(default)]
    pub command: Option<String>,

    /// Program arguments
    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory for the program
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Pause instead of running a program (in seconds)
    #[serde(default)]
    pub delay_secs: Option<u64>,
}

impl StepConfig {
    /// A step running `sh <script>` from the scripts directory
    fn script(name: &str, script: &str) -> Self {
        Self {
            name: name.to_string(),
            command: Some("sh".to_string()),
            args: vec![script.to_string()],
            dir: Some(PathBuf::from(SCRIPTS_DIR)),
            delay_secs: None,
        }
    }

    fn delay(name: &str, secs: u64) -> Self {
        Self {
            name: name.to_string(),
            command: None,
            args: Vec::new(),
            dir: None,
            delay_secs: Some(secs),
        }
    }

    fn to_step(&self, runner: &Arc<dyn CommandRunner>) -> Arc<dyn Step> {
        match (&self.command, self.delay_secs) {
            (Some(program), _) => {
                let spec = CommandSpec {
                    program: program.clone(),
                    args: self.args.clone(),
                    dir: self.dir.clone(),
                };
                Arc::new(CommandStep::new(&self.name, spec, runner.clone()))
            }
            (None, secs) => Arc::new(DelayStep::new(
                &self.name,
                Duration::from_secs(secs.unwrap_or_default()),
            )),
        }
    }
}

fn default_deadline_secs() -> u64 {
    30
}

fn default_shutdown_timeout_secs() -> u64 {
    60
}

impl Default for ResetConfig {
    /// The standard demo reset: stop the agents, restore the database
    /// snapshot, start the agents, let them come up, then reset the access
    /// rules.
    fn default() -> Self {
        Self {
            deadline_secs: default_deadline_secs(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
            steps: vec![
                StepConfig::script("stop-agents", "./stop"),
                StepConfig::script("replace-db", "./replaceDB"),
                StepConfig::script("start-agents", "./start"),
                StepConfig::delay("settle", 25),
                StepConfig::script("reset-access-rules", "./resetDarc"),
            ],
        }
    }
}

impl ResetConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ResetConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.deadline_secs == 0 {
            anyhow::bail!("deadline_secs must be greater than zero");
        }

        if self.deadline_secs > MAX_DEADLINE_SECS {
            anyhow::bail!(
                "deadline_secs must be at most {} (got {})",
                MAX_DEADLINE_SECS,
                self.deadline_secs
            );
        }

        if self.steps.is_empty() {
            anyhow::bail!("At least one step is required");
        }

        let mut seen = std::collections::HashSet::new();
        for step in &self.steps {
            if step.name.trim().is_empty() {
                anyhow::bail!("Step names must not be empty");
            }
            if !seen.insert(&step.name) {
                anyhow::bail!("Duplicate step name: {}", step.name);
            }

            match (&step.command, step.delay_secs) {
                (Some(_), Some(_)) => anyhow::bail!(
                    "Step '{}' sets both command and delay_secs",
                    step.name
                ),
                (None, None) => anyhow::bail!(
                    "Step '{}' needs either command or delay_secs",
                    step.name
                ),
                (Some(program), None) if program.trim().is_empty() => {
                    anyhow::bail!("Step '{}' has an empty command", step.name)
                }
                (None, Some(_)) if !step.args.is_empty() || step.dir.is_some() => {
                    anyhow::bail!(
                        "Step '{}' is a delay and cannot take args or dir",
                        step.name
                    )
                }
                _ => {}
            }
        }

        Ok(())
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Build the reset pipeline, running commands through `runner`
    pub fn to_pipeline(&self, runner: Arc<dyn CommandRunner>) -> Pipeline {
        self.steps.iter().map(|step| step.to_step(&runner)).collect()
    }
}
