//! External command invocation for pipeline steps

pub mod response;
pub mod subprocess;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use response::{CommandError, CommandOutput};
pub use subprocess::SubprocessRunner;

/// An external command: program, arguments and optional working directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Program to execute (looked up on PATH when not absolute)
    pub program: String,

    /// Arguments passed to the program
    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory, inherited from the service when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Render as a shell-like line for logs and error messages
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Trait for command execution - allows swapping the real subprocess runner out in tests
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion and capture its output.
    ///
    /// Dropping the returned future must stop the command and any process it
    /// started that is still running.
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_builder() {
        let spec = CommandSpec::new("sh")
            .arg("./stop")
            .current_dir("/home/dedis/bin");

        assert_eq!(spec.program, "sh");
        assert_eq!(spec.args, vec!["./stop".to_string()]);
        assert_eq!(spec.dir, Some(PathBuf::from("/home/dedis/bin")));
        assert_eq!(spec.display(), "sh ./stop");
    }

    #[test]
    fn test_display_without_args() {
        assert_eq!(CommandSpec::new("true").display(), "true");
    }
}
