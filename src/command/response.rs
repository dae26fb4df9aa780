//! Command output and error types

use thiserror::Error;

/// Error types for command execution
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with code {code}: {stderr}")]
    Exit {
        program: String,
        code: i32,
        stderr: String,
    },
}

/// Captured output of a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_error_message() {
        let err = CommandError::Exit {
            program: "sh".to_string(),
            code: 2,
            stderr: "replaceDB: no such file".to_string(),
        };
        assert_eq!(err.to_string(), "sh exited with code 2: replaceDB: no such file");
    }
}
