//! Subprocess command runner

use crate::command::{CommandError, CommandOutput, CommandRunner, CommandSpec};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Kills a child's whole process group when dropped, unless disarmed first.
///
/// Covers processes the command started itself, which `kill_on_drop` alone
/// leaves running.
struct ProcessGroupKill {
    pgid: Option<i32>,
}

impl ProcessGroupKill {
    fn new(pid: Option<u32>) -> Self {
        Self {
            pgid: pid.and_then(|pid| i32::try_from(pid).ok()),
        }
    }

    /// The command exited on its own; leave anything it started alone
    fn disarm(&mut self) {
        self.pgid = None;
    }
}

impl Drop for ProcessGroupKill {
    fn drop(&mut self) {
        let Some(pgid) = self.pgid.take() else {
            return;
        };
        debug!("Killing process group {}", pgid);
        #[cfg(unix)]
        {
            // SAFETY: killpg only sends a signal. The group was created for this
            // command by `process_group(0)`, and a group id is not reused while
            // any member is alive.
            #[allow(unsafe_code)]
            let result = unsafe { libc::killpg(pgid, libc::SIGKILL) };
            if result != 0 {
                debug!(
                    "killpg({}) failed: {}",
                    pgid,
                    std::io::Error::last_os_error()
                );
            }
        }
    }
}

/// Runs commands as child processes of the service
#[derive(Debug, Clone, Default)]
pub struct SubprocessRunner;

impl SubprocessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SubprocessRunner {
    /// Spawn the command and wait for it, capturing stdout and stderr.
    ///
    /// The command runs in its own process group. If this future is dropped
    /// before the command exits, the whole group is killed: the command and
    /// every process it started. This is how a reset deadline reaches a
    /// still-running script. Processes left behind by a command that exited on
    /// its own (agents started by a start script) are not touched.
    ///
    /// # Errors
    /// Returns `CommandError` if:
    /// - The program cannot be spawned
    /// - The program exits with a non-zero status
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        debug!("Spawning command: {}", spec.display());

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);
        if let Some(dir) = &spec.dir {
            command.current_dir(dir);
        }

        let spawn_error = |source| CommandError::Spawn {
            program: spec.program.clone(),
            source,
        };
        let child = command.spawn().map_err(spawn_error)?;
        let mut group = ProcessGroupKill::new(child.id());
        let output = child.wait_with_output().await.map_err(spawn_error)?;
        group.disarm();

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            // Killed by a signal has no code
            let code = output.status.code().unwrap_or(-1);
            warn!("{} exited with code {}: {}", spec.display(), code, stderr.trim());
            return Err(CommandError::Exit {
                program: spec.program.clone(),
                code,
                stderr: stderr.trim().to_string(),
            });
        }

        debug!(
            "{} returned {} bytes of output: {}",
            spec.display(),
            stdout.len(),
            stdout.trim()
        );

        Ok(CommandOutput { stdout, stderr })
    }
}
