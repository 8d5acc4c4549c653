//! Shell command execution

use crate::{Result, ShellError};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Shell used when none is configured
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Maximum time a child process is allowed to run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Numeric code reported for a timed out child (outside the exit code range)
pub const SHELL_TIMEOUT_CODE: i32 = 256;

/// How a child process finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Exit code 0
    Success,
    /// Killed after the timeout elapsed
    TimedOut,
    /// Non-zero exit code, or OS error code if the process could not run
    Failed(i32),
}

impl RunStatus {
    /// Numeric form: 0, [`SHELL_TIMEOUT_CODE`] or the failure code
    pub fn code(&self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::TimedOut => SHELL_TIMEOUT_CODE,
            RunStatus::Failed(code) => *code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Success)
    }
}

/// Result of one command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub status: RunStatus,

    /// Captured stdout, `None` if nothing was written
    pub stdout: Option<Vec<u8>>,

    /// Captured stderr, `None` if nothing was written
    pub stderr: Option<Vec<u8>>,
}

impl CommandOutcome {
    /// Outcome without any captured output
    pub fn bare(status: RunStatus) -> Self {
        Self {
            status,
            stdout: None,
            stderr: None,
        }
    }
}

/// Shell executor
#[derive(Debug, Clone)]
pub struct Shell {
    program: PathBuf,
    timeout: Duration,
}

impl Shell {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `cmd` through the shell and wait for it, at most for the timeout.
    ///
    /// Never fails: spawn and wait errors are reported as
    /// [`RunStatus::Failed`] carrying the OS error code.
    pub fn execute(&self, cmd: &str) -> CommandOutcome {
        match self.try_execute(cmd) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Command {:?} failed to run: {}", cmd, e);
                CommandOutcome::bare(RunStatus::Failed(e.os_code()))
            }
        }
    }

    fn try_execute(&self, cmd: &str) -> Result<CommandOutcome> {
        let mut command = Command::new(&self.program);
        command
            .arg("-c")
            .arg(cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Own process group, so a timeout also reaches what the shell started
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command.spawn().map_err(ShellError::Spawn)?;

        tracing::debug!("Spawned child {} for {:?}", child.id(), cmd);

        // Drain both pipes while waiting, a full pipe would block the child
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        match child.wait_timeout(self.timeout) {
            Ok(Some(status)) => Ok(CommandOutcome {
                status: run_status(status),
                stdout: collect(stdout),
                stderr: collect(stderr),
            }),
            Ok(None) => {
                tracing::warn!("Child {} timed out after {:?}", child.id(), self.timeout);
                terminate(&mut child);
                // A process that left the group may still hold the pipes open,
                // so the readers are left detached and their output is discarded.
                Ok(CommandOutcome::bare(RunStatus::TimedOut))
            }
            Err(e) => {
                terminate(&mut child);
                Err(ShellError::Wait(e))
            }
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL, DEFAULT_TIMEOUT)
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            tracing::warn!("Failed to read child output: {}", e);
        }
        buf
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> Option<Vec<u8>> {
    reader
        .and_then(|handle| handle.join().ok())
        .filter(|buf| !buf.is_empty())
}

fn terminate(child: &mut Child) {
    #[cfg(unix)]
    kill_group(child.id());

    if let Err(e) = child.kill() {
        tracing::debug!("Kill of child {} failed: {}", child.id(), e);
    }
    if let Err(e) = child.wait() {
        tracing::debug!("Reaping child {} failed: {}", child.id(), e);
    }
}

#[cfg(unix)]
fn kill_group(leader: u32) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Ok(pid) = i32::try_from(leader) else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        tracing::debug!("Kill of process group {} failed: {}", pid, e);
    }
}

fn run_status(status: ExitStatus) -> RunStatus {
    match status.code() {
        Some(0) => RunStatus::Success,
        Some(code) => RunStatus::Failed(code),
        None => RunStatus::Failed(signal_code(status)),
    }
}

#[cfg(unix)]
fn signal_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(|sig| 128 + sig).unwrap_or(-1)
}

#[cfg(not(unix))]
fn signal_code(_status: ExitStatus) -> i32 {
    -1
}
