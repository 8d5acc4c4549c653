//! Glimpse Shell Command Engine
//!
//! Turns a user command expression into a concrete shell command and runs it:
//! - Expression composition with path substitution (`%`)
//! - Execution through a shell with a timeout
//! - Captured stdout/stderr

mod expr;
mod exec;

pub use expr::compose;
pub use exec::{CommandOutcome, RunStatus, Shell, DEFAULT_SHELL, DEFAULT_TIMEOUT, SHELL_TIMEOUT_CODE};

use thiserror::Error;

/// Shell engine errors
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Failed to spawn shell: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Failed to wait for child process: {0}")]
    Wait(#[source] std::io::Error),
}

impl ShellError {
    /// OS error code behind this error, `-1` when there is none
    pub fn os_code(&self) -> i32 {
        match self {
            ShellError::Spawn(e) | ShellError::Wait(e) => e.raw_os_error().unwrap_or(-1),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;
