//! External command execution and status reporting

use crate::context::Services;
use app_shell::{CommandOutcome, RunStatus};
use std::io::{self, Write};

/// Default maximum length of the status message, in characters
pub const STATUS_MAX: usize = 60;

/// Status shown when the expression produced no command
pub const NO_COMMAND: &str = "Error: no command to execute";

const ELLIPSIS: &str = "...";

/// Runs commands through the engine and summarizes them in the status bar
#[derive(Debug, Clone, Copy)]
pub struct CommandReporter {
    max_status: usize,
}

impl CommandReporter {
    pub fn new(max_status: usize) -> Self {
        Self { max_status }
    }

    pub fn max_status(&self) -> usize {
        self.max_status
    }

    /// Execute `expr` for `paths` and report the result.
    ///
    /// Raw output is mirrored to the stdout/stderr sinks before the status is
    /// published. A redraw is requested on every path, last.
    pub fn execute(&self, services: &mut Services<'_>, expr: &str, paths: &[&str]) {
        self.run_and_report(services, expr, paths);
        services.redraw();
    }

    fn run_and_report(&self, services: &mut Services<'_>, expr: &str, paths: &[&str]) {
        let Some(cmd) = services.engine.build(expr, paths) else {
            tracing::warn!("No command composed from {:?}", expr);
            services.set_status(NO_COMMAND);
            return;
        };

        let outcome = services.engine.run(&cmd);
        tracing::info!(command = %cmd, code = outcome.status.code(), "Command finished");

        if let Some(out) = &outcome.stdout {
            mirror(&mut *services.stdout, out);
        }
        if let Some(err) = &outcome.stderr {
            mirror(&mut *services.stderr, err);
        }

        let msg = truncate_status(status_message(&cmd, &outcome), self.max_status);
        services.set_status(&msg);
    }
}

impl Default for CommandReporter {
    fn default() -> Self {
        Self::new(STATUS_MAX)
    }
}

fn mirror(sink: &mut dyn Write, data: &[u8]) {
    if let Err(e) = sink.write_all(data).and_then(|_| sink.flush()) {
        tracing::warn!("Failed to mirror command output: {}", e);
    }
}

/// Human readable summary of a command outcome
pub fn status_message(cmd: &str, outcome: &CommandOutcome) -> String {
    match outcome.status {
        RunStatus::Success => match &outcome.stdout {
            Some(out) => String::from_utf8_lossy(out).into_owned(),
            None => format!("Success: {}", cmd),
        },
        RunStatus::TimedOut => format!("Child process timed out: {}", cmd),
        RunStatus::Failed(code) => {
            let mut msg = format!("Error {}: ", code);
            match (&outcome.stderr, &outcome.stdout) {
                (Some(text), _) | (None, Some(text)) => {
                    msg.push_str(&String::from_utf8_lossy(text));
                }
                (None, None) => msg.push_str(&os_error_description(code)),
            }
            msg
        }
    }
}

/// OS description of an error code, without the `(os error N)` suffix
fn os_error_description(code: i32) -> String {
    let mut desc = io::Error::from_raw_os_error(code).to_string();
    let suffix = format!(" (os error {})", code);
    if desc.ends_with(&suffix) {
        desc.truncate(desc.len() - suffix.len());
    }
    desc
}

/// Cap a message to `max` characters.
///
/// Longer messages keep their head and end with `...`, the result is exactly
/// `max` characters long: the ellipsis starts at `max - 3`, there is no
/// terminator slot to reserve.
pub fn truncate_status(mut msg: String, max: usize) -> String {
    if msg.chars().nth(max).is_none() {
        return msg;
    }

    let keep = max.saturating_sub(ELLIPSIS.len());
    if let Some((cut, _)) = msg.char_indices().nth(keep) {
        msg.truncate(cut);
    }
    msg.extend(ELLIPSIS.chars().take(max - keep));
    msg
}
