//! Panic hook writing crash reports

use backtrace::Backtrace;
use chrono::{DateTime, Local};
use std::fmt;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};

/// Install the crash reporting panic hook
pub fn init_panic_hook() {
    std::panic::set_hook(Box::new(on_panic));
    tracing::debug!("Panic hook initialized");
}

fn on_panic(info: &PanicHookInfo) {
    let report = CrashReport::capture(info);

    // stderr first, the subscriber may already be gone
    eprintln!("{}", report);
    tracing::error!(location = %report.location, "{}", report.message);

    match write_crash_dump(&std::env::temp_dir(), &report) {
        Ok(path) => eprintln!("Crash report written to {}", path.display()),
        Err(e) => eprintln!("Failed to write crash dump: {}", e),
    }
}

/// Everything known about a panic
#[derive(Debug, Clone)]
pub(crate) struct CrashReport {
    time: DateTime<Local>,
    thread: String,
    location: String,
    message: String,
    backtrace: String,
}

impl CrashReport {
    fn capture(info: &PanicHookInfo) -> Self {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "<unknown>".to_string());

        Self {
            time: Local::now(),
            thread: std::thread::current()
                .name()
                .unwrap_or("<unnamed>")
                .to_string(),
            location: info
                .location()
                .map(|loc| loc.to_string())
                .unwrap_or_else(|| "<unknown>".to_string()),
            message,
            backtrace: format!("{:?}", Backtrace::new()),
        }
    }

    fn file_name(&self) -> String {
        format!("glimpse_crash_{}.txt", self.time.format("%Y%m%d_%H%M%S"))
    }
}

impl fmt::Display for CrashReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== CRITICAL PANIC ===")?;
        writeln!(f, "Timestamp: {}", self.time.to_rfc3339())?;
        writeln!(f, "Thread: {}", self.thread)?;
        writeln!(f, "Location: {}", self.location)?;
        writeln!(f, "Payload: {}", self.message)?;
        writeln!(f)?;
        write!(f, "Stack Trace:\n{}", self.backtrace)
    }
}

/// Write `report` into `dir`, returns the file path
pub(crate) fn write_crash_dump(dir: &Path, report: &CrashReport) -> std::io::Result<PathBuf> {
    let path = dir.join(report.file_name());
    std::fs::write(&path, report.to_string())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> CrashReport {
        CrashReport {
            time: Local::now(),
            thread: "main".to_string(),
            location: "src/app.rs:10:5".to_string(),
            message: "index out of bounds".to_string(),
            backtrace: "<frames>".to_string(),
        }
    }

    #[test]
    fn test_report_format() {
        let text = report().to_string();
        assert!(text.starts_with("=== CRITICAL PANIC ===\n"));
        assert!(text.contains("Thread: main\n"));
        assert!(text.contains("Location: src/app.rs:10:5\n"));
        assert!(text.contains("Payload: index out of bounds\n\nStack Trace:\n<frames>"));
    }

    #[test]
    fn test_write_crash_dump() {
        let dir = tempfile::tempdir().unwrap();
        let report = report();

        let path = write_crash_dump(dir.path(), &report).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("glimpse_crash_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), report.to_string());
    }
}
