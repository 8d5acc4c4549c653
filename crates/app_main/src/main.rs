//! Glimpse - image viewer driven by keybound actions
//!
//! Main entry point. Image paths come from the command line, input
//! lines (keys or `:action`) from stdin.

mod app;
mod modes;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    // Initialize logging and panic hook first
    let guard = app_log::init()?;

    // Clean up old logs (7 days)
    if let Err(e) = app_log::cleanup_old_logs(7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("Glimpse starting...");

    // Load configuration
    let config = app_core::AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        app_core::AppConfig::default()
    });

    let sources: Vec<String> = std::env::args().skip(1).collect();
    let code = app::run(&config, sources)?;

    tracing::info!("Glimpse exiting with code {}", code);
    // Flush the log writer before exit skips destructors
    drop(guard);
    std::process::exit(code)
}
