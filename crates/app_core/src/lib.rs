//! Glimpse Core Domain Logic
//!
//! This crate contains:
//! - Actions and their dispatch
//! - Image list and marked path collection
//! - External command execution and status reporting
//! - Mode and collaborator interfaces
//! - Configuration
//! - Error types

pub mod action;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod image_list;
pub mod paths;
pub mod reporter;

pub use action::{Action, ActionType};
pub use config::{AppConfig, ExecConfig, GeneralConfig, InfoConfig, KeybindingConfig};
pub use context::{
    Application, CommandEngine, Context, HelpOverlay, InfoBar, Keybind, Mode, Services, Ui,
};
pub use dispatch::{Dispatcher, NO_IMAGE};
pub use error::AppError;
pub use image_list::{Image, ImageId, ImageList};
pub use paths::{collect_marked_paths, MarkedPaths};
pub use reporter::{status_message, truncate_status, CommandReporter, NO_COMMAND, STATUS_MAX};

pub use app_shell::{CommandOutcome, RunStatus, Shell};

/// Build a dispatcher from configuration
pub fn dispatcher(config: &AppConfig) -> Dispatcher {
    Dispatcher::new(CommandReporter::new(config.info.max_status))
}
