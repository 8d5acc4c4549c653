//! Collaborators an action can reach
//!
//! The dispatcher owns none of these, the caller lends them for one dispatch.

use crate::{Action, ImageId, ImageList};
use app_shell::{CommandOutcome, Shell};
use std::io::Write;

/// Info/status bar
pub trait InfoBar {
    /// Set the status text
    fn update_status(&mut self, text: &str);

    /// Show or hide the mark indicator
    fn update_mark(&mut self, marked: bool);

    /// Switch the visible info scheme
    fn switch_scheme(&mut self, name: &str);
}

/// Window
pub trait Ui {
    fn toggle_fullscreen(&mut self);
}

/// Application-wide controls
pub trait Application {
    fn redraw(&mut self);
    fn switch_mode(&mut self, name: &str);
    fn exit(&mut self, code: i32);
}

/// Help layer
pub trait HelpOverlay {
    fn is_visible(&self) -> bool;
    fn show(&mut self, keybinds: &[Keybind]);
    fn hide(&mut self);
}

/// External command engine
pub trait CommandEngine {
    /// Compose a command from an expression, `None` if there is nothing to run
    fn build(&self, expr: &str, paths: &[&str]) -> Option<String>;

    /// Run the command to completion (or timeout)
    fn run(&self, cmd: &str) -> CommandOutcome;
}

impl CommandEngine for Shell {
    fn build(&self, expr: &str, paths: &[&str]) -> Option<String> {
        app_shell::compose(expr, paths)
    }

    fn run(&self, cmd: &str) -> CommandOutcome {
        self.execute(cmd)
    }
}

/// Key bound to a sequence of actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybind {
    pub key: String,
    pub actions: Vec<Action>,
}

impl Keybind {
    pub fn new(key: &str, actions: Vec<Action>) -> Self {
        Self {
            key: key.to_string(),
            actions,
        }
    }

    /// Actions joined for display: `exec echo %; next_file`
    pub fn describe(&self) -> String {
        self.actions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Active interaction mode
pub trait Mode {
    fn name(&self) -> &str;

    /// Currently selected image
    fn current(&self) -> Option<ImageId>;

    /// Keybinding table of this mode
    fn keybinds(&self) -> &[Keybind];

    /// Handle a mode specific action, returns false if it is not supported
    fn handle_action(&mut self, ctx: &mut Context<'_>, action: &Action) -> bool;
}

/// Handles to everything outside the image list
pub struct Services<'a> {
    pub info: &'a mut dyn InfoBar,
    pub ui: &'a mut dyn Ui,
    pub app: &'a mut dyn Application,
    pub help: &'a mut dyn HelpOverlay,
    pub engine: &'a dyn CommandEngine,

    /// Raw command output is mirrored here
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

impl Services<'_> {
    pub fn set_status(&mut self, text: &str) {
        self.info.update_status(text);
    }

    pub fn redraw(&mut self) {
        self.app.redraw();
    }
}

/// Dispatch context
pub struct Context<'a> {
    pub images: &'a mut ImageList,
    pub services: Services<'a>,
}

impl<'a> Context<'a> {
    pub fn new(images: &'a mut ImageList, services: Services<'a>) -> Self {
        Self { images, services }
    }
}
