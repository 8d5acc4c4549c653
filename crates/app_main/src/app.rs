//! Application main loop
//!
//! Input lines are either keys, resolved through the active mode's
//! keybindings, or `:<action>` to run an action directly.

use crate::modes::{GalleryMode, ModeKind, ViewerMode};
use crate::ui::{AppState, HelpLayer, StatusLine, TermUi};
use anyhow::Result;
use app_core::{
    Action, AppConfig, Application, CommandEngine, Context, Dispatcher, HelpOverlay, ImageList,
    InfoBar, Mode, Services,
};
use std::io::{self, BufRead, Write};

/// Main application state for the input loop
pub struct App {
    images: ImageList,
    dispatcher: Dispatcher,
    engine: Box<dyn CommandEngine>,

    // Modes
    active: ModeKind,
    viewer: ViewerMode,
    gallery: GalleryMode,

    // Collaborators
    status: StatusLine,
    ui: TermUi,
    state: AppState,
    help: HelpLayer,

    // Output
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
    screen: Box<dyn Write>,
}

impl App {
    pub fn new(
        config: &AppConfig,
        images: ImageList,
        engine: Box<dyn CommandEngine>,
        stdout: Box<dyn Write>,
        stderr: Box<dyn Write>,
        screen: Box<dyn Write>,
    ) -> Result<Self> {
        let active = config.general.mode.parse().unwrap_or_else(|e| {
            tracing::warn!("{}, starting in viewer mode", e);
            ModeKind::Viewer
        });
        let first = images.first();

        Ok(Self {
            images,
            dispatcher: app_core::dispatcher(config),
            engine,

            active,
            viewer: ViewerMode::new(config.keybinds(ModeKind::Viewer.name())?, first),
            gallery: GalleryMode::new(config.keybinds(ModeKind::Gallery.name())?, first),

            status: StatusLine::new(&config.general.info_scheme),
            ui: TermUi::default(),
            state: AppState::default(),
            help: HelpLayer::default(),

            stdout,
            stderr,
            screen,
        })
    }

    fn mode(&self) -> &dyn Mode {
        match self.active {
            ModeKind::Viewer => &self.viewer,
            ModeKind::Gallery => &self.gallery,
        }
    }

    /// Handle one input line, returns the exit code once exit was requested
    pub fn handle_line(&mut self, line: &str) -> Option<i32> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(text) = line.strip_prefix(':') {
            match Action::parse(text) {
                Ok(action) => self.dispatch(&action),
                Err(e) => {
                    self.status.update_status(&e.user_message());
                    self.state.redraw();
                }
            }
        } else {
            self.handle_key(line);
        }

        self.finish_dispatch();
        self.state.exit_code()
    }

    fn handle_key(&mut self, key: &str) {
        let actions = self
            .mode()
            .keybinds()
            .iter()
            .find(|kb| kb.key == key)
            .map(|kb| kb.actions.clone());

        let Some(actions) = actions else {
            tracing::debug!("Key {} is not bound in {} mode", key, self.active);
            self.status.update_status(&format!("Key {} is not bound", key));
            self.state.redraw();
            return;
        };

        for action in &actions {
            self.dispatch(action);
            if self.state.exit_code().is_some() {
                break;
            }
        }
    }

    fn dispatch(&mut self, action: &Action) {
        let mode: &mut dyn Mode = match self.active {
            ModeKind::Viewer => &mut self.viewer,
            ModeKind::Gallery => &mut self.gallery,
        };

        let mut ctx = Context::new(
            &mut self.images,
            Services {
                info: &mut self.status,
                ui: &mut self.ui,
                app: &mut self.state,
                help: &mut self.help,
                engine: &*self.engine,
                stdout: &mut *self.stdout,
                stderr: &mut *self.stderr,
            },
        );

        self.dispatcher.dispatch(&mut ctx, mode, action);
    }

    /// Apply deferred requests: mode switch, then redraw
    fn finish_dispatch(&mut self) {
        if let Some(name) = self.state.take_pending_mode() {
            self.switch_mode(&name);
        }

        let ui_changed = self.ui.take_dirty();
        if self.state.take_redraw() || ui_changed {
            self.render();
        }
    }

    fn switch_mode(&mut self, name: &str) {
        let next = match name.parse::<ModeKind>() {
            Ok(kind) => kind,
            Err(e) => {
                self.status.update_status(&e.user_message());
                self.state.redraw();
                return;
            }
        };
        if next == self.active {
            return;
        }

        // Selection follows the user across modes
        let current = self.mode().current();
        match next {
            ModeKind::Viewer => self.viewer.set_current(current),
            ModeKind::Gallery => self.gallery.set_current(current),
        }

        tracing::info!("Switching mode {} -> {}", self.active, next);
        self.active = next;
        self.status.switch_scheme(next.name());
        if self.help.is_visible() {
            self.help.hide();
        }
        self.state.redraw();
    }

    /// Print the status line and, if visible, the help layer
    pub fn render(&mut self) {
        let current = self.mode().current();
        let image = current.and_then(|id| self.images.get(id).map(|image| (image, id.0, self.images.len())));
        let line = self.status.render(self.active.name(), image, self.ui.is_fullscreen());

        let mut frame = String::new();
        for help_line in self.help.lines() {
            frame.push_str(help_line);
            frame.push('\n');
        }
        frame.push_str(&line);
        frame.push('\n');

        if let Err(e) = self.screen.write_all(frame.as_bytes()).and_then(|_| self.screen.flush()) {
            tracing::warn!("Failed to render: {}", e);
        }
    }
}

/// Run the application on stdin, returns the exit code
pub fn run(config: &AppConfig, sources: Vec<String>) -> Result<i32> {
    let images = ImageList::from_sources(sources);
    tracing::info!("Loaded {} images", images.len());

    let mut app = App::new(
        config,
        images,
        Box::new(config.exec.shell()),
        Box::new(io::stdout()),
        Box::new(io::stderr()),
        Box::new(io::stderr()),
    )?;
    app.render();

    for line in io::stdin().lock().lines() {
        if let Some(code) = app.handle_line(&line?) {
            return Ok(code);
        }
    }

    tracing::info!("Input closed");
    Ok(0)
}
