//! Terminal front end: status line, help layer and window state

use app_core::{Application, HelpOverlay, Image, InfoBar, Keybind, Ui};

/// Fields shown next to the status text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoScheme {
    /// Name, position and mark
    Viewer,
    /// Name only
    Gallery,
    /// Status text only
    Off,
}

impl InfoScheme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "viewer" => Some(InfoScheme::Viewer),
            "gallery" => Some(InfoScheme::Gallery),
            "off" => Some(InfoScheme::Off),
            _ => None,
        }
    }
}

/// Status line (info bar)
#[derive(Debug, Clone)]
pub struct StatusLine {
    scheme: InfoScheme,
    status: String,
    marked: bool,
}

impl StatusLine {
    pub fn new(scheme: &str) -> Self {
        Self {
            scheme: InfoScheme::from_name(scheme).unwrap_or(InfoScheme::Viewer),
            status: String::new(),
            marked: false,
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Render one line: `[mode] name (n/total) [*] | status`
    pub fn render(&self, mode: &str, image: Option<(&Image, usize, usize)>, fullscreen: bool) -> String {
        let mut line = format!("[{}]", mode);
        if fullscreen {
            line.push_str("[fullscreen]");
        }

        if let Some((image, index, total)) = image {
            match self.scheme {
                InfoScheme::Viewer => {
                    line.push_str(&format!(" {} ({}/{})", image.name(), index + 1, total));
                    if self.marked {
                        line.push_str(" [*]");
                    }
                }
                InfoScheme::Gallery => line.push_str(&format!(" {}", image.name())),
                InfoScheme::Off => {}
            }
        }

        // Command output may span several lines
        let status = self.status().trim_end().replace('\n', " ");
        if !status.is_empty() {
            line.push_str(" | ");
            line.push_str(&status);
        }
        line
    }
}

impl InfoBar for StatusLine {
    fn update_status(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn update_mark(&mut self, marked: bool) {
        self.marked = marked;
    }

    fn switch_scheme(&mut self, name: &str) {
        match InfoScheme::from_name(name) {
            Some(scheme) => self.scheme = scheme,
            None => {
                tracing::warn!("Unknown info scheme: {}", name);
                self.status = format!("Unknown info scheme: {}", name);
            }
        }
    }
}

/// Help layer listing the keybindings of the active mode
#[derive(Debug, Clone, Default)]
pub struct HelpLayer {
    lines: Option<Vec<String>>,
}

impl HelpLayer {
    pub fn lines(&self) -> &[String] {
        self.lines.as_deref().unwrap_or_default()
    }
}

impl HelpOverlay for HelpLayer {
    fn is_visible(&self) -> bool {
        self.lines.is_some()
    }

    fn show(&mut self, keybinds: &[Keybind]) {
        let width = keybinds.iter().map(|kb| kb.key.len()).max().unwrap_or(0);
        self.lines = Some(
            keybinds
                .iter()
                .map(|kb| format!("{:<width$}  {}", kb.key, kb.describe(), width = width))
                .collect(),
        );
    }

    fn hide(&mut self) {
        self.lines = None;
    }
}

/// Window state
#[derive(Debug, Clone, Default)]
pub struct TermUi {
    fullscreen: bool,
    dirty: bool,
}

impl TermUi {
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Whether the window changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Ui for TermUi {
    fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        // The window repaints itself on resize
        self.dirty = true;
        tracing::debug!("Fullscreen: {}", self.fullscreen);
    }
}

/// Application-wide requests collected during a dispatch
#[derive(Debug, Clone, Default)]
pub struct AppState {
    redraw: bool,
    pending_mode: Option<String>,
    exit_code: Option<i32>,
}

impl AppState {
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    pub fn take_pending_mode(&mut self) -> Option<String> {
        self.pending_mode.take()
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }
}

impl Application for AppState {
    fn redraw(&mut self) {
        self.redraw = true;
    }

    fn switch_mode(&mut self, name: &str) {
        self.pending_mode = Some(name.to_string());
    }

    fn exit(&mut self, code: i32) {
        tracing::info!("Exit requested with code {}", code);
        self.exit_code = Some(code);
    }
}
