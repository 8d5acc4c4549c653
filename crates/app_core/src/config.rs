//! Application configuration

use crate::{Action, AppError, Keybind};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub exec: ExecConfig,
    pub info: InfoConfig,
    pub keybindings: KeybindingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Mode to start in
    pub mode: String,
    /// Initial info scheme
    pub info_scheme: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            mode: "viewer".to_string(),
            info_scheme: "viewer".to_string(),
        }
    }
}

/// External command execution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Shell used to run commands (`<shell> -c <command>`)
    pub shell: String,
    /// Child process timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            shell: app_shell::DEFAULT_SHELL.to_string(),
            timeout_ms: app_shell::DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

impl ExecConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn shell(&self) -> app_shell::Shell {
        app_shell::Shell::new(&self.shell, self.timeout())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoConfig {
    /// Maximum status message length, in characters
    pub max_status: usize,
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            max_status: crate::reporter::STATUS_MAX,
        }
    }
}

/// Keybindings per mode: key -> actions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub viewer: HashMap<String, Vec<String>>,
    pub gallery: HashMap<String, Vec<String>>,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            viewer: default_viewer_keybindings(),
            gallery: default_gallery_keybindings(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self, AppError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", config_path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), AppError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        tracing::info!("Configuration saved to {:?}", config_path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "Glimpse", "Glimpse")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }

    /// Parsed keybinding table of a mode, sorted by key.
    ///
    /// Invalid actions are skipped with a warning.
    pub fn keybinds(&self, mode: &str) -> Result<Vec<Keybind>, AppError> {
        let table = match mode {
            "viewer" => &self.keybindings.viewer,
            "gallery" => &self.keybindings.gallery,
            _ => return Err(AppError::UnknownMode(mode.to_string())),
        };

        let mut keybinds: Vec<Keybind> = table
            .iter()
            .filter_map(|(key, texts)| {
                let actions: Vec<Action> = texts
                    .iter()
                    .filter_map(|text| match Action::parse(text) {
                        Ok(action) => Some(action),
                        Err(e) => {
                            tracing::warn!("Keybinding {} in {} mode: {}", key, mode, e);
                            None
                        }
                    })
                    .collect();
                (!actions.is_empty()).then(|| Keybind::new(key, actions))
            })
            .collect();

        keybinds.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(keybinds)
    }
}

fn bind(kb: &mut HashMap<String, Vec<String>>, key: &str, actions: &[&str]) {
    kb.insert(key.into(), actions.iter().map(|a| a.to_string()).collect());
}

/// Bindings shared by every mode
fn common_keybindings() -> HashMap<String, Vec<String>> {
    let mut kb = HashMap::new();

    bind(&mut kb, "F1", &["help"]);
    bind(&mut kb, "Escape", &["exit"]);
    bind(&mut kb, "q", &["exit"]);
    bind(&mut kb, "f", &["fullscreen"]);
    bind(&mut kb, "i", &["info viewer"]);
    bind(&mut kb, "m", &["mark"]);
    bind(&mut kb, "e", &["exec echo %"]);
    bind(&mut kb, "Shift+e", &["exec_marked echo %"]);
    bind(&mut kb, "Shift+Delete", &["exec_marked rm -f %", "status Marked files removed"]);
    bind(&mut kb, "Home", &["first_file"]);
    bind(&mut kb, "End", &["last_file"]);

    kb
}

fn default_viewer_keybindings() -> HashMap<String, Vec<String>> {
    let mut kb = common_keybindings();

    bind(&mut kb, "Left", &["prev_file"]);
    bind(&mut kb, "Right", &["next_file"]);
    bind(&mut kb, "Space", &["next_file"]);
    bind(&mut kb, "Ctrl+r", &["reload"]);
    bind(&mut kb, "Plus", &["zoom +10"]);
    bind(&mut kb, "Minus", &["zoom -10"]);
    bind(&mut kb, "r", &["rotate 90"]);
    bind(&mut kb, "Return", &["mode gallery"]);

    kb
}

fn default_gallery_keybindings() -> HashMap<String, Vec<String>> {
    let mut kb = common_keybindings();

    bind(&mut kb, "Left", &["prev_file"]);
    bind(&mut kb, "Right", &["next_file"]);
    bind(&mut kb, "Return", &["mode viewer"]);

    kb
}
