//! Actions triggered by keybindings and UI events

use crate::AppError;
use std::fmt;
use std::str::FromStr;

/// Action type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    // Common to every mode
    Info,
    Status,
    Fullscreen,
    Mode,
    Exec,
    Mark,
    ExecMarked,
    Help,
    Exit,

    // Mode specific
    FirstFile,
    LastFile,
    PrevFile,
    NextFile,
    Reload,
    Zoom,
    Rotate,
}

impl ActionType {
    pub const ALL: [ActionType; 16] = [
        ActionType::Info,
        ActionType::Status,
        ActionType::Fullscreen,
        ActionType::Mode,
        ActionType::Exec,
        ActionType::Mark,
        ActionType::ExecMarked,
        ActionType::Help,
        ActionType::Exit,
        ActionType::FirstFile,
        ActionType::LastFile,
        ActionType::PrevFile,
        ActionType::NextFile,
        ActionType::Reload,
        ActionType::Zoom,
        ActionType::Rotate,
    ];

    /// Name used in keybinding configuration and status messages
    pub fn name(&self) -> &'static str {
        match self {
            ActionType::Info => "info",
            ActionType::Status => "status",
            ActionType::Fullscreen => "fullscreen",
            ActionType::Mode => "mode",
            ActionType::Exec => "exec",
            ActionType::Mark => "mark",
            ActionType::ExecMarked => "exec_marked",
            ActionType::Help => "help",
            ActionType::Exit => "exit",
            ActionType::FirstFile => "first_file",
            ActionType::LastFile => "last_file",
            ActionType::PrevFile => "prev_file",
            ActionType::NextFile => "next_file",
            ActionType::Reload => "reload",
            ActionType::Zoom => "zoom",
            ActionType::Rotate => "rotate",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionType::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| AppError::InvalidAction(s.to_string()))
    }
}

/// Action with optional parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionType,
    pub params: Option<String>,
}

impl Action {
    pub fn new(kind: ActionType) -> Self {
        Self { kind, params: None }
    }

    pub fn with_params(mut self, params: &str) -> Self {
        self.params = Some(params.to_string());
        self
    }

    /// Parse an action from its text form: `<type> [params]`
    pub fn parse(text: &str) -> Result<Self, AppError> {
        let text = text.trim();
        let (name, params) = match text.split_once(char::is_whitespace) {
            Some((name, params)) => (name, params.trim()),
            None => (text, ""),
        };

        let kind = name.parse()?;
        let params = (!params.is_empty()).then(|| params.to_string());

        Ok(Self { kind, params })
    }

    /// Parameters, empty string if there are none
    pub fn params(&self) -> &str {
        self.params.as_deref().unwrap_or_default()
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::parse(s)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.params {
            Some(params) => write!(f, "{} {}", self.kind, params),
            None => write!(f, "{}", self.kind),
        }
    }
}
