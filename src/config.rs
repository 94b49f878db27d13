use serde::{Deserialize, Serialize};

use crate::error::{Result, ShellError};

/// Session settings handed over by the host page (or a JSON file for the REPL).
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TerminalConfig {
    /// Name shown in the prompt.
    pub user: String,
    /// Home directory, relative to the root, that `~` stands for.
    pub home: String,
    /// Route the page navigates to on `exit`.
    pub exit_route: String,
    /// Blank lines printed by `clear`.
    pub clear_lines: usize,
    /// Markdown file placed on screen when the terminal starts.
    pub welcome_file: Option<String>,
    /// Prefix stripped from every snapshot path, e.g. `src/file-system`.
    pub mount_prefix: Option<String>,
    /// Empty top-level directories created before the snapshot is loaded.
    pub skeleton_dirs: Vec<String>,
    pub history_size: usize,
    /// Report same-length edits as replacements instead of dropping them.
    pub allow_replacements: bool,
    pub log_level: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            user: "user".to_string(),
            home: "home/user".to_string(),
            exit_route: "/portfolio".to_string(),
            clear_lines: 20,
            welcome_file: Some("home/user/title/title.md".to_string()),
            mount_prefix: None,
            skeleton_dirs: Vec::new(),
            history_size: 100,
            allow_replacements: false,
            log_level: "info".to_string(),
        }
    }
}

impl TerminalConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TerminalConfig =
            serde_json::from_str(json).map_err(|e| ShellError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.user.trim().is_empty() {
            return Err(ShellError::Config("user must not be empty".to_string()));
        }
        if self.clear_lines == 0 {
            return Err(ShellError::Config("clearLines must be at least 1".to_string()));
        }
        if self.home_segments().is_empty() {
            return Err(ShellError::Config("home must name a directory".to_string()));
        }
        Ok(())
    }

    /// `home` split into directory names, empty parts dropped.
    pub fn home_segments(&self) -> Vec<String> {
        self.home
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }

    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
