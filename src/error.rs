use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShellError>;

/// Everything that can go wrong inside a terminal session.
///
/// None of these escape `CommandProcessor::process_command`; they are turned
/// into a printed message there.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("{0}: No such directory")]
    NoSuchDirectory(String),
    #[error("{command}: {path}: No such file or directory")]
    NoSuchFileOrDirectory { command: String, path: String },
    #[error("{command}: {path}: Not a directory")]
    NotADirectory { command: String, path: String },
    #[error("{0}")]
    BadArguments(String),
    #[error("{command}: cannot create '{path}': No such file or directory")]
    BadPath { command: String, path: String },
    #[error("{command}: cannot create '{path}': File exists")]
    FileExists { command: String, path: String },
    #[error("{command}: cannot create '{path}': Invalid file name")]
    InvalidName { command: String, path: String },
    #[error("Home directory not found")]
    HomeNotFound,
    #[error("{0}: command not found")]
    UnknownCommand(String),
    #[error("{0}")]
    Handler(String),
    #[error("unexpected add and del operation at offset {0}")]
    EditConflict(usize),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ShellError {
    /// Internal failures are reported as `Error executing <cmd>: ...` instead
    /// of being printed as a plain usage message.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ShellError::InvalidPath(_) | ShellError::HomeNotFound | ShellError::Handler(_) | ShellError::Config(_)
        )
    }
}
