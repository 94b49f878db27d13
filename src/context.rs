use std::fmt;

use serde::Serialize;

use crate::config::TerminalConfig;
use crate::vfs::VirtualFileSystem;

/// Current working directory as directory names below the root.
/// Empty means the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathState {
    segments: Vec<String>,
}

impl PathState {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push(&mut self, name: &str) {
        self.segments.push(name.to_string());
    }

    /// No-op at the root.
    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    pub fn starts_with(&self, prefix: &[String]) -> bool {
        self.segments.starts_with(prefix)
    }
}

impl fmt::Display for PathState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

/// One block of output for the display surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Printed {
    pub text: String,
    pub markdown: bool,
}

/// The display surface as the core sees it.
pub trait Display {
    fn print(&mut self, text: &str, markdown: bool);
}

// transcript, used by the REPL and tests
impl Display for Vec<Printed> {
    fn print(&mut self, text: &str, markdown: bool) {
        self.push(Printed { text: text.to_string(), markdown });
    }
}

/// Requests a command makes of the page hosting the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Navigate(String),
}

/// Everything one terminal session owns: its tree, its cursor and the output
/// produced by the command that is currently running.
pub struct TerminalContext {
    pub vfs: VirtualFileSystem,
    pub cwd: PathState,
    pub config: TerminalConfig,
    output: Vec<Printed>,
    actions: Vec<SessionAction>,
}

impl TerminalContext {
    /// Starts in the home directory when the tree has one, otherwise at the root.
    pub fn new(vfs: VirtualFileSystem, config: TerminalConfig) -> Self {
        let cwd = vfs.home_path().unwrap_or_else(|_| {
            log::warn!("no home directory in snapshot, starting at /");
            PathState::root()
        });
        Self {
            vfs,
            cwd,
            config,
            output: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn print(&mut self, text: impl Into<String>) {
        self.output.push(Printed { text: text.into(), markdown: false });
    }

    pub fn print_markdown(&mut self, text: impl Into<String>) {
        self.output.push(Printed { text: text.into(), markdown: true });
    }

    pub fn take_output(&mut self) -> Vec<Printed> {
        std::mem::take(&mut self.output)
    }

    pub fn request(&mut self, action: SessionAction) {
        self.actions.push(action);
    }

    pub fn take_actions(&mut self) -> Vec<SessionAction> {
        std::mem::take(&mut self.actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_state_display() {
        assert_eq!(PathState::root().to_string(), "/");
        let mut path = PathState::root();
        path.push("home");
        path.push("user");
        assert_eq!(path.to_string(), "/home/user");
        assert_eq!(path.pop().as_deref(), Some("user"));
        path.pop();
        assert_eq!(path.pop(), None);
        assert!(path.is_root());
    }

    #[test]
    fn test_context_starts_at_home() {
        let vfs = VirtualFileSystem::from_snapshot(vec![("home/user/a", "")]);
        let ctx = TerminalContext::new(vfs, TerminalConfig::default());
        assert_eq!(ctx.cwd.to_string(), "/home/user");

        let ctx = TerminalContext::new(VirtualFileSystem::new(), TerminalConfig::default());
        assert!(ctx.cwd.is_root());
    }

    #[test]
    fn test_output_is_drained() {
        let mut ctx = TerminalContext::new(VirtualFileSystem::new(), TerminalConfig::default());
        ctx.print("a");
        ctx.print_markdown("# b");
        ctx.request(SessionAction::Navigate("/x".to_string()));
        let out = ctx.take_output();
        assert_eq!(out.len(), 2);
        assert!(out[1].markdown);
        assert!(ctx.take_output().is_empty());
        assert_eq!(ctx.take_actions(), vec![SessionAction::Navigate("/x".to_string())]);
    }
}
