use log::{debug, warn};

use crate::config::TerminalConfig;
use crate::context::PathState;
use crate::error::{Result, ShellError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

/// One entry of the virtual tree. Children keep the order they were added in,
/// which is the order `ls` shows them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VfsNode {
    File {
        name: String,
        content: String,
    },
    Directory {
        name: String,
        children: Vec<VfsNode>,
    },
}

impl VfsNode {
    pub fn file(name: &str, content: impl Into<String>) -> Self {
        VfsNode::File { name: name.to_string(), content: content.into() }
    }

    pub fn dir(name: &str) -> Self {
        VfsNode::Directory { name: name.to_string(), children: Vec::new() }
    }

    pub fn new(name: &str, kind: NodeKind) -> Self {
        match kind {
            NodeKind::File => Self::file(name, String::new()),
            NodeKind::Directory => Self::dir(name),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            VfsNode::File { name, .. } | VfsNode::Directory { name, .. } => name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            VfsNode::File { .. } => NodeKind::File,
            VfsNode::Directory { .. } => NodeKind::Directory,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind() == NodeKind::Directory
    }

    /// `None` for files.
    pub fn children(&self) -> Option<&[VfsNode]> {
        match self {
            VfsNode::Directory { children, .. } => Some(children),
            VfsNode::File { .. } => None,
        }
    }

    /// `None` for directories.
    pub fn content(&self) -> Option<&str> {
        match self {
            VfsNode::File { content, .. } => Some(content),
            VfsNode::Directory { .. } => None,
        }
    }

    pub fn child(&self, name: &str) -> Option<&VfsNode> {
        self.children()?.iter().find(|c| c.name() == name)
    }

    pub fn find_dir(&self, name: &str) -> Option<&VfsNode> {
        self.child(name).filter(|c| c.is_dir())
    }

    pub fn find_file(&self, name: &str) -> Option<&VfsNode> {
        self.child(name).filter(|c| !c.is_dir())
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut VfsNode> {
        match self {
            VfsNode::Directory { children, .. } => children.iter_mut().find(|c| c.name() == name),
            VfsNode::File { .. } => None,
        }
    }

    fn find_dir_mut(&mut self, name: &str) -> Option<&mut VfsNode> {
        self.child_mut(name).filter(|c| c.is_dir())
    }

    // caller checks for name clashes first
    fn push_child(&mut self, node: VfsNode) -> bool {
        match self {
            VfsNode::Directory { children, .. } => {
                children.push(node);
                true
            }
            VfsNode::File { .. } => false,
        }
    }
}

/// Why a path walk stopped. The segment is the one that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkError {
    Missing(String),
    NotADirectory(String),
}

/// How a bundled snapshot is mapped onto the tree.
#[derive(Debug, Clone, Default)]
pub struct SnapshotOptions {
    pub mount_prefix: Option<String>,
    pub skeleton_dirs: Vec<String>,
    pub home: Vec<String>,
}

impl From<&TerminalConfig> for SnapshotOptions {
    fn from(config: &TerminalConfig) -> Self {
        Self {
            mount_prefix: config.mount_prefix.clone(),
            skeleton_dirs: config.skeleton_dirs.clone(),
            home: config.home_segments(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VirtualFileSystem {
    pub root: VfsNode,
    home: Vec<String>,
}

impl Default for VirtualFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualFileSystem {
    pub fn new() -> Self {
        Self {
            root: VfsNode::dir("/"),
            home: vec!["home".to_string(), "user".to_string()],
        }
    }

    /// Build the tree from `(path, content)` pairs, in order.
    pub fn from_snapshot<I, P, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: Into<String>,
    {
        Self::from_snapshot_with(entries, &SnapshotOptions::default())
    }

    pub fn from_snapshot_with<I, P, C>(entries: I, options: &SnapshotOptions) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: Into<String>,
    {
        let mut vfs = Self::new();
        if !options.home.is_empty() {
            vfs.home = options.home.clone();
        }
        for dir in &options.skeleton_dirs {
            vfs.ensure_dirs(&split_segments(dir));
        }

        let prefix = options.mount_prefix.as_deref().map(split_segments).unwrap_or_default();
        let mut loaded = 0usize;
        for (path, content) in entries {
            let segments = split_segments(path.as_ref());
            if !segments.starts_with(&prefix) {
                debug!("snapshot entry outside mount prefix, skipped: {}", path.as_ref());
                continue;
            }
            if vfs.insert_file(&segments[prefix.len()..], content.into()) {
                loaded += 1;
            }
        }
        debug!("virtual file system built with {} files", loaded);
        vfs
    }

    pub fn home(&self) -> &[String] {
        &self.home
    }

    // create every directory along `segments`, returns false on a file in the way
    fn ensure_dirs(&mut self, segments: &[&str]) -> bool {
        let mut node = &mut self.root;
        for seg in segments {
            if node.child(seg).is_none() {
                node.push_child(VfsNode::dir(seg));
            }
            node = match node.find_dir_mut(seg) {
                Some(next) => next,
                None => return false,
            };
        }
        true
    }

    fn insert_file(&mut self, segments: &[&str], content: String) -> bool {
        let Some((name, dirs)) = segments.split_last() else {
            warn!("snapshot entry without a file name skipped");
            return false;
        };
        if !self.ensure_dirs(dirs) {
            warn!("snapshot entry {} crosses a file, skipped", segments.join("/"));
            return false;
        }
        let mut parent = &mut self.root;
        for seg in dirs {
            match parent.find_dir_mut(seg) {
                Some(next) => parent = next,
                None => return false,
            }
        }
        match parent.child_mut(name) {
            Some(VfsNode::File { content: existing, .. }) => {
                *existing = content;
                true
            }
            Some(VfsNode::Directory { .. }) => {
                warn!("snapshot file {} clashes with a directory, skipped", segments.join("/"));
                false
            }
            None => parent.push_child(VfsNode::file(name, content)),
        }
    }

    /// Re-derives the working directory from the root by name and kind.
    pub fn resolve_directory(&self, path: &PathState) -> Result<&VfsNode> {
        let mut node = &self.root;
        for seg in path.segments() {
            node = node
                .find_dir(seg)
                .ok_or_else(|| ShellError::InvalidPath(path.to_string()))?;
        }
        Ok(node)
    }

    fn resolve_directory_mut(&mut self, path: &PathState) -> Result<&mut VfsNode> {
        let display = path.to_string();
        let mut node = &mut self.root;
        for seg in path.segments() {
            node = node
                .find_dir_mut(seg)
                .ok_or_else(|| ShellError::InvalidPath(display.clone()))?;
        }
        Ok(node)
    }

    pub fn home_path(&self) -> Result<PathState> {
        let mut node = &self.root;
        for seg in &self.home {
            node = node.find_dir(seg).ok_or(ShellError::HomeNotFound)?;
        }
        Ok(PathState::from_segments(self.home.clone()))
    }

    /// Content of the file at `path`, taken from the root.
    pub fn read_file(&self, path: &str) -> Option<&str> {
        let segments = split_segments(path);
        let (name, dirs) = segments.split_last()?;
        let mut node = &self.root;
        for seg in dirs {
            node = node.find_dir(seg)?;
        }
        node.find_file(name)?.content()
    }

    /// `~` and `~/...` rewritten relative to the root, e.g. `home/user/...`.
    pub fn expand_home(&self, path: &str) -> String {
        let home = self.home.join("/");
        if path == "~" {
            home
        } else if let Some(rest) = path.strip_prefix("~/") {
            format!("{}/{}", home, rest)
        } else {
            path.to_string()
        }
    }

    /// Paths that name the root explicitly: `/...` or `home/user/...`.
    pub fn is_absolute(&self, path: &str) -> bool {
        let home = self.home.join("/");
        path.starts_with('/') || path == home || path.starts_with(&format!("{}/", home))
    }

    /// Walk `segments` from `start`. `..` pops (never above the root), `.` is
    /// skipped, an empty segment jumps to the root and `~` jumps home.
    /// Every named segment must be a directory.
    pub fn walk(&self, start: &PathState, segments: &[&str]) -> std::result::Result<PathState, WalkError> {
        let mut path = start.clone();
        let mut node = self
            .resolve_directory(&path)
            .map_err(|_| WalkError::Missing(path.to_string()))?;
        for seg in segments {
            match *seg {
                "" => {
                    path = PathState::root();
                    node = &self.root;
                }
                "." => {}
                ".." => {
                    path.pop();
                    node = self
                        .resolve_directory(&path)
                        .map_err(|_| WalkError::Missing(seg.to_string()))?;
                }
                "~" => {
                    path = self.home_path().map_err(|_| WalkError::Missing(seg.to_string()))?;
                    node = self
                        .resolve_directory(&path)
                        .map_err(|_| WalkError::Missing(seg.to_string()))?;
                }
                name => match node.child(name) {
                    Some(next) if next.is_dir() => {
                        path.push(name);
                        node = next;
                    }
                    Some(_) => return Err(WalkError::NotADirectory(name.to_string())),
                    None => return Err(WalkError::Missing(name.to_string())),
                },
            }
        }
        Ok(path)
    }

    /// Shared by `mkdir` and `touch`: add an empty node under an existing
    /// parent. Intermediate directories are never created.
    pub fn make(&mut self, cwd: &PathState, path: &str, kind: NodeKind, command: &str) -> Result<()> {
        self.make_all(cwd, &[path], kind, command)
    }

    /// Every path is checked before anything is added, so a failing operand
    /// leaves the tree as it was.
    pub fn make_all<S: AsRef<str>>(&mut self, cwd: &PathState, paths: &[S], kind: NodeKind, command: &str) -> Result<()> {
        let mut planned: Vec<(PathState, String)> = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let (parent, name) = self.plan_make(cwd, path, kind, command)?;
            if planned.iter().any(|(p, n)| *p == parent && *n == name) {
                return Err(ShellError::FileExists { command: command.to_string(), path: path.to_string() });
            }
            planned.push((parent, name));
        }

        for (parent_path, name) in planned {
            let parent = self.resolve_directory_mut(&parent_path)?;
            parent.push_child(VfsNode::new(&name, kind));
            debug!("{} created {:?} {}/{}", command, kind, parent_path, name);
        }
        Ok(())
    }

    // parent directory and new name for one operand, without touching the tree
    fn plan_make(&self, cwd: &PathState, path: &str, kind: NodeKind, command: &str) -> Result<(PathState, String)> {
        let expanded = self.expand_home(path);
        let mut parts = split_segments(&expanded);
        let name = match parts.pop() {
            Some(name) if name != "." && name != ".." => name,
            _ => return Err(ShellError::BadArguments(format!("{}: missing operand", command))),
        };

        let bad_path = || ShellError::BadPath { command: command.to_string(), path: path.to_string() };
        // `touch a/` names a directory, not a file
        if kind == NodeKind::File && expanded.ends_with('/') {
            return Err(bad_path());
        }
        if !is_valid_name(name) {
            return Err(ShellError::InvalidName { command: command.to_string(), path: path.to_string() });
        }

        let start = if self.is_absolute(&expanded) { PathState::root() } else { cwd.clone() };
        let parent_path = self.walk(&start, &parts).map_err(|_| bad_path())?;
        let parent = self.resolve_directory(&parent_path).map_err(|_| bad_path())?;
        if parent.child(name).is_some() {
            return Err(ShellError::FileExists { command: command.to_string(), path: path.to_string() });
        }
        Ok((parent_path, name.to_string()))
    }
}

const MAX_NAME_LEN: usize = 255;

/// Names `mkdir`/`touch` accept: no control characters, none of
/// `<>:"/\|?*`, at most 255 characters.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= MAX_NAME_LEN
        && !name.chars().any(|c| c.is_control() || "<>:\"/\\|?*".contains(c))
}

/// Split on `/`, dropping empty parts.
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VirtualFileSystem {
        VirtualFileSystem::from_snapshot(vec![
            ("home/user/about.md", "# About"),
            ("home/user/projects/site.md", "site"),
            ("home/user/projects/game.md", "game"),
            ("etc/motd", "hi"),
        ])
    }

    fn at(segments: &[&str]) -> PathState {
        PathState::from_segments(segments.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_snapshot_builds_tree_in_order() {
        let vfs = sample();
        let names: Vec<&str> = vfs.root.children().unwrap().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["home", "etc"]);

        let user = vfs.resolve_directory(&at(&["home", "user"])).unwrap();
        let names: Vec<&str> = user.children().unwrap().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["about.md", "projects"]);
        assert_eq!(user.find_file("about.md").unwrap().content(), Some("# About"));
    }

    #[test]
    fn test_snapshot_tolerates_odd_slashes() {
        let vfs = VirtualFileSystem::from_snapshot(vec![("//a///b.txt/", "x"), ("/a/c.txt", "y")]);
        let a = vfs.root.find_dir("a").unwrap();
        assert_eq!(a.children().unwrap().len(), 2);
        assert_eq!(a.find_file("b.txt").unwrap().content(), Some("x"));
    }

    #[test]
    fn test_snapshot_keeps_sibling_names_unique() {
        let vfs = VirtualFileSystem::from_snapshot(vec![
            ("docs/readme", "one"),
            ("docs/readme", "two"),
            ("docs", "file over dir"),
            ("docs/readme/inner", "file under file"),
        ]);
        let docs = vfs.root.find_dir("docs").unwrap();
        assert_eq!(docs.children().unwrap().len(), 1);
        assert_eq!(docs.find_file("readme").unwrap().content(), Some("two"));
        assert_eq!(vfs.root.children().unwrap().len(), 1);
    }

    #[test]
    fn test_snapshot_mount_prefix_and_skeleton() {
        let options = SnapshotOptions {
            mount_prefix: Some("/src/file-system".to_string()),
            skeleton_dirs: vec!["bin".to_string(), "dev".to_string()],
            home: Vec::new(),
        };
        let vfs = VirtualFileSystem::from_snapshot_with(
            vec![
                ("/src/file-system/home/user/a.md", "a"),
                ("/src/other/b.md", "b"),
            ],
            &options,
        );
        let names: Vec<&str> = vfs.root.children().unwrap().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["bin", "dev", "home"]);
        assert!(vfs.home_path().is_ok());
    }

    #[test]
    fn test_resolve_directory_rejects_files_and_missing() {
        let vfs = sample();
        assert!(vfs.resolve_directory(&PathState::root()).is_ok());
        assert_eq!(
            vfs.resolve_directory(&at(&["home", "user", "about.md"])),
            Err(ShellError::InvalidPath("/home/user/about.md".to_string()))
        );
        assert!(vfs.resolve_directory(&at(&["nope"])).is_err());
    }

    #[test]
    fn test_home_path() {
        assert_eq!(sample().home_path().unwrap(), at(&["home", "user"]));
        let bare = VirtualFileSystem::from_snapshot(vec![("home/guest/x", "")]);
        assert_eq!(bare.home_path(), Err(ShellError::HomeNotFound));
    }

    #[test]
    fn test_read_file() {
        let vfs = sample();
        assert_eq!(vfs.read_file("/home/user/projects/site.md"), Some("site"));
        assert_eq!(vfs.read_file("etc/motd"), Some("hi"));
        assert_eq!(vfs.read_file("home/user/projects"), None);
        assert_eq!(vfs.read_file("home/nobody/x"), None);
        assert_eq!(vfs.read_file(""), None);
    }

    #[test]
    fn test_expand_home() {
        let vfs = sample();
        assert_eq!(vfs.expand_home("~"), "home/user");
        assert_eq!(vfs.expand_home("~/projects"), "home/user/projects");
        assert_eq!(vfs.expand_home("a/~/b"), "a/~/b");
        assert_eq!(vfs.expand_home("~user"), "~user");
    }

    #[test]
    fn test_walk() {
        let vfs = sample();
        let home = at(&["home", "user"]);
        assert_eq!(vfs.walk(&home, &["projects"]).unwrap(), at(&["home", "user", "projects"]));
        assert_eq!(vfs.walk(&home, &["..", "..", ".."]).unwrap(), PathState::root());
        assert_eq!(vfs.walk(&home, &["", "etc"]).unwrap(), at(&["etc"]));
        assert_eq!(vfs.walk(&PathState::root(), &["~", "."]).unwrap(), home);
        assert_eq!(vfs.walk(&home, &["about.md"]), Err(WalkError::NotADirectory("about.md".to_string())));
        assert_eq!(vfs.walk(&home, &["ghost"]), Err(WalkError::Missing("ghost".to_string())));
    }

    #[test]
    fn test_make_directory_and_file() {
        let mut vfs = sample();
        let home = at(&["home", "user"]);
        vfs.make(&home, "notes", NodeKind::Directory, "mkdir").unwrap();
        vfs.make(&home, "notes/todo.txt", NodeKind::File, "touch").unwrap();
        vfs.make(&PathState::root(), "~/projects/new", NodeKind::Directory, "mkdir").unwrap();
        vfs.make(&at(&["etc"]), "home/user/readme", NodeKind::File, "touch").unwrap();
        assert!(vfs.resolve_directory(&home).unwrap().find_file("readme").is_some());

        let notes = vfs.resolve_directory(&at(&["home", "user", "notes"])).unwrap();
        assert_eq!(notes.find_file("todo.txt").unwrap().content(), Some(""));
        assert!(vfs.resolve_directory(&at(&["home", "user", "projects", "new"])).is_ok());
    }

    #[test]
    fn test_make_errors() {
        let mut vfs = sample();
        let home = at(&["home", "user"]);
        assert!(matches!(vfs.make(&home, "", NodeKind::Directory, "mkdir"), Err(ShellError::BadArguments(_))));
        assert!(matches!(vfs.make(&home, "a/b", NodeKind::Directory, "mkdir"), Err(ShellError::BadPath { .. })));
        assert!(matches!(
            vfs.make(&home, "about.md", NodeKind::Directory, "mkdir"),
            Err(ShellError::FileExists { .. })
        ));
        assert!(matches!(
            vfs.make(&home, "about.md/x", NodeKind::File, "touch"),
            Err(ShellError::BadPath { .. })
        ));
        let user = vfs.resolve_directory(&home).unwrap();
        assert_eq!(user.children().unwrap().len(), 2);
    }

    fn names(node: &VfsNode) -> Vec<&str> {
        node.children().unwrap().iter().map(|c| c.name()).collect()
    }

    #[test]
    fn test_make_ignores_repeated_slashes() {
        let mut vfs = sample();
        let home = at(&["home", "user"]);
        vfs.make(&home, "projects//new", NodeKind::Directory, "mkdir").unwrap();
        vfs.make(&home, "projects/new//", NodeKind::Directory, "mkdir").unwrap_err();
        vfs.make(&home, "~//notes/", NodeKind::Directory, "mkdir").unwrap();

        assert_eq!(names(&vfs.root), vec!["home", "etc"]);
        let projects = vfs.resolve_directory(&at(&["home", "user", "projects"])).unwrap();
        assert!(projects.find_dir("new").is_some());
        assert!(vfs.resolve_directory(&at(&["home", "user", "notes"])).is_ok());
    }

    #[test]
    fn test_make_trailing_slash_on_a_file() {
        let mut vfs = sample();
        let home = at(&["home", "user"]);
        assert!(matches!(vfs.make(&home, "a/", NodeKind::File, "touch"), Err(ShellError::BadPath { .. })));
        assert!(vfs.resolve_directory(&home).unwrap().child("a").is_none());
    }

    #[test]
    fn test_make_all_checks_every_operand_first() {
        let mut vfs = sample();
        let home = at(&["home", "user"]);
        let before = vfs.root.clone();

        let result = vfs.make_all(&home, &["a", "missing/b"], NodeKind::Directory, "mkdir");
        assert!(matches!(result, Err(ShellError::BadPath { .. })));
        assert_eq!(vfs.root, before);

        let result = vfs.make_all(&home, &["x", "x"], NodeKind::File, "touch");
        assert!(matches!(result, Err(ShellError::FileExists { .. })));
        assert_eq!(vfs.root, before);

        vfs.make_all(&home, &["a", "b"], NodeKind::Directory, "mkdir").unwrap();
        let user = vfs.resolve_directory(&home).unwrap();
        assert!(user.find_dir("a").is_some() && user.find_dir("b").is_some());
    }

    #[test]
    fn test_make_rejects_bad_names() {
        let mut vfs = sample();
        let home = at(&["home", "user"]);
        for bad in ["what?", "a*b", "x:y", "tab\there", "pipe|"] {
            assert!(
                matches!(vfs.make(&home, bad, NodeKind::File, "touch"), Err(ShellError::InvalidName { .. })),
                "{} accepted",
                bad
            );
        }
        let long = "n".repeat(256);
        assert!(matches!(vfs.make(&home, &long, NodeKind::File, "touch"), Err(ShellError::InvalidName { .. })));
        vfs.make(&home, &"n".repeat(255), NodeKind::File, "touch").unwrap();
        assert!(is_valid_name("résumé.md"));
        assert!(!is_valid_name("bell\u{7}"));
    }
}
