use crate::context::PathState;

/// Render a path the way the prompt and `pwd` show it: the home directory
/// becomes `~`, anything else is absolute.
pub fn format_path(path: &PathState, home: &[String]) -> String {
    let segments = path.segments();
    if !home.is_empty() && path.starts_with(home) {
        let rest = &segments[home.len()..];
        if rest.is_empty() {
            "~".to_string()
        } else {
            format!("~/{}", rest.join("/"))
        }
    } else {
        path.to_string()
    }
}

/// `\n<user>:<path>$`, with no space before the `$`.
pub fn prompt(user: &str, path: &PathState, home: &[String]) -> String {
    format!("\n{}:{}$", user, format_path(path, home))
}
