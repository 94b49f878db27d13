use crate::command::{Command, CommandDocs, CommandResult, Invocation};
use crate::commands::print_short_doc;
use crate::context::{PathState, TerminalContext};
use crate::error::ShellError;
use crate::vfs::{split_segments, WalkError};

pub struct LsCommand;

impl Command for LsCommand {
    fn docs(&self) -> CommandDocs {
        CommandDocs::new("ls", "List directory contents", Some("Show files and folders in the current directory."))
    }

    fn execute(&self, inv: &Invocation<'_>, ctx: &mut TerminalContext) -> CommandResult {
        if inv.wants_help() {
            print_short_doc(ctx, &self.docs());
            return Ok(());
        }

        let mut path = ctx.cwd.clone();
        if let Some(target) = inv.args.first() {
            let expanded = ctx.vfs.expand_home(target);
            let start = if ctx.vfs.is_absolute(&expanded) { PathState::root() } else { path };
            path = ctx.vfs.walk(&start, &split_segments(&expanded)).map_err(|e| match e {
                WalkError::Missing(_) => ShellError::NoSuchFileOrDirectory {
                    command: "ls".to_string(),
                    path: target.clone(),
                },
                WalkError::NotADirectory(_) => ShellError::NotADirectory {
                    command: "ls".to_string(),
                    path: target.clone(),
                },
            })?;
        }

        let mut out = String::from("\n");
        match ctx.vfs.resolve_directory(&path) {
            Ok(dir) => {
                for child in dir.children().unwrap_or_default() {
                    out.push_str(child.name());
                    out.push('\n');
                }
            }
            Err(_) => out.push_str("No current directory set.\n"),
        }
        ctx.print(out);
        Ok(())
    }
}
