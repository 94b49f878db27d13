use crate::command::{Command, CommandDocs, CommandResult, Invocation};
use crate::commands::print_short_doc;
use crate::context::{PathState, TerminalContext};
use crate::error::ShellError;
use crate::vfs::{split_segments, WalkError};

/// cat FILE
/// Print a file from the virtual tree. Relative paths start at the working
/// directory, `/...` and `home/user/...` at the root, `~` is expanded.
pub struct CatCommand;

const USAGE: &str = "\nUsage: cat <filename> or cat <path/to/filename>\nSupports ~ for home directory (e.g., ~/projects/file.md)\n";

impl Command for CatCommand {
    fn docs(&self) -> CommandDocs {
        CommandDocs::new(
            "cat",
            "Display file contents",
            Some("Display the contents of a file. Usage: cat <filename> or cat <path/to/filename>."),
        )
    }

    fn execute(&self, inv: &Invocation<'_>, ctx: &mut TerminalContext) -> CommandResult {
        if inv.wants_help() {
            print_short_doc(ctx, &self.docs());
            return Ok(());
        }
        let Some(arg) = inv.args.first() else {
            ctx.print(USAGE);
            return Ok(());
        };

        let no_such = || ShellError::NoSuchFileOrDirectory {
            command: "cat".to_string(),
            path: arg.clone(),
        };

        let expanded = ctx.vfs.expand_home(arg);
        let mut parts = split_segments(&expanded);
        let filename = parts.pop().ok_or_else(no_such)?;

        let start = if ctx.vfs.is_absolute(&expanded) {
            PathState::root()
        } else {
            ctx.cwd.clone()
        };
        ctx.vfs.resolve_directory(&start)?;

        let dir_path = ctx.vfs.walk(&start, &parts).map_err(|e| match e {
            WalkError::Missing(_) => no_such(),
            WalkError::NotADirectory(_) => ShellError::NotADirectory {
                command: "cat".to_string(),
                path: arg.clone(),
            },
        })?;
        let content = ctx
            .vfs
            .resolve_directory(&dir_path)?
            .find_file(filename)
            .and_then(|file| file.content())
            .ok_or_else(no_such)?
            .to_string();

        ctx.print(format!("\n{}\n", content));
        Ok(())
    }
}
