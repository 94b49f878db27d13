use crate::command::{Command, CommandDocs, CommandResult, Invocation};
use crate::commands::print_short_doc;
use crate::context::{PathState, TerminalContext};
use crate::error::{Result, ShellError};
use crate::vfs::{split_segments, WalkError};

/// cd [DIR]
/// Change the working directory. The move is applied only if every segment
/// resolves.
pub struct CdCommand;

impl Command for CdCommand {
    fn docs(&self) -> CommandDocs {
        CommandDocs::new(
            "cd",
            "change directory",
            Some("Change to a subdirectory, `..` for the parent, `~` or nothing for home."),
        )
    }

    fn execute(&self, inv: &Invocation<'_>, ctx: &mut TerminalContext) -> CommandResult {
        if inv.wants_help() {
            print_short_doc(ctx, &self.docs());
            return Ok(());
        }

        let new_path = match inv.args.first().map(String::as_str) {
            None | Some("~") => ctx.vfs.home_path()?,
            Some(target) => resolve_target(ctx, target)?,
        };
        ctx.cwd = new_path;
        Ok(())
    }
}

// work on a copy of the cursor so a failed walk leaves cwd untouched
fn resolve_target(ctx: &TerminalContext, target: &str) -> Result<PathState> {
    let expanded = ctx.vfs.expand_home(target);
    let start = if ctx.vfs.is_absolute(&expanded) {
        PathState::root()
    } else {
        ctx.cwd.clone()
    };
    ctx.vfs.resolve_directory(&start)?;

    ctx.vfs
        .walk(&start, &split_segments(&expanded))
        .map_err(|e| match e {
            WalkError::Missing(seg) | WalkError::NotADirectory(seg) => ShellError::NoSuchDirectory(seg),
        })
}
