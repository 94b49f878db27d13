use crate::command::{Command, CommandDocs, CommandResult, Invocation};
use crate::commands::print_short_doc;
use crate::context::TerminalContext;
use crate::error::ShellError;
use crate::vfs::NodeKind;

/// mkdir DIRECTORY...
/// Create empty directories. Parents must already exist; if any operand
/// fails, none are created.
pub struct MkdirCommand;

impl Command for MkdirCommand {
    fn docs(&self) -> CommandDocs {
        CommandDocs::new("mkdir", "make directories", Some("Create a directory inside an existing one: mkdir <path>."))
    }

    fn execute(&self, inv: &Invocation<'_>, ctx: &mut TerminalContext) -> CommandResult {
        if inv.wants_help() {
            print_short_doc(ctx, &self.docs());
            return Ok(());
        }
        if inv.args.is_empty() {
            return Err(ShellError::BadArguments("mkdir: missing operand".to_string()));
        }
        let cwd = ctx.cwd.clone();
        ctx.vfs.make_all(&cwd, inv.args, NodeKind::Directory, "mkdir")
    }
}
