use crate::command::{Command, CommandDocs, CommandResult, Invocation};
use crate::commands::print_short_doc;
use crate::context::TerminalContext;
use crate::error::ShellError;
use crate::vfs::NodeKind;

pub struct TouchCommand;

impl Command for TouchCommand {
    fn docs(&self) -> CommandDocs {
        CommandDocs::new("touch", "create empty files", Some("Create an empty file inside an existing directory: touch <path>."))
    }

    fn execute(&self, inv: &Invocation<'_>, ctx: &mut TerminalContext) -> CommandResult {
        if inv.wants_help() {
            print_short_doc(ctx, &self.docs());
            return Ok(());
        }
        if inv.args.is_empty() {
            return Err(ShellError::BadArguments("touch: missing file operand".to_string()));
        }
        let cwd = ctx.cwd.clone();
        ctx.vfs.make_all(&cwd, inv.args, NodeKind::File, "touch")
    }
}
