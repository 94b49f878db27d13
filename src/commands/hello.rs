use crate::command::{Command, CommandDocs, CommandResult, Invocation};
use crate::commands::print_short_doc;
use crate::context::TerminalContext;

pub struct HelloCommand;

impl Command for HelloCommand {
    fn docs(&self) -> CommandDocs {
        CommandDocs::new("hello", "friendly greeting program", None)
    }

    fn execute(&self, inv: &Invocation<'_>, ctx: &mut TerminalContext) -> CommandResult {
        if inv.wants_help() {
            print_short_doc(ctx, &self.docs());
        } else {
            ctx.print("\nHello, world!");
        }
        Ok(())
    }
}
