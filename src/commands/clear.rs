use crate::command::{Command, CommandDocs, CommandResult, Invocation};
use crate::commands::print_short_doc;
use crate::context::TerminalContext;

pub struct ClearCommand;

impl Command for ClearCommand {
    fn docs(&self) -> CommandDocs {
        CommandDocs::new("clear", "Clear the terminal screen", Some("Clears all content from the terminal screen"))
    }

    fn execute(&self, inv: &Invocation<'_>, ctx: &mut TerminalContext) -> CommandResult {
        if inv.wants_help() {
            print_short_doc(ctx, &self.docs());
            return Ok(());
        }
        // the display only appends, so push old output out of view
        let blank = "\n".repeat(ctx.config.clear_lines);
        ctx.print(blank);
        Ok(())
    }
}
