use crate::command::{Command, CommandDocs, CommandResult, Invocation};
use crate::commands::print_short_doc;
use crate::context::{SessionAction, TerminalContext};

/// Leaves the terminal for the portfolio page. The host does the navigation.
pub struct ExitCommand;

impl Command for ExitCommand {
    fn docs(&self) -> CommandDocs {
        CommandDocs::new(
            "exit",
            "Exit the terminal",
            Some("Exits the terminal application and returns to the main page"),
        )
    }

    fn execute(&self, inv: &Invocation<'_>, ctx: &mut TerminalContext) -> CommandResult {
        if inv.wants_help() {
            print_short_doc(ctx, &self.docs());
            return Ok(());
        }
        let route = ctx.config.exit_route.clone();
        ctx.request(SessionAction::Navigate(route));
        Ok(())
    }
}
