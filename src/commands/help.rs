use crate::command::{Command, CommandDocs, CommandResult, Invocation};
use crate::commands::print_short_doc;
use crate::context::TerminalContext;

/// help
/// Lists whatever is in the registry at the time it runs, as markdown.
pub struct HelpCommand;

impl Command for HelpCommand {
    fn docs(&self) -> CommandDocs {
        CommandDocs::new(
            "help",
            "Display available commands",
            Some("Shows a list of all available commands and their descriptions"),
        )
    }

    fn execute(&self, inv: &Invocation<'_>, ctx: &mut TerminalContext) -> CommandResult {
        if inv.wants_help() {
            print_short_doc(ctx, &self.docs());
            return Ok(());
        }

        let mut help_text = String::from("\n\n## Available Commands\n\n");
        for (name, docs) in inv.registry.list() {
            help_text.push_str(&format!("**{}** - {}\n", name, docs.short));
            if let Some(long) = docs.long.as_deref().filter(|l| !l.is_empty()) {
                help_text.push_str(&format!("  {}\n", long));
            }
            help_text.push('\n');
        }
        ctx.print_markdown(help_text);
        Ok(())
    }
}
