use crate::command::{Command, CommandDocs, CommandResult, Invocation};
use crate::commands::print_short_doc;
use crate::context::TerminalContext;

/// echo [STRING]...
/// Write arguments separated by single spaces.
pub struct EchoCommand;

impl Command for EchoCommand {
    fn docs(&self) -> CommandDocs {
        CommandDocs::new("echo", "display a line of text", None)
    }

    fn execute(&self, inv: &Invocation<'_>, ctx: &mut TerminalContext) -> CommandResult {
        if inv.wants_help() {
            print_short_doc(ctx, &self.docs());
            return Ok(());
        }
        ctx.print(format!("\n{}", inv.args.join(" ")));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{context, run};

    #[test]
    fn test_echo_joins_args() {
        let mut ctx = context();
        assert_eq!(run("echo", &["a", "b", "c"], &mut ctx).1, "\na b c");
        assert_eq!(run("echo", &[], &mut ctx).1, "\n");
    }

    #[test]
    fn test_echo_help() {
        let mut ctx = context();
        assert_eq!(run("echo", &["-h"], &mut ctx).1, "\necho – display a line of text");
        assert_eq!(run("echo", &["hi", "-help"], &mut ctx).1, "\necho – display a line of text");
    }

    #[test]
    fn test_echo_drops_other_options() {
        let mut ctx = context();
        assert_eq!(run("echo", &["-n", "x"], &mut ctx).1, "\nx");
    }
}
