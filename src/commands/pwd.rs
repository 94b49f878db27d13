use crate::command::{Command, CommandDocs, CommandResult, Invocation};
use crate::commands::print_short_doc;
use crate::context::TerminalContext;
use crate::prompt::format_path;

/// pwd
/// Print the working directory, `~` standing in for home.
pub struct PwdCommand;

impl Command for PwdCommand {
    fn docs(&self) -> CommandDocs {
        CommandDocs::new("pwd", "print name of current/working directory", None)
    }

    fn execute(&self, inv: &Invocation<'_>, ctx: &mut TerminalContext) -> CommandResult {
        if inv.wants_help() {
            print_short_doc(ctx, &self.docs());
            return Ok(());
        }
        let shown = format_path(&ctx.cwd, ctx.vfs.home());
        ctx.print(format!("\n{}", shown));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{at, context, run};
    use crate::context::PathState;

    #[test]
    fn test_pwd_at_home() {
        let mut ctx = context();
        assert_eq!(run("pwd", &[], &mut ctx).1, "\n~");
    }

    #[test]
    fn test_pwd_formats_paths() {
        let mut ctx = context();
        ctx.cwd = at(&["home", "user", "projects"]);
        assert_eq!(run("pwd", &[], &mut ctx).1, "\n~/projects");
        ctx.cwd = at(&["etc"]);
        assert_eq!(run("pwd", &[], &mut ctx).1, "\n/etc");
        ctx.cwd = PathState::root();
        assert_eq!(run("pwd", &[], &mut ctx).1, "\n/");
    }

    #[test]
    fn test_pwd_tracks_cd() {
        let mut ctx = context();
        for (target, expected) in [("projects", "\n~/projects"), ("/etc", "\n/etc"), ("~", "\n~"), ("..", "\n/home")] {
            run("cd", &[target], &mut ctx).0.unwrap();
            assert_eq!(run("pwd", &[], &mut ctx).1, expected, "after cd {}", target);
        }
    }
}
