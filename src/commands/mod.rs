pub mod cat;
pub mod cd;
pub mod clear;
pub mod echo;
pub mod exit;
pub mod hello;
pub mod help;
pub mod ls;
pub mod mkdir;
pub mod pwd;
pub mod touch;

use crate::command::CommandDocs;
use crate::context::TerminalContext;

/// `-h` output shared by every command: `\n<name> – <short>`.
pub(crate) fn print_short_doc(ctx: &mut TerminalContext, docs: &CommandDocs) {
    ctx.print(format!("\n{} – {}", docs.name, docs.short));
}
