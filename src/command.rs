use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::context::TerminalContext;
use crate::error::Result;

pub type CommandResult = Result<()>;

/// What `help` knows about a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDocs {
    pub name: String,
    pub short: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
}

impl CommandDocs {
    pub fn new(name: &str, short: &str, long: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            short: short.to_string(),
            long: long.map(|s| s.to_string()),
        }
    }
}

/// One parsed command line, plus the registry it was dispatched from.
pub struct Invocation<'a> {
    pub name: &'a str,
    pub args: &'a [String],
    pub options: &'a [String],
    pub registry: &'a CommandRegistry,
}

impl Invocation<'_> {
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    pub fn wants_help(&self) -> bool {
        self.has_option("-h") || self.has_option("-help") || self.has_option("--help")
    }
}

pub trait Command {
    fn docs(&self) -> CommandDocs;
    fn execute(&self, inv: &Invocation<'_>, ctx: &mut TerminalContext) -> CommandResult;
}

/// Adapter so plain closures can be registered at runtime.
pub struct FnCommand<F> {
    docs: CommandDocs,
    handler: F,
}

impl<F> FnCommand<F>
where
    F: Fn(&Invocation<'_>, &mut TerminalContext) -> CommandResult,
{
    pub fn new(docs: CommandDocs, handler: F) -> Self {
        Self { docs, handler }
    }
}

impl<F> Command for FnCommand<F>
where
    F: Fn(&Invocation<'_>, &mut TerminalContext) -> CommandResult,
{
    fn docs(&self) -> CommandDocs {
        self.docs.clone()
    }

    fn execute(&self, inv: &Invocation<'_>, ctx: &mut TerminalContext) -> CommandResult {
        (self.handler)(inv, ctx)
    }
}

/// Commands by name. Listing follows registration order; re-registering a
/// name replaces the handler but keeps its place.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
    order: Vec<String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_command(&mut self, name: &str, cmd: Box<dyn Command>) {
        if self.commands.insert(name.to_string(), cmd).is_none() {
            self.order.push(name.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn list(&self) -> Vec<(&str, CommandDocs)> {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name).map(|c| (name.as_str(), c.docs())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn default_commands() -> Self {
        let mut reg = Self::new();
        reg.register_command("cd", Box::new(crate::commands::cd::CdCommand));
        reg.register_command("ls", Box::new(crate::commands::ls::LsCommand));
        reg.register_command("cat", Box::new(crate::commands::cat::CatCommand));
        reg.register_command("pwd", Box::new(crate::commands::pwd::PwdCommand));
        reg.register_command("mkdir", Box::new(crate::commands::mkdir::MkdirCommand));
        reg.register_command("touch", Box::new(crate::commands::touch::TouchCommand));
        reg.register_command("echo", Box::new(crate::commands::echo::EchoCommand));
        reg.register_command("hello", Box::new(crate::commands::hello::HelloCommand));
        reg.register_command("clear", Box::new(crate::commands::clear::ClearCommand));
        reg.register_command("exit", Box::new(crate::commands::exit::ExitCommand));
        reg.register_command("help", Box::new(crate::commands::help::HelpCommand));
        reg
    }
}

fn whitespace() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Collapse whitespace runs to one space and trim.
pub fn sanitize_command(input: &str) -> String {
    whitespace().replace_all(input, " ").trim().to_string()
}

/// `None` for a blank line, otherwise the command name and its raw arguments.
pub fn split_command(input: &str) -> Option<(String, Vec<String>)> {
    let sanitized = sanitize_command(input);
    let mut parts = sanitized.split(' ').filter(|p| !p.is_empty());
    let name = parts.next()?.to_string();
    Some((name, parts.map(|p| p.to_string()).collect()))
}

/// Split arguments into positional ones and `-options`, keeping the order
/// within each group.
pub fn parse_command_args(args: &[String]) -> (Vec<String>, Vec<String>) {
    args.iter()
        .filter(|a| !a.is_empty())
        .cloned()
        .partition(|a| !a.starts_with('-'))
}
