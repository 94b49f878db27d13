use std::collections::VecDeque;

use log::debug;

use crate::command::{parse_command_args, sanitize_command, split_command, Command, CommandRegistry, Invocation};
use crate::context::{Display, SessionAction, TerminalContext};
use crate::error::ShellError;
use crate::prompt::prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    Idle,
    Executing,
}

/// Turns submitted lines into command runs. Whatever happens, the line ends
/// with a fresh prompt on the display.
pub struct CommandProcessor {
    registry: CommandRegistry,
    ctx: TerminalContext,
    state: ProcessorState,
    history: VecDeque<String>,
}

impl CommandProcessor {
    pub fn new(ctx: TerminalContext) -> Self {
        Self::with_registry(ctx, CommandRegistry::default_commands())
    }

    pub fn with_registry(ctx: TerminalContext, registry: CommandRegistry) -> Self {
        Self {
            registry,
            ctx,
            state: ProcessorState::Idle,
            history: VecDeque::new(),
        }
    }

    pub fn register_command(&mut self, name: &str, cmd: Box<dyn Command>) {
        debug!("registering command {}", name);
        self.registry.register_command(name, cmd);
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn context(&self) -> &TerminalContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut TerminalContext {
        &mut self.ctx
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    /// Oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn prompt(&self) -> String {
        prompt(&self.ctx.config.user, &self.ctx.cwd, self.ctx.vfs.home())
    }

    pub fn take_actions(&mut self) -> Vec<SessionAction> {
        self.ctx.take_actions()
    }

    pub fn process_command(&mut self, line: &str, display: &mut dyn Display) {
        let Some((name, raw_args)) = split_command(line) else {
            self.show_prompt(display);
            return;
        };
        self.record_history(sanitize_command(line));
        debug!("processing command: {} {:?}", name, raw_args);

        let (args, options) = parse_command_args(&raw_args);
        self.state = ProcessorState::Executing;
        let outcome = match self.registry.get(&name) {
            Some(cmd) => {
                let inv = Invocation {
                    name: &name,
                    args: &args,
                    options: &options,
                    registry: &self.registry,
                };
                cmd.execute(&inv, &mut self.ctx)
            }
            None => Err(ShellError::UnknownCommand(name.clone())),
        };
        self.state = ProcessorState::Idle;

        for printed in self.ctx.take_output() {
            display.print(&printed.text, printed.markdown);
        }
        if let Err(err) = outcome {
            debug!("{} failed: {:?}", name, err);
            let message = if err.is_internal() {
                format!("\nError executing {}: {}", name, err)
            } else {
                format!("\n{}", err)
            };
            display.print(&message, false);
        }
        self.show_prompt(display);
    }

    fn show_prompt(&self, display: &mut dyn Display) {
        display.print(&self.prompt(), false);
    }

    fn record_history(&mut self, line: String) {
        let limit = self.ctx.config.history_size;
        if limit == 0 {
            return;
        }
        while self.history.len() >= limit {
            self.history.pop_front();
        }
        self.history.push_back(line);
    }
}
