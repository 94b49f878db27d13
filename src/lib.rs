// terminal for the portfolio site
// read-only-ish shell over a bundled snapshot of the content tree
pub mod command;
pub mod commands;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod logging;
pub mod processor;
pub mod prompt;
pub mod reconcile;
pub mod vfs;
pub mod web;

use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::HtmlTextAreaElement;

pub use command::{Command, CommandDocs, CommandRegistry, CommandResult, FnCommand, Invocation};
pub use config::TerminalConfig;
pub use context::{Display, PathState, Printed, SessionAction, TerminalContext};
pub use controller::{InputWidget, PointerKind, ScreenTextEngine, ScrollOptions, ScrollUnit, TerminalController};
pub use error::{Result, ShellError};
pub use processor::{CommandProcessor, ProcessorState};
pub use reconcile::{Change, Location, Reconciler};
pub use vfs::{NodeKind, VfsNode, VirtualFileSystem};

use web::{JsCommand, JsScreenEngine, TextAreaInput};

// page-facing handle: owns one session wired to the textarea and the
// screen text engine the page passes in
#[wasm_bindgen]
pub struct Terminal {
    controller: TerminalController<JsScreenEngine, TextAreaInput>,
}

#[wasm_bindgen]
impl Terminal {
    #[wasm_bindgen(constructor)]
    pub fn new(
        files: JsValue,
        engine: js_sys::Object,
        textarea: HtmlTextAreaElement,
        config: JsValue,
    ) -> std::result::Result<Terminal, JsValue> {
        let config = web::read_config(&config)?;
        logging::init(config.log_filter());
        let entries = web::read_snapshot(&files)?;
        info!("starting terminal with {} files", entries.len());

        let controller = TerminalController::from_snapshot(
            entries,
            config,
            JsScreenEngine::new(engine),
            TextAreaInput::new(textarea),
        )?;
        Ok(Terminal { controller })
    }

    /// `input` event on the textarea.
    pub fn input(&mut self) {
        self.controller.handle_input();
    }

    /// `keypress`; true means call `preventDefault()`.
    pub fn key_press(&mut self, key: &str) -> bool {
        let consumed = self.controller.handle_key_press(key);
        self.follow_actions();
        consumed
    }

    /// `keydown`; true means call `preventDefault()`.
    pub fn key_down(&mut self, key: &str) -> bool {
        self.controller.handle_key_down(key)
    }

    pub fn selection_change(&mut self) {
        self.controller.handle_selection_change();
    }

    /// `pointerup`, with the event's `pointerType`.
    pub fn pointer_up(&mut self, pointer_type: &str) {
        self.controller.handle_pointer(PointerKind::parse(pointer_type));
    }

    /// Runs a line without going through the textarea and returns what
    /// would have been printed, as `[{ text, markdown }]`.
    pub fn execute(&mut self, line: &str) -> JsValue {
        let mut printed: Vec<Printed> = Vec::new();
        self.controller.processor_mut().process_command(line, &mut printed);
        self.follow_actions();
        web::to_js(&printed)
    }

    /// Adds a command backed by a JS function; it shows up in `help` at once.
    pub fn register_command(&mut self, name: &str, short: &str, long: Option<String>, handler: js_sys::Function) {
        let docs = CommandDocs::new(name, short, long.as_deref());
        self.controller
            .processor_mut()
            .register_command(name, Box::new(JsCommand::new(docs, handler)));
    }

    pub fn command_names(&self) -> JsValue {
        web::to_js(&self.controller.processor().registry().get_command_names())
    }

    /// `[{ name, short, long? }]` in registration order, the same list `help` prints.
    pub fn commands(&self) -> JsValue {
        let docs: Vec<CommandDocs> = self
            .controller
            .processor()
            .registry()
            .list()
            .into_iter()
            .map(|(_, docs)| docs)
            .collect();
        web::to_js(&docs)
    }

    pub fn cwd(&self) -> String {
        self.controller.processor().context().cwd.to_string()
    }

    pub fn prompt(&self) -> String {
        self.controller.processor().prompt()
    }

    pub fn dispose(&mut self) {
        self.controller.dispose();
    }

    fn follow_actions(&mut self) {
        for action in self.controller.take_actions() {
            match action {
                SessionAction::Navigate(route) => {
                    info!("navigating to {}", route);
                    let result = web_sys::window()
                        .ok_or_else(|| JsValue::from_str("no window"))
                        .and_then(|w| w.location().set_href(&route));
                    if let Err(e) = result {
                        warn!("navigation to {} failed: {:?}", route, e);
                    }
                }
            }
        }
    }
}
