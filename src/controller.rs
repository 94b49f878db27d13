use log::debug;

use crate::config::TerminalConfig;
use crate::context::{Printed, SessionAction, TerminalContext};
use crate::error::Result;
use crate::processor::CommandProcessor;
use crate::reconcile::{Change, Reconciler};
use crate::vfs::{SnapshotOptions, VirtualFileSystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollUnit {
    Lines,
    Px,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOptions {
    pub update_max_scroll: bool,
    pub move_view: bool,
}

/// The renderer that draws the scrollback. It only ever appends text and
/// echoes edits of the input line.
pub trait ScreenTextEngine {
    fn user_input(&mut self, change: &Change, caret: usize);
    /// Returns the height of the placed block in pixels.
    fn place_markdown(&mut self, markdown: &str) -> f64;
    /// Returns the number of lines placed.
    fn place_text(&mut self, text: &str) -> usize;
    /// `None` leaves the options to the engine.
    fn scroll(&mut self, amount: f64, unit: ScrollUnit, options: Option<ScrollOptions>);
    fn scroll_to_end(&mut self);
    fn freeze_input(&mut self);
}

/// The hidden text box keystrokes land in. Offsets are in characters.
pub trait InputWidget {
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);
    fn selection(&self) -> (usize, usize);
    fn set_selection(&mut self, start: usize, end: usize);
    fn is_read_only(&self) -> bool;
    fn set_read_only(&mut self, read_only: bool);
    fn focus(&mut self);
    fn blur(&mut self);
    fn has_focus(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "mouse" => PointerKind::Mouse,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Touch,
        }
    }
}

// lines the view moves after a markdown block
const MARKDOWN_VIEW_LINES: f64 = 12.0;

/// Keeps the input widget, the screen and the shell in step.
pub struct TerminalController<E, W> {
    processor: CommandProcessor,
    engine: E,
    input: W,
    reconciler: Reconciler,
    last_selection: usize,
    old_text: String,
    initialized: bool,
}

impl<E: ScreenTextEngine, W: InputWidget> TerminalController<E, W> {
    pub fn new(processor: CommandProcessor, engine: E, input: W) -> Self {
        let reconciler = Reconciler::new(processor.context().config.allow_replacements);
        let mut controller = Self {
            processor,
            engine,
            input,
            reconciler,
            last_selection: 0,
            old_text: String::new(),
            initialized: false,
        };
        controller.initialize();
        controller
    }

    /// Builds the whole session from the bundled `(path, content)` snapshot.
    pub fn from_snapshot<I, P, C>(entries: I, config: TerminalConfig, engine: E, input: W) -> Result<Self>
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: Into<String>,
    {
        config.validate()?;
        let vfs = VirtualFileSystem::from_snapshot_with(entries, &SnapshotOptions::from(&config));
        let ctx = TerminalContext::new(vfs, config);
        Ok(Self::new(CommandProcessor::new(ctx), engine, input))
    }

    fn initialize(&mut self) {
        self.input.set_value("");
        self.input.set_read_only(true);
        self.input.blur();
        self.display_welcome();
        self.initialized = true;
    }

    fn display_welcome(&mut self) {
        let ctx = self.processor.context();
        let welcome = ctx
            .config
            .welcome_file
            .as_deref()
            .and_then(|path| ctx.vfs.read_file(path))
            .map(str::to_string);
        if let Some(markdown) = welcome {
            self.engine.place_markdown(&markdown);
        }
        let prompt = self.processor.prompt();
        self.engine.place_text(&prompt);
    }

    fn print_to_screen(&mut self, printed: &Printed) {
        if printed.markdown {
            let pixels = self.engine.place_markdown(&printed.text);
            self.engine.scroll(
                pixels,
                ScrollUnit::Px,
                Some(ScrollOptions { update_max_scroll: true, move_view: false }),
            );
            self.engine.scroll(
                MARKDOWN_VIEW_LINES,
                ScrollUnit::Lines,
                Some(ScrollOptions { update_max_scroll: false, move_view: true }),
            );
        } else {
            let lines = self.engine.place_text(&printed.text);
            self.engine.scroll(lines as f64, ScrollUnit::Lines, None);
        }
    }

    // diff the widget against what the screen last saw
    fn sync_input(&mut self) {
        let value = self.input.value();
        let change = self.reconciler.reconcile(&self.old_text, &value);
        self.old_text = value;
        if change != Change::NoChange {
            self.engine.user_input(&change, self.input.selection().0);
        }
    }

    pub fn handle_input(&mut self) {
        self.sync_input();
        self.engine.scroll_to_end();
    }

    pub fn handle_pointer(&mut self, kind: PointerKind) {
        if kind == PointerKind::Mouse {
            self.input.set_read_only(false);
            self.input.focus();
            self.input.set_selection(self.last_selection, self.last_selection);
        } else {
            self.input.set_read_only(true);
            self.input.blur();
        }
    }

    /// Returns true when the key was consumed here and the caller should
    /// stop the browser's default handling.
    pub fn handle_key_press(&mut self, key: &str) -> bool {
        let mut consumed = false;
        if self.input.is_read_only() || !self.input.has_focus() {
            self.input.set_read_only(false);
            self.input.focus();

            if key.chars().count() == 1 {
                consumed = true;
                let value = self.input.value();
                let at = self.last_selection.min(value.chars().count());
                let mut chars: Vec<char> = value.chars().collect();
                chars.splice(at..at, key.chars());
                self.input.set_value(&chars.into_iter().collect::<String>());
                self.last_selection = at + 1;
                self.handle_input();
            }

            self.input.set_selection(self.last_selection, self.last_selection);
        }

        if key == "Enter" {
            self.execute_command();
            consumed = true;
        }
        consumed
    }

    pub fn handle_key_down(&mut self, key: &str) -> bool {
        let amount = match key {
            "ArrowUp" => -1.0,
            "ArrowDown" => 1.0,
            _ => return false,
        };
        self.engine.scroll(
            amount,
            ScrollUnit::Lines,
            Some(ScrollOptions { update_max_scroll: false, move_view: true }),
        );
        true
    }

    pub fn handle_selection_change(&mut self) {
        let (start, end) = self.input.selection();
        if start != end {
            self.input.set_selection(self.last_selection, self.last_selection);
        }
        self.last_selection = self.input.selection().0;
        self.engine.user_input(&Change::NoChange, self.last_selection);
    }

    pub fn execute_command(&mut self) {
        self.engine.freeze_input();
        let line = self.input.value();
        debug!("submitting line: {:?}", line);

        let mut printed: Vec<Printed> = Vec::new();
        self.processor.process_command(&line, &mut printed);
        for block in &printed {
            self.print_to_screen(block);
        }

        self.input.set_value("");
        self.last_selection = 0;
        self.sync_input();
    }

    /// Host-side requests (navigation) left by the last command.
    pub fn take_actions(&mut self) -> Vec<SessionAction> {
        self.processor.take_actions()
    }

    pub fn processor(&self) -> &CommandProcessor {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut CommandProcessor {
        &mut self.processor
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn input(&self) -> &W {
        &self.input
    }

    pub fn is_ready(&self) -> bool {
        self.initialized
    }

    pub fn dispose(&mut self) {
        self.initialized = false;
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Call, MemoryInput, RecordingEngine};
    use super::*;
    use crate::reconcile::Location;

    fn controller() -> TerminalController<RecordingEngine, MemoryInput> {
        TerminalController::from_snapshot(
            vec![
                ("home/user/title/title.md", "# Welcome"),
                ("home/user/about.md", "about"),
            ],
            TerminalConfig::default(),
            RecordingEngine::default(),
            MemoryInput::default(),
        )
        .unwrap()
    }

    // keys the controller does not consume are typed by the widget itself
    fn type_keys(c: &mut TerminalController<RecordingEngine, MemoryInput>, keys: &str) {
        for ch in keys.chars() {
            let key = ch.to_string();
            if !c.handle_key_press(&key) {
                c.input.type_text(&key);
                c.handle_input();
                c.handle_selection_change();
            }
        }
    }

    #[test]
    fn test_welcome_then_prompt() {
        let c = controller();
        assert!(c.is_ready());
        assert_eq!(c.engine().calls, vec![Call::Markdown("# Welcome".into()), Call::Text("\nuser:~$".into())]);
        assert!(c.input().read_only);
        assert!(!c.input().focused);
    }

    #[test]
    fn test_missing_welcome_file_only_prompts() {
        let c = TerminalController::from_snapshot(
            vec![("home/user/a", "")],
            TerminalConfig::default(),
            RecordingEngine::default(),
            MemoryInput::default(),
        )
        .unwrap();
        assert_eq!(c.engine().texts(), vec!["\nuser:~$"]);
    }

    #[test]
    fn test_bad_config_is_rejected() {
        let config = TerminalConfig { clear_lines: 0, ..TerminalConfig::default() };
        let result = TerminalController::from_snapshot(
            Vec::<(String, String)>::new(),
            config,
            RecordingEngine::default(),
            MemoryInput::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_key_press_echoes_one_insertion_per_key() {
        let mut c = controller();
        type_keys(&mut c, "ls");
        assert_eq!(c.input().value, "ls");
        assert!(c.input().focused);
        assert_eq!(
            c.engine().inputs(),
            vec![
                &Change::Insertion { location: Location::End, text: "l".into() },
                &Change::Insertion { location: Location::End, text: "s".into() },
            ]
        );
    }

    #[test]
    fn test_native_input_in_the_middle() {
        let mut c = controller();
        c.handle_pointer(PointerKind::Mouse);
        c.input.type_text("cat");
        c.handle_input();
        c.input.selection = (1, 1);
        c.handle_selection_change();
        c.input.type_text("h");
        c.handle_input();
        assert_eq!(c.input().value, "chat");
        assert_eq!(
            c.engine().inputs().last(),
            Some(&&Change::Insertion { location: Location::Offset(1), text: "h".into() })
        );
    }

    #[test]
    fn test_backspace_is_a_deletion() {
        let mut c = controller();
        type_keys(&mut c, "pwdd");
        c.input.value = "pwd".to_string();
        c.input.selection = (3, 3);
        c.handle_input();
        assert_eq!(
            c.engine().inputs().last(),
            Some(&&Change::Deletion { location: Location::End, text: "d".into() })
        );
    }

    #[test]
    fn test_enter_runs_command_and_resets_input() {
        let mut c = controller();
        type_keys(&mut c, "echo hi");
        assert!(c.handle_key_press("Enter"));

        assert_eq!(c.input().value, "");
        let texts = c.engine().texts();
        assert_eq!(&texts[texts.len() - 2..], &["\nhi", "\nuser:~$"]);
        assert!(c.engine().calls.contains(&Call::Freeze));
        assert_eq!(
            c.engine().inputs().last(),
            Some(&&Change::Deletion { location: Location::End, text: "echo hi".into() })
        );
        assert_eq!(c.processor().history().collect::<Vec<_>>(), vec!["echo hi"]);
    }

    #[test]
    fn test_markdown_output_scrolls_by_pixels_then_lines() {
        let mut c = controller();
        c.input.value = "help".to_string();
        c.execute_command();
        let calls = &c.engine().calls;
        let at = calls.iter().position(|call| matches!(call, Call::Markdown(t) if t.contains("## Available Commands"))).unwrap();
        assert_eq!(
            calls[at + 1],
            Call::Scroll(100.0, ScrollUnit::Px, Some(ScrollOptions { update_max_scroll: true, move_view: false }))
        );
        assert_eq!(
            calls[at + 2],
            Call::Scroll(12.0, ScrollUnit::Lines, Some(ScrollOptions { update_max_scroll: false, move_view: true }))
        );
    }

    #[test]
    fn test_text_output_scrolls_by_line_count() {
        let mut c = controller();
        c.input.value = "ls".to_string();
        c.execute_command();
        let calls = &c.engine().calls;
        let at = calls.iter().position(|call| *call == Call::Text("\ntitle\nabout.md\n".into())).unwrap();
        assert_eq!(calls[at + 1], Call::Scroll(3.0, ScrollUnit::Lines, None));
    }

    #[test]
    fn test_selection_collapses_to_last_caret() {
        let mut c = controller();
        type_keys(&mut c, "abc");
        c.input.selection = (0, 2);
        c.handle_selection_change();
        assert_eq!(c.input().selection, (3, 3));
        assert_eq!(c.engine().calls.last(), Some(&Call::UserInput(Change::NoChange, 3)));
    }

    #[test]
    fn test_pointer_kinds() {
        let mut c = controller();
        c.handle_pointer(PointerKind::Touch);
        assert!(c.input().read_only && !c.input().focused);
        c.handle_pointer(PointerKind::parse("mouse"));
        assert!(!c.input().read_only && c.input().focused);
        assert_eq!(PointerKind::parse("pen"), PointerKind::Pen);
    }

    #[test]
    fn test_arrow_keys_scroll() {
        let mut c = controller();
        assert!(c.handle_key_down("ArrowUp"));
        assert!(!c.handle_key_down("a"));
        assert_eq!(
            c.engine().calls.last(),
            Some(&Call::Scroll(-1.0, ScrollUnit::Lines, Some(ScrollOptions { update_max_scroll: false, move_view: true })))
        );
    }

    #[test]
    fn test_exit_surfaces_navigation() {
        let mut c = controller();
        type_keys(&mut c, "exit");
        c.handle_key_press("Enter");
        assert_eq!(c.take_actions(), vec![SessionAction::Navigate("/portfolio".to_string())]);
    }

    #[test]
    fn test_dispose() {
        let mut c = controller();
        c.dispose();
        assert!(!c.is_ready());
    }
}
