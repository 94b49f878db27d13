//! Bindings between the core and the page: a JS screen text engine, the
//! hidden textarea, snapshots handed over as plain objects and commands
//! registered from script.

use js_sys::{Array, Function, Object, Reflect};
use log::{debug, warn};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlTextAreaElement;

use crate::command::{Command, CommandDocs, CommandResult, Invocation};
use crate::config::TerminalConfig;
use crate::context::TerminalContext;
use crate::controller::{InputWidget, ScreenTextEngine, ScrollOptions, ScrollUnit};
use crate::error::{Result, ShellError};
use crate::reconcile::Change;

impl From<ShellError> for JsValue {
    fn from(err: ShellError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Encodes `value` for the page; a failure is logged and sent as `null`.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
        warn!("could not encode result for the page: {}", e);
        JsValue::NULL
    })
}

/// Reads `{ "home/user/about.md": "...", ... }` in key order.
pub fn read_snapshot(files: &JsValue) -> Result<Vec<(String, String)>> {
    if files.is_undefined() || files.is_null() {
        return Ok(Vec::new());
    }
    let object = files
        .dyn_ref::<Object>()
        .ok_or_else(|| ShellError::Config("snapshot must be an object".to_string()))?;

    let mut entries = Vec::new();
    for entry in Object::entries(object).iter() {
        let pair: Array = entry.unchecked_into();
        match (pair.get(0).as_string(), pair.get(1).as_string()) {
            (Some(path), Some(content)) => entries.push((path, content)),
            (path, _) => warn!("skipping snapshot entry {:?}: content is not a string", path),
        }
    }
    debug!("snapshot has {} entries", entries.len());
    Ok(entries)
}

/// `undefined` or `null` means the defaults.
pub fn read_config(config: &JsValue) -> Result<TerminalConfig> {
    if config.is_undefined() || config.is_null() {
        return Ok(TerminalConfig::default());
    }
    let config: TerminalConfig =
        serde_wasm_bindgen::from_value(config.clone()).map_err(|e| ShellError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Wraps the page's screen text engine object and calls its methods by name.
pub struct JsScreenEngine {
    target: Object,
}

impl JsScreenEngine {
    pub fn new(target: Object) -> Self {
        Self { target }
    }

    fn call(&self, method: &str, args: &[JsValue]) -> JsValue {
        let func = match Reflect::get(&self.target, &JsValue::from_str(method)) {
            Ok(value) if value.is_function() => value.unchecked_into::<Function>(),
            _ => {
                warn!("screen engine has no {}()", method);
                return JsValue::UNDEFINED;
            }
        };
        let args: Array = args.iter().collect();
        func.apply(&self.target, &args).unwrap_or_else(|e| {
            warn!("screen engine {}() threw: {}", method, describe(&e));
            JsValue::UNDEFINED
        })
    }
}

impl ScreenTextEngine for JsScreenEngine {
    fn user_input(&mut self, change: &Change, caret: usize) {
        for wire in change.to_wire() {
            match serde_wasm_bindgen::to_value(&wire) {
                Ok(value) => {
                    self.call("userInput", &[value, JsValue::from(caret as u32)]);
                }
                Err(e) => warn!("could not encode input change: {}", e),
            }
        }
    }

    fn place_markdown(&mut self, markdown: &str) -> f64 {
        self.call("placeMarkdown", &[JsValue::from_str(markdown)]).as_f64().unwrap_or(0.0)
    }

    fn place_text(&mut self, text: &str) -> usize {
        self.call("placeText", &[JsValue::from_str(text)])
            .as_f64()
            .map(|lines| lines.max(0.0) as usize)
            .unwrap_or(0)
    }

    fn scroll(&mut self, amount: f64, unit: ScrollUnit, options: Option<ScrollOptions>) {
        let unit = match unit {
            ScrollUnit::Lines => "lines",
            ScrollUnit::Px => "px",
        };
        let mut args = vec![JsValue::from_f64(amount), JsValue::from_str(unit)];
        if let Some(options) = options {
            let object = Object::new();
            let _ = Reflect::set(&object, &"updateMaxScroll".into(), &options.update_max_scroll.into());
            let _ = Reflect::set(&object, &"moveView".into(), &options.move_view.into());
            args.push(object.into());
        }
        self.call("scroll", &args);
    }

    fn scroll_to_end(&mut self) {
        self.call("scrollToEnd", &[]);
    }

    fn freeze_input(&mut self) {
        self.call("freezeInput", &[]);
    }
}

/// DOM selection offsets are UTF-16 units; the core counts chars.
pub fn utf16_to_char_offset(text: &str, units: usize) -> usize {
    let mut seen = 0;
    for (index, ch) in text.chars().enumerate() {
        if seen >= units {
            return index;
        }
        seen += ch.len_utf16();
    }
    text.chars().count()
}

pub fn char_to_utf16_offset(text: &str, chars: usize) -> u32 {
    text.chars().take(chars).map(|c| c.len_utf16() as u32).sum()
}

pub struct TextAreaInput {
    element: HtmlTextAreaElement,
}

impl TextAreaInput {
    pub fn new(element: HtmlTextAreaElement) -> Self {
        Self { element }
    }
}

impl InputWidget for TextAreaInput {
    fn value(&self) -> String {
        self.element.value()
    }

    fn set_value(&mut self, value: &str) {
        self.element.set_value(value);
    }

    fn selection(&self) -> (usize, usize) {
        let value = self.element.value();
        let start = self.element.selection_start().ok().flatten().unwrap_or(0) as usize;
        let end = self.element.selection_end().ok().flatten().unwrap_or(start as u32) as usize;
        (utf16_to_char_offset(&value, start), utf16_to_char_offset(&value, end))
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        let value = self.element.value();
        let start = char_to_utf16_offset(&value, start);
        let end = char_to_utf16_offset(&value, end);
        if let Err(e) = self.element.set_selection_range(start, end) {
            warn!("could not move caret: {}", describe(&e));
        }
    }

    fn is_read_only(&self) -> bool {
        self.element.read_only()
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.element.set_read_only(read_only);
    }

    fn focus(&mut self) {
        let _ = self.element.focus();
    }

    fn blur(&mut self) {
        let _ = self.element.blur();
    }

    fn has_focus(&self) -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.active_element())
            .map(|active| active.is_same_node(Some(self.element.as_ref())))
            .unwrap_or(false)
    }
}

/// A command whose body is a JS function. It gets the positional arguments
/// and the options as two arrays; a returned string is printed as-is and a
/// thrown value fails the command.
pub struct JsCommand {
    docs: CommandDocs,
    handler: Function,
}

impl JsCommand {
    pub fn new(docs: CommandDocs, handler: Function) -> Self {
        Self { docs, handler }
    }
}

impl Command for JsCommand {
    fn docs(&self) -> CommandDocs {
        self.docs.clone()
    }

    fn execute(&self, inv: &Invocation<'_>, ctx: &mut TerminalContext) -> CommandResult {
        let args: Array = inv.args.iter().map(|a| JsValue::from_str(a)).collect();
        let options: Array = inv.options.iter().map(|o| JsValue::from_str(o)).collect();
        let returned = self
            .handler
            .call2(&JsValue::NULL, &args, &options)
            .map_err(|e| ShellError::Handler(describe(&e)))?;
        if let Some(text) = returned.as_string() {
            ctx.print(text);
        }
        Ok(())
    }
}
