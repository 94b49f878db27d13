//! `log` backend: the browser console under wasm, `env_logger` everywhere else.

use log::LevelFilter;

#[cfg(target_arch = "wasm32")]
mod console {
    use std::sync::atomic::{AtomicBool, Ordering};

    use log::{Level, LevelFilter, Log, Metadata, Record};

    const PREFIX: &str = "[folio-shell]";

    struct ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record<'_>) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = wasm_bindgen::JsValue::from_str(&format!(
                "{prefix} [{level} {target}] {message}",
                prefix = PREFIX,
                level = record.level(),
                target = record.target(),
                message = record.args(),
            ));
            match record.level() {
                Level::Error => web_sys::console::error_1(&line),
                Level::Warn => web_sys::console::warn_1(&line),
                Level::Info => web_sys::console::info_1(&line),
                Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: ConsoleLogger = ConsoleLogger;
    static LOGGER_INSTALLED: AtomicBool = AtomicBool::new(false);

    pub fn install(level: LevelFilter) {
        if !LOGGER_INSTALLED.swap(true, Ordering::AcqRel) {
            // the page may have installed its own logger
            let _ = log::set_logger(&LOGGER);
        }
        log::set_max_level(level);
    }
}

/// Installs the logger once; later calls are ignored. Natively `RUST_LOG`
/// overrides `level`.
#[cfg(target_arch = "wasm32")]
pub fn init(level: LevelFilter) {
    console::install(level);
}

/// Installs the logger once; later calls are ignored. Natively `RUST_LOG`
/// overrides `level`.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();
    builder.format_timestamp_millis();
    let _ = builder.try_init();
}
