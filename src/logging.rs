//! Logging setup: `tracing` events formatted by `tracing-subscriber` and
//! written to the browser console (stderr natively).

use std::io;
use std::str::FromStr;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Install the global subscriber at `level` ("error" .. "trace"). Unknown
/// levels fall back to `warn`. Returns false if a subscriber was already set.
pub fn init_logging(level: &str) -> bool {
    let level = Level::from_str(level).unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .with_writer(ConsoleMakeWriter)
        .try_init()
        .is_ok()
}

/// Hands out one [`ConsoleWriter`] per event, routed by level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and emits it on drop.
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buf: Vec::new(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn emit(&self, line: &str) {
        let line = wasm_bindgen::JsValue::from_str(line);
        match self.level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn emit(&self, line: &str) {
        let _ = self.level;
        eprintln!("{line}");
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buf);
        let line = text.trim_end();
        if !line.is_empty() {
            self.emit(line);
        }
    }
}
