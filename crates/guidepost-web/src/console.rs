#![forbid(unsafe_code)]

//! `tracing` output to the browser console.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;

/// Buffers one formatted event and hands it to `console.*` on drop.
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&self.buf);
        let line = JsValue::from_str(text.trim_end());
        match self.level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
        self.buf.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buf: Vec::new(),
        }
    }
}

/// Install a global subscriber writing to the console.
///
/// `filter` uses `EnvFilter` directive syntax, e.g. `"guidepost=debug"`.
/// Returns `false` if a subscriber was already installed or the filter does
/// not parse.
pub fn init(filter: &str) -> bool {
    let filter = match EnvFilter::try_new(filter) {
        Ok(filter) => filter,
        Err(err) => {
            web_sys::console::warn_1(&JsValue::from_str(&format!("invalid log filter: {err}")));
            return false;
        }
    };
    tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_env_filter(filter)
        .with_ansi(false)
        .without_time()
        .try_init()
        .is_ok()
}
