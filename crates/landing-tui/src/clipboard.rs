//! Terminal clipboard via the OSC 52 escape sequence.
//!
//! The terminal emulator owns the system clipboard; writing
//! `ESC ] 52 ; c ; <base64> BEL` asks it to store the payload. This works
//! over SSH and needs no display server.

use std::io::{self, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use landing_rs::clipboard::Clipboard;
use landing_rs::error::ClipboardError;

/// Escape sequence that sets the clipboard to `text`.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

#[derive(Debug, Default)]
pub struct Osc52Clipboard;

impl Osc52Clipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Clipboard for Osc52Clipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut out = io::stdout().lock();
        out.write_all(osc52_sequence(text).as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}
