//! anko-parser - Streaming terminal escape-sequence parser
//!
//! Consumes PTY bytes in arbitrary chunks (mid-UTF-8, mid-escape) and emits
//! semantic actions for an interpreter. The state machine follows the VT500
//! parser model, extended with the printer-controller state (`CSI 5 i` ..
//! `CSI 4 i`) and a DCS string state that tolerates doubled ESC bytes inside
//! tmux passthrough payloads.

mod action;
mod params;
mod parser;
mod utf8;

pub use action::{Action, CsiAction, EscAction, OscMessage};
pub use params::Params;
pub use parser::{Parser, ParserState};
pub use utf8::{Utf8Decoder, Utf8Result};
