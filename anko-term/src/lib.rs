//! anko-term - xterm-compatible terminal emulator core
//!
//! Turns a stream of PTY bytes into a grid of styled cells and user input
//! events into bytes for the PTY. Rendering stays outside: a GUI consumes
//! `Terminal::snapshot` and feeds `key_event`/`mouse_event`.
//!
//! ```no_run
//! use anko_term::{Session, Terminal};
//!
//! // Headless use: feed bytes, inspect the grid
//! let mut term = Terminal::with_size(24, 80);
//! term.feed(b"\x1b[1;31mhello\x1b[0m");
//! assert_eq!(term.snapshot().row_text(0), "hello");
//!
//! // Shell-backed use: reader thread, blink ticker, resize plumbing
//! let session = Session::spawn_shell(24, 80, || { /* schedule repaint */ }).unwrap();
//! session.resize(30, 100).unwrap();
//! session.shutdown();
//! ```

mod input;
mod session;
mod terminal;

pub use input::{
    bracketed_paste_end, bracketed_paste_start, encode_key, encode_mouse, Key, Modifiers,
    MouseButton,
};
pub use session::{run_reader, spawn_ticker, CancelToken, Session, PTY_BUF_LEN};
pub use terminal::{Config, ListenerId, Printer, Terminal};

pub use anko_core::{
    Cell, CellAttributes, Charset, CharsetState, Color, Cursor, CursorShape, Dimensions, Grid,
    Line, Modes, MouseMode, Screen, Snapshot, SnapshotCursor,
};
pub use anko_parser::{Action, CsiAction, EscAction, OscMessage, Params, Parser};
