//! anko-pty - Unix pseudo-terminal management
//!
//! The narrow OS-facing collaborator of the emulator core:
//! - PTY master/slave pair creation (openpty)
//! - Child process spawning with session and controlling-terminal setup
//! - Window size management (TIOCSWINSZ + SIGWINCH)
//!
//! The core itself never touches this crate; it only sees a reader, a writer
//! and a size-change call.

mod child;
mod error;
mod pty;
mod size;

pub use child::Child;
pub use error::{Error, Result};
pub use pty::Pty;
pub use size::WindowSize;
