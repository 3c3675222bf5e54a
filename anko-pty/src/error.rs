//! Error types for PTY operations

use std::io;
use thiserror::Error;

/// PTY error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// System call failure
    #[error("system error: {0}")]
    Sys(#[from] nix::Error),

    /// PTY creation failed
    #[error("failed to create PTY: {0}")]
    PtyCreation(String),

    /// Failed to spawn the child process
    #[error("failed to spawn child: {0}")]
    SpawnFailed(String),

    /// Failed to set or query the window size
    #[error("failed to set window size: {0}")]
    WindowSize(String),
}

/// Result type for PTY operations
pub type Result<T> = std::result::Result<T, Error>;
