// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Error types for the rendering engine.
//!
//! Capability-absence is not an error (the dispatcher simply falls back), so
//! the variants here are reserved for failures that cross a real boundary:
//! a bad fd at construction time, or a write that genuinely failed.

use std::io;

/// Errors that can surface from the rendering engine.
#[derive(Debug, thiserror::Error)]
pub enum TtyError {
    /// `init` was given a file descriptor that is not a tty.
    #[error("fd is not a tty")]
    NotATty,

    /// No terminfo entry could be resolved for the requested terminal name.
    #[error("no terminfo entry for {0:?}")]
    UnknownTerminal(String),

    /// A write to the buffered output sink failed.
    #[error("terminal write failed: {0}")]
    Write(#[source] io::Error),

    /// Installing or restoring raw termios mode failed.
    #[error("termios operation failed: {0}")]
    Termios(#[source] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TtyError>;
