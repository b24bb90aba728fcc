// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Test fixtures: an in-memory sink and a capability-table helper for
//! deterministic tests, without needing a real pty.
//!
//! `terminfo`'s `Database` has no public in-memory/from-bytes constructor
//! exercised anywhere in the reference corpus, so rather than reach for an
//! unverifiable API this resolves real, near-universally-installed
//! terminfo entries (`xterm-256color`, `screen`) by name instead of
//! synthesizing one. That keeps capability-dependent tests honest about
//! what they're exercising, at the cost of depending on the host having a
//! terminfo database at all — true of essentially every CI image and dev
//! machine this crate will run on.

use std::io::Write;

use rustix::fd::{AsFd, BorrowedFd};

use crate::capability::Capabilities;

/// Resolve capabilities for a widely available terminal type, for use in
/// tests that need a real [`Capabilities`] rather than a hand-duplicated
/// predicate.
///
/// # Panics
///
/// Panics if no terminfo entry for `name` is installed. Callers should
/// prefer `"xterm-256color"` unless exercising a narrower capability set.
#[must_use]
pub fn test_capabilities(name: &str) -> Capabilities {
    Capabilities::resolve(Some(name)).unwrap_or_else(|e| panic!("no terminfo entry for {name:?}: {e}"))
}

/// Force the `Ms` (set-selection) capability on or off on an already
/// resolved [`Capabilities`]. `Ms` is a tmux/screen terminfo extension that
/// essentially no stock-installed terminal type defines, so tests that need
/// to exercise both the present and absent branches can't just pick a
/// different `$TERM` name the way they do for every other capability here.
#[must_use]
pub fn with_set_selection(mut caps: Capabilities, present: bool) -> Capabilities {
    caps.set_ms_override(present);
    caps
}

/// An in-memory stand-in for a real terminal fd. Buffers every byte
/// written to it so a test can assert on the exact sequence emitted.
///
/// `AsFd` is only required to satisfy the engine's `W: AsFd + Write`
/// bound; nothing in this crate's write path dereferences the fd it
/// returns, so it borrows stdout's purely as a type-correct placeholder.
pub struct MockSink {
    buf: Vec<u8>,
}

impl MockSink {
    #[must_use]
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    #[must_use]
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.buf)
    }
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MockSink {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl AsFd for MockSink {
    fn as_fd(&self) -> BorrowedFd<'_> {
        std::io::stdout().as_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_sink_collects_written_bytes() {
        let mut sink = MockSink::new();
        sink.write_all(b"\x1b[2J").unwrap();
        assert_eq!(sink.bytes(), b"\x1b[2J");
    }

    #[test]
    fn resolves_xterm_256color() {
        let caps = test_capabilities("xterm-256color");
        assert!(caps.colours() >= 256);
    }
}
