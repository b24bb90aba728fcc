// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Buffered output sink: the one place that writes bytes at the real
//! terminal file descriptor, tees them to an optional debug log, and
//! retries past transient `EAGAIN`.

use std::{
    io::{self, Write},
    time::Duration,
};

use rustix::fd::AsFd;

use crate::error::{Result, TtyError};

/// Buffered wrapper around a terminal file descriptor.
///
/// Everything the engine emits goes through [`Sink::write_all`]. Normal
/// operation buffers into `pending` and relies on the caller to flush at
/// sensible points (end of redraw); [`Sink::write_raw`] bypasses buffering
/// entirely for bytes that must land immediately (the handful of sequences
/// `tty_raw` sends during teardown, where the fd is about to be restored to
/// cooked mode and there is no later flush to rely on).
pub struct Sink<W: AsFd + Write> {
    out: W,
    pending: Vec<u8>,
    debug_log: Option<std::fs::File>,
}

impl<W: AsFd + Write> Sink<W> {
    pub fn new(out: W, debug_log: Option<std::fs::File>) -> Self {
        Self { out, pending: Vec::with_capacity(4096), debug_log }
    }

    /// Buffer bytes for the next [`Sink::flush`].
    pub fn write_all(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.pending.extend_from_slice(bytes);
    }

    /// Flush buffered bytes to the real fd, tee'ing to the debug log first.
    pub fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        if let Some(log) = self.debug_log.as_mut() {
            let _ = log.write_all(&self.pending);
        }
        let result = self.out.write_all(&self.pending).map_err(TtyError::Write);
        self.pending.clear();
        result
    }

    /// Write immediately, retrying past `EAGAIN` up to five attempts with a
    /// short sleep between each, same budget the original synchronous write
    /// path used. Used only for teardown sequences issued right before the
    /// fd is handed back to cooked mode.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        if let Some(log) = self.debug_log.as_mut() {
            let _ = log.write_all(bytes);
        }
        let mut remaining = bytes;
        for _ in 0..5 {
            match self.out.write(remaining) {
                Ok(n) if n >= remaining.len() => return,
                Ok(n) => remaining = &remaining[n..],
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
                Err(e) => {
                    tracing::debug!(error = %e, "raw write failed, giving up");
                    return;
                }
            }
            std::thread::sleep(Duration::from_micros(100));
        }
        tracing::debug!(left = remaining.len(), "raw write exhausted retries");
    }

    pub fn inner(&self) -> &W {
        &self.out
    }

    pub fn inner_mut(&mut self) -> &mut W {
        &mut self.out
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rustix::fd::{AsFd, BorrowedFd};

    use super::Sink;

    /// `Cursor<Vec<u8>>` doesn't own a real fd; wrap it so `Sink<W>`'s
    /// `AsFd` bound is satisfiable in tests without touching a real
    /// terminal. Borrows stdout's fd only as a placeholder value — no test
    /// here ever calls `write_raw`/`AsFd` methods that dereference it.
    struct MemSink(Cursor<Vec<u8>>);

    impl std::io::Write for MemSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.write(buf)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            self.0.flush()
        }
    }

    impl AsFd for MemSink {
        fn as_fd(&self) -> BorrowedFd<'_> {
            std::io::stdout().as_fd()
        }
    }

    #[test]
    fn buffers_until_flush() {
        let mut sink = Sink::new(MemSink(Cursor::new(Vec::new())), None);
        sink.write_all(b"hello ");
        sink.write_all(b"world");
        assert!(sink.inner().0.get_ref().is_empty());
        sink.flush().unwrap();
        assert_eq!(sink.inner().0.get_ref(), b"hello world");
    }

    #[test]
    fn empty_write_is_noop() {
        let mut sink = Sink::new(MemSink(Cursor::new(Vec::new())), None);
        sink.write_all(b"");
        sink.flush().unwrap();
        assert!(sink.inner().0.get_ref().is_empty());
    }
}
