// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Per-operation parameter bundle handed to the dispatcher.
//!
//! The original multiplexer fills a `struct tty_ctx` borrowed from the
//! caller's stack for the duration of one command; here it's an owned
//! value, since Rust gives us no cheap equivalent to a borrow that outlives
//! the call that built it without threading a lifetime through every
//! dispatcher function.

/// Parameters for one pane-relative drawing operation.
#[derive(Debug, Clone, Copy)]
pub struct TtyCtx {
    /// Pane's column offset in the physical terminal.
    pub xoff: u32,
    /// Pane's row offset in the physical terminal.
    pub yoff: u32,
    /// Cursor column at the time the operation was queued, pane-relative.
    pub ocx: u32,
    /// Cursor row at the time the operation was queued, pane-relative.
    pub ocy: u32,
    /// Top of the pane's scroll region, pane-relative.
    pub orupper: u32,
    /// Bottom of the pane's scroll region, pane-relative.
    pub orlower: u32,
    /// Repeat count (characters/lines to insert or delete).
    pub num: u32,
    /// Set when a line feed occurred as a natural wrap rather than an
    /// explicit `\n`; lets the dispatcher skip emitting anything and rely
    /// on the terminal's own autowrap.
    pub wrapped: bool,
}

impl TtyCtx {
    #[must_use]
    pub fn pane_relative(xoff: u32, yoff: u32, ocx: u32, ocy: u32, orupper: u32, orlower: u32) -> Self {
        Self { xoff, yoff, ocx, ocy, orupper, orlower, num: 0, wrapped: false }
    }

    #[must_use]
    pub fn with_num(mut self, num: u32) -> Self {
        self.num = num;
        self
    }

    #[must_use]
    pub fn with_wrapped(mut self, wrapped: bool) -> Self {
        self.wrapped = wrapped;
        self
    }
}
