// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Bitset types shadowed by the engine: per-cell attributes, terminal modes,
//! and terminal/engine flags.

use bitflags::bitflags;

bitflags! {
    /// Attribute bits carried by a [`crate::cell::GridCell`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellAttr: u16 {
        const BRIGHT      = 1 << 0;
        const DIM         = 1 << 1;
        const ITALICS     = 1 << 2;
        const UNDERSCORE  = 1 << 3;
        const BLINK       = 1 << 4;
        const REVERSE     = 1 << 5;
        const HIDDEN      = 1 << 6;
        const CHARSET     = 1 << 7;
        const PADDING     = 1 << 8;
        const SELECTED    = 1 << 9;
    }
}

bitflags! {
    /// Terminal mode bits shadowed on [`crate::terminal::Terminal`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Mode: u16 {
        const CURSOR         = 1 << 0;
        const BLINKING       = 1 << 1;
        const KKEYPAD        = 1 << 2;
        const BRACKETPASTE   = 1 << 3;
        const MOUSE_STANDARD = 1 << 4;
        const MOUSE_BUTTON   = 1 << 5;
        const MOUSE_ANY      = 1 << 6;
        const FOCUS          = 1 << 7;
    }
}

impl Mode {
    /// Any mouse-tracking mode at all.
    pub const ALL_MOUSE: Mode =
        Mode::from_bits_truncate(Mode::MOUSE_STANDARD.bits() | Mode::MOUSE_BUTTON.bits() | Mode::MOUSE_ANY.bits());
}

bitflags! {
    /// Engine-internal state flags, distinct from terminal modes: these are
    /// about the engine's lifecycle and transient suppression, not anything
    /// reported back by the terminal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TtyFlags: u16 {
        const OPENED           = 1 << 0;
        const STARTED          = 1 << 1;
        const NOCURSOR         = 1 << 2;
        const FREEZE           = 1 << 3;
        const UTF8             = 1 << 4;
        const FOCUS            = 1 << 5;
        const TIMER            = 1 << 6;
    }
}
