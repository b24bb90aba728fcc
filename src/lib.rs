// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! A capability-driven terminal rendering engine: shadow cursor/attribute/
//! colour state, cost-based cursor movement, and a tagged-enum operation
//! dispatcher sitting over a resolved terminfo entry.
//!
//! The host owns the pane/window tree and grid storage; this crate only
//! needs two small collaborator traits ([`cell::PaneContext`],
//! [`cell::GridSource`]) to clip, offset, and redraw against it.

pub mod attr;
pub mod capability;
pub mod cell;
pub mod color;
pub mod config;
pub mod ctx;
pub mod cursor;
pub mod drawer;
pub mod error;
pub mod ops;
pub mod sink;
pub mod terminal;
pub mod writer;

/// Test fixtures usable both by this crate's own unit tests and by
/// downstream integration tests under `tests/`.
pub mod mock;

pub use attr::{CellAttr, Mode, TtyFlags};
pub use capability::{Capabilities, StdCap};
pub use cell::{CellData, DefaultColours, GridCell, GridSource, PaneContext};
pub use color::{apply_cell, Colour, ShadowCell};
pub use config::{ColourOverride, TerminalConfig};
pub use cursor::CursorState;
pub use ctx::TtyCtx;
pub use error::{Result, TtyError};
pub use ops::{dispatch, DispatchOutcome, Op};
pub use sink::Sink;
pub use terminal::{Terminal, WindowSize};
