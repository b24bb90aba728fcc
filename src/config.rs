// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Per-terminal configuration resolved by the host before construction.
//!
//! This plays the role the original multiplexer's global option store plays
//! for the `tty` subsystem, narrowed to exactly the knobs this engine reads.
//! The host is responsible for turning its own config file / CLI flags /
//! environment into one of these; this crate has no opinion on where the
//! values come from.

/// Forces colour handling independent of what the terminfo entry advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColourOverride {
    /// Force 256-colour output even if the terminfo entry claims fewer.
    pub force_256: bool,
    /// Force 24-bit (true-colour) output even if the terminfo entry lacks `Tc`/`RGB`.
    pub force_true_colour: bool,
    /// Force treating `AX` (default-colour support) as absent.
    pub force_no_default_colours: bool,
}

/// Configuration supplied when constructing a [`crate::Terminal`].
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// The terminal type to resolve from the terminfo database (`$TERM` if empty).
    pub term_name: Option<String>,
    /// Colour-capability overrides.
    pub colour_override: ColourOverride,
    /// Whether to request focus-in/focus-out reporting on `start`.
    pub focus_events: bool,
    /// If set, every emitted byte is teed to this file as well.
    pub debug_log_path: Option<std::path::PathBuf>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            term_name: None,
            colour_override: ColourOverride::default(),
            focus_events: false,
            debug_log_path: None,
        }
    }
}
