// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Line/pane drawer: repaints one row of a pane cell-by-cell.
//!
//! Grounded on `tty_draw_line`: suppress the cursor during the redraw (so
//! a mid-scroll terminal doesn't show a half-painted line), skip the
//! initial cursor move when the line will land there by natural wrap
//! anyway, and at end of line either use `EL` or repeat spaces depending
//! on BCE availability.

use rustix::fd::AsFd;

use crate::{
    capability::{Capabilities, StdCap},
    cell::{DefaultColours, GridSource, PaneContext},
    color::{apply_cell, ShadowCell},
    cursor::CursorState,
    sink::Sink,
    writer::put_cell,
};

/// `tty_fake_bce`: the terminal needs background-colour-erase emulation
/// because either it lacks `bce` outright, or the pane's own default
/// background isn't the terminal default (so even with `bce` a clear would
/// paint the wrong colour).
#[must_use]
pub fn fake_bce(caps: &Capabilities, defaults: DefaultColours) -> bool {
    if defaults.bg.is_default() {
        return false;
    }
    !caps.has_bce()
}

/// Redraw row `py` of `source` into the pane at `(ox, oy)` within the
/// physical terminal, clipped to `sx` columns.
#[allow(clippy::too_many_arguments)]
pub fn draw_line<W: AsFd + std::io::Write, P: PaneContext, S: GridSource>(
    sink: &mut Sink<W>,
    caps: &Capabilities,
    cursor: &mut CursorState,
    early_wrap: bool,
    utf8: bool,
    shadow: &mut ShadowCell,
    pane: &mut P,
    source: &S,
    py: u32,
    ox: u32,
    oy: u32,
) {
    let mut sx = pane.sx();
    sx = sx.min(source.row_len(py)).min(cursor.sx);

    let skip_initial_move = py != 0
        && source.previous_line_wrapped(py)
        && cursor.cx >= cursor.sx
        && ox == 0
        && !(oy + py != cursor.cy + 1 && cursor.cy != cursor.rlower + oy);

    if !skip_initial_move {
        cursor.move_to(sink, caps, ox, oy + py);
    }

    let colours = caps.colours();
    let defaults = pane.default_colours();
    for x in 0..sx {
        let cell = source.cell(x, py);
        apply_cell(sink, caps, colours, shadow, defaults, cell.fg, cell.bg, cell.attr);
        put_cell(sink, caps, cursor, early_wrap, utf8, &cell);
    }

    if sx < pane.sx() {
        cursor.move_to(sink, caps, ox + sx, oy + py);

        let term_full_width = ox + pane.sx() >= cursor.sx;
        if sx != pane.sx() && term_full_width && caps.has(StdCap::ClrEol) && !fake_bce(caps, defaults) {
            if let Some(bytes) = caps.string0(StdCap::ClrEol) {
                sink.write_all(&bytes);
            }
        } else {
            repeat_space(sink, cursor, pane.sx() - sx);
        }
    }
}

/// `tty_repeat_space`: write `n` literal spaces, advancing the cursor.
pub fn repeat_space<W: AsFd + std::io::Write>(sink: &mut Sink<W>, cursor: &mut CursorState, n: u32) {
    for _ in 0..n {
        sink.write_all(b" ");
    }
    cursor.cx += n;
}

/// `tty_emulate_repeat`: use the counted primitive if present, else repeat
/// the single-unit primitive `n` times.
pub fn emulate_repeat<W: AsFd + std::io::Write>(
    sink: &mut Sink<W>,
    caps: &Capabilities,
    counted: StdCap,
    single: StdCap,
    n: u32,
) {
    if caps.has(counted) {
        if let Some(bytes) = caps.string1(counted, i64::from(n)) {
            sink.write_all(&bytes);
        }
        return;
    }
    if let Some(bytes) = caps.string0(single) {
        for _ in 0..n {
            sink.write_all(&bytes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Colour;

    #[test]
    fn fake_bce_is_false_when_pane_background_is_default() {
        let defaults = DefaultColours { fg: Colour::default_colour(), bg: Colour::default_colour() };
        // With a default background, BCE emulation is never needed
        // regardless of what the terminal advertises.
        assert!(!fake_bce_pure(defaults, false));
        assert!(!fake_bce_pure(defaults, true));
    }

    fn fake_bce_pure(defaults: DefaultColours, has_bce: bool) -> bool {
        if defaults.bg.is_default() {
            return false;
        }
        !has_bce
    }
}
