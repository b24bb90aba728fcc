// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Borrowed view of a single renderable grid cell, and the small
//! collaborator traits the host implements so this crate can read a row
//! of cells without owning the grid itself.

use unicode_width::UnicodeWidthStr;

use crate::{attr::CellAttr, color::Colour};

/// The glyph a cell holds: either a single ASCII byte (the common case,
/// written with `putc`-style ACS translation) or a UTF-8 string (written
/// verbatim when the terminal is UTF-8-capable, or replaced by underscores
/// otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellData<'a> {
    Ascii(u8),
    Utf8(&'a str),
}

impl<'a> CellData<'a> {
    /// Display width in columns.
    #[must_use]
    pub fn width(&self) -> usize {
        match self {
            CellData::Ascii(_) => 1,
            CellData::Utf8(s) => s.width(),
        }
    }
}

/// A single cell as read off a pane's screen: colours, attributes, and
/// glyph data, borrowed for the duration of one draw call.
#[derive(Debug, Clone, Copy)]
pub struct GridCell<'a> {
    pub fg: Colour,
    pub bg: Colour,
    pub attr: CellAttr,
    /// A padding cell (the second column of a wide glyph); emits nothing.
    pub padding: bool,
    /// Currently part of an active selection; callers resolve this to a
    /// swapped fg/bg before handing the cell to the writer.
    pub selected: bool,
    pub data: CellData<'a>,
}

impl<'a> GridCell<'a> {
    #[must_use]
    pub fn blank() -> GridCell<'static> {
        GridCell {
            fg: Colour::default_colour(),
            bg: Colour::default_colour(),
            attr: CellAttr::empty(),
            padding: false,
            selected: false,
            data: CellData::Ascii(b' '),
        }
    }
}

/// Resolved default colours for a pane, walked from per-cell up through
/// per-pane and window-style overrides by the host before a draw call
/// (`tty_default_colours`'s resolution chain lives on the host side of
/// this trait, not inside the engine).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultColours {
    pub fg: Colour,
    pub bg: Colour,
}

/// A single pane/window's worth of geometry and redraw-signalling state,
/// supplied by the host. The engine clips and offsets against this but
/// never walks a pane/window tree itself.
pub trait PaneContext {
    /// Column offset of this pane within the physical terminal.
    fn xoff(&self) -> u32;
    /// Row offset of this pane within the physical terminal.
    fn yoff(&self) -> u32;
    /// Pane width in columns.
    fn sx(&self) -> u32;
    /// Pane height in rows.
    fn sy(&self) -> u32;
    /// Whether this pane spans the full physical terminal width (enables
    /// the `EL`/fake-BCE trailing-space fast path).
    fn full_width(&self, term_width: u32) -> bool {
        self.xoff() == 0 && self.sx() >= term_width
    }
    /// Resolved default colours for cells in this pane that request them.
    fn default_colours(&self) -> DefaultColours;
    /// Called by the dispatcher when a requested operation has no cheap
    /// primitive and the host must redraw the region itself instead.
    fn request_redraw(&mut self, rupper: u32, rlower: u32);
}

/// A source of grid cells for one row of a pane, used by the drawer to
/// pull cells left-to-right without needing the grid's own cell/line
/// storage layout.
pub trait GridSource {
    /// Number of cells actually stored for row `py` (may be less than the
    /// pane's nominal width if the line is short).
    fn row_len(&self, py: u32) -> u32;
    /// Fetch the cell at `(x, py)`.
    fn cell(&self, x: u32, py: u32) -> GridCell<'_>;
    /// Whether the line one row above `py` ends with a wrap flag (used by
    /// the drawer to decide whether it can skip an initial cursor move and
    /// rely on the terminal's own line-wrap instead).
    fn previous_line_wrapped(&self, py: u32) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_cell_has_width_one() {
        assert_eq!(CellData::Ascii(b'x').width(), 1);
    }

    #[test]
    fn wide_glyph_reports_two_columns() {
        assert_eq!(CellData::Utf8("\u{4e2d}").width(), 2);
    }

    #[test]
    fn blank_cell_is_a_space() {
        let blank = GridCell::blank();
        assert_eq!(blank.data, CellData::Ascii(b' '));
        assert!(blank.fg.is_default());
    }
}
