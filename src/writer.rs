// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Cell writer: turns one [`GridCell`] into the bytes that represent it,
//! applying alternate-character-set translation and the UTF-8 fallback.

use rustix::fd::AsFd;

use crate::{
    capability::{Capabilities, StdCap},
    cell::{CellData, GridCell},
    cursor::CursorState,
    sink::Sink,
};

/// Write one cell's glyph data at the current cursor position, advancing
/// the shadowed column. Caller is responsible for having already emitted
/// any attribute/colour delta for this cell.
///
/// Mirrors `tty_cell`: a padding cell (the trailing half of a wide glyph)
/// writes nothing; the "early wrap" terminal quirk skips the very last
/// cell of the screen to avoid an unwanted autowrap; and non-UTF-8
/// terminals get underscores in place of any multi-byte glyph.
pub fn put_cell<W: AsFd + std::io::Write>(
    sink: &mut Sink<W>,
    caps: &Capabilities,
    cursor: &mut CursorState,
    early_wrap: bool,
    utf8: bool,
    cell: &GridCell<'_>,
) {
    if early_wrap && cursor.cy == cursor.sy.saturating_sub(1) && cursor.cx == cursor.sx.saturating_sub(1) {
        return;
    }
    if cell.padding {
        return;
    }

    match cell.data {
        CellData::Ascii(byte) => {
            if byte < 0x20 || byte == 0x7f {
                return;
            }
            put_ascii(sink, caps, cursor, early_wrap, cell.attr.contains(crate::attr::CellAttr::CHARSET), byte);
        }
        CellData::Utf8(s) => {
            if !utf8 {
                for _ in 0..cell.data.width() {
                    put_ascii(sink, caps, cursor, early_wrap, false, b'_');
                }
                return;
            }
            sink.write_all(s.as_bytes());
            cursor.cx += cell.data.width() as u32;
        }
    }
}

/// Writes one ASCII byte, translating it through the `acsc` alternate
/// character-set map first if the cell requests the line-drawing charset
/// and the terminal advertises one, then mirrors the terminal's own
/// autowrap (`tty_putc`): once the column we just wrote into was at or
/// past the last column, the *next* write lands at `cx=1` on the row
/// below instead of advancing normally, bounded at the scroll region's
/// lower edge.
pub(crate) fn put_ascii<W: AsFd + std::io::Write>(
    sink: &mut Sink<W>,
    caps: &Capabilities,
    cursor: &mut CursorState,
    early_wrap: bool,
    charset: bool,
    byte: u8,
) {
    if charset {
        if let Some(replacement) = acs_lookup(caps, byte) {
            sink.write_all(&replacement);
            advance_and_wrap(cursor, early_wrap);
            return;
        }
    }
    sink.write_all(&[byte]);
    advance_and_wrap(cursor, early_wrap);
}

fn advance_and_wrap(cursor: &mut CursorState, early_wrap: bool) {
    let sx = if early_wrap { cursor.sx.saturating_sub(1) } else { cursor.sx };
    if cursor.cx >= sx {
        cursor.cx = 1;
        if cursor.cy != cursor.rlower {
            cursor.cy += 1;
        }
    } else {
        cursor.cx += 1;
    }
}

/// Looks `byte` up in the `acsc` capability, a string of ASCII/replacement
/// byte pairs (e.g. `"``aaffgg"` maps `` ` `` to itself... `a` to a
/// replacement, and so on — the standard terminfo alternate-charset table
/// format).
fn acs_lookup(caps: &Capabilities, byte: u8) -> Option<Vec<u8>> {
    let table = caps.string0(StdCap::AcsChars)?;
    let mut pairs = table.chunks_exact(2);
    pairs.find(|pair| pair[0] == byte).map(|pair| vec![pair[1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_cell_advances_nothing() {
        let cell = GridCell { padding: true, ..GridCell::blank() };
        assert!(cell.padding);
    }

    #[test]
    fn printable_write_reaching_last_column_wraps_to_next_row() {
        let caps = crate::mock::test_capabilities("xterm-256color");
        let mut sink = Sink::new(crate::mock::MockSink::new(), None);
        let mut cursor = CursorState::new(4, 24);
        cursor.cx = 3;
        cursor.cy = 5;

        put_ascii(&mut sink, &caps, &mut cursor, false, false, b'x');

        assert_eq!(cursor.cx, 1);
        assert_eq!(cursor.cy, 6);
    }

    #[test]
    fn wrap_does_not_advance_past_the_scroll_region_lower_edge() {
        let caps = crate::mock::test_capabilities("xterm-256color");
        let mut sink = Sink::new(crate::mock::MockSink::new(), None);
        let mut cursor = CursorState::new(4, 24);
        cursor.cx = 3;
        cursor.cy = 10;
        cursor.rlower = 10;

        put_ascii(&mut sink, &caps, &mut cursor, false, false, b'x');

        assert_eq!(cursor.cx, 1);
        assert_eq!(cursor.cy, 10, "cy must not advance past rlower");
    }
}
