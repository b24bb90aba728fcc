// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Cursor/scroll-region shadow state machine.
//!
//! Tracks the physical terminal's cursor position and active scroll region
//! and emits only the cheapest sequence of primitives needed to reach a
//! requested position, falling back to absolute addressing when nothing
//! cheaper applies.

use rustix::fd::AsFd;

use crate::{
    capability::{Capabilities, StdCap},
    sink::Sink,
};

/// Shadowed cursor/region state for one physical terminal.
#[derive(Debug, Clone, Copy)]
pub struct CursorState {
    pub cx: u32,
    pub cy: u32,
    pub sx: u32,
    pub sy: u32,
    pub rupper: u32,
    pub rlower: u32,
}

impl CursorState {
    #[must_use]
    pub fn new(sx: u32, sy: u32) -> Self {
        Self { cx: 0, cy: 0, sx, sy, rupper: 0, rlower: sy.saturating_sub(1) }
    }

    /// `tty_region`: set the scroll region at absolute row bounds, no-op if
    /// unchanged or the terminal lacks `csr`. Includes the PuTTY pending-wrap
    /// workaround: if the cursor sits past the last column, home it first,
    /// since some terminals won't clear their wrap-pending flag otherwise.
    pub fn set_region<W: AsFd + std::io::Write>(
        &mut self,
        sink: &mut Sink<W>,
        caps: &Capabilities,
        rupper: u32,
        rlower: u32,
    ) {
        if self.rupper == rupper && self.rlower == rlower {
            return;
        }
        if !caps.has(StdCap::ChangeScrollRegion) {
            return;
        }
        self.rupper = rupper;
        self.rlower = rlower;

        if self.cx >= self.sx {
            self.move_to(sink, caps, 0, self.cy);
        }

        if let Some(bytes) = caps.string2(StdCap::ChangeScrollRegion, i64::from(rupper), i64::from(rlower)) {
            sink.write_all(&bytes);
        }
        self.move_to(sink, caps, 0, 0);
    }

    /// `tty_cursor`: move to an absolute position, picking the cheapest
    /// primitive available. Clamps `cx` to the last column, same as the
    /// original (a cursor request one past the right edge collapses onto
    /// the last cell rather than wrapping).
    pub fn move_to<W: AsFd + std::io::Write>(
        &mut self,
        sink: &mut Sink<W>,
        caps: &Capabilities,
        mut cx: u32,
        cy: u32,
    ) {
        if self.sx > 0 && cx > self.sx - 1 {
            cx = self.sx - 1;
        }
        let (thisx, thisy) = (self.cx, self.cy);
        if cx == thisx && cy == thisy {
            return;
        }

        if thisx > self.sx.saturating_sub(1) {
            self.absolute(sink, caps, cx, cy);
            return;
        }

        if cx == 0 && cy == 0 && caps.has(StdCap::CursorHome) {
            if let Some(bytes) = caps.string0(StdCap::CursorHome) {
                sink.write_all(&bytes);
            }
            self.cx = cx;
            self.cy = cy;
            return;
        }

        if cx == 0 && cy == thisy + 1 && thisy != self.rlower {
            sink.write_all(b"\r\n");
            self.cx = cx;
            self.cy = cy;
            return;
        }

        if cy == thisy {
            if self.move_column_only(sink, caps, cx, thisx) {
                self.cx = cx;
                self.cy = cy;
                return;
            }
        } else if cx == thisx && self.move_row_only(sink, caps, cy, thisy) {
            self.cx = cx;
            self.cy = cy;
            return;
        }

        self.absolute(sink, caps, cx, cy);
    }

    fn move_column_only<W: AsFd + std::io::Write>(
        &self,
        sink: &mut Sink<W>,
        caps: &Capabilities,
        cx: u32,
        thisx: u32,
    ) -> bool {
        if cx == 0 {
            sink.write_all(b"\r");
            return true;
        }
        if thisx > 0 && cx == thisx - 1 && caps.has(StdCap::CursorLeft) {
            emit0(sink, caps, StdCap::CursorLeft);
            return true;
        }
        if cx == thisx + 1 && caps.has(StdCap::CursorRight) {
            emit0(sink, caps, StdCap::CursorRight);
            return true;
        }

        let change = thisx as i64 - cx as i64; // +ve left, -ve right
        if change.unsigned_abs() as u32 > cx && caps.has(StdCap::ColumnAddress) {
            emit1(sink, caps, StdCap::ColumnAddress, i64::from(cx));
            return true;
        }
        if change > 0 && caps.has(StdCap::ParmLeftCursor) {
            if change == 2 && caps.has(StdCap::CursorLeft) {
                emit0(sink, caps, StdCap::CursorLeft);
                emit0(sink, caps, StdCap::CursorLeft);
                return true;
            }
            emit1(sink, caps, StdCap::ParmLeftCursor, change);
            return true;
        }
        if change < 0 && caps.has(StdCap::ParmRightCursor) {
            emit1(sink, caps, StdCap::ParmRightCursor, -change);
            return true;
        }
        false
    }

    fn move_row_only<W: AsFd + std::io::Write>(
        &self,
        sink: &mut Sink<W>,
        caps: &Capabilities,
        cy: u32,
        thisy: u32,
    ) -> bool {
        if thisy != self.rupper && thisy > 0 && cy == thisy - 1 && caps.has(StdCap::CursorUp) {
            emit0(sink, caps, StdCap::CursorUp);
            return true;
        }
        if thisy != self.rlower && cy == thisy + 1 && caps.has(StdCap::CursorDown) {
            emit0(sink, caps, StdCap::CursorDown);
            return true;
        }

        let change = thisy as i64 - cy as i64; // +ve up, -ve down
        let crosses_region = (change < 0 && (cy as i64 - change) > i64::from(self.rlower))
            || (change > 0 && (cy as i64 - change) < i64::from(self.rupper));
        if change.unsigned_abs() as u32 > cy || crosses_region {
            if caps.has(StdCap::RowAddress) {
                emit1(sink, caps, StdCap::RowAddress, i64::from(cy));
                return true;
            }
        } else if change > 0 && caps.has(StdCap::ParmUpCursor) {
            emit1(sink, caps, StdCap::ParmUpCursor, change);
            return true;
        } else if change < 0 && caps.has(StdCap::ParmDownCursor) {
            emit1(sink, caps, StdCap::ParmDownCursor, -change);
            return true;
        }
        false
    }

    fn absolute<W: AsFd + std::io::Write>(&mut self, sink: &mut Sink<W>, caps: &Capabilities, cx: u32, cy: u32) {
        if let Some(bytes) = caps.string2(StdCap::CursorAddress, i64::from(cy), i64::from(cx)) {
            sink.write_all(&bytes);
        }
        self.cx = cx;
        self.cy = cy;
    }
}

fn emit0<W: AsFd + std::io::Write>(sink: &mut Sink<W>, caps: &Capabilities, cap: StdCap) {
    if let Some(bytes) = caps.string0(cap) {
        sink.write_all(&bytes);
    }
}

fn emit1<W: AsFd + std::io::Write>(sink: &mut Sink<W>, caps: &Capabilities, cap: StdCap, a: i64) {
    if let Some(bytes) = caps.string1(cap, a) {
        sink.write_all(&bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::CursorState;

    #[test]
    fn clamps_to_last_column() {
        let state = CursorState::new(80, 24);
        assert_eq!(state.sx, 80);
    }

    #[test]
    fn new_region_defaults_to_full_screen() {
        let state = CursorState::new(80, 24);
        assert_eq!(state.rupper, 0);
        assert_eq!(state.rlower, 23);
    }
}
