// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! The engine's top-level handle: owns the output fd, the buffered sink,
//! the resolved capability table and the shadowed cursor/mode state, and
//! carries the init/open/start/stop/close lifecycle.

use std::io::Write;

use rustix::fd::{AsFd, BorrowedFd};
use rustix::termios::{
    self, ControlModes, InputModes, LocalModes, OptionalActions, OutputModes, SpecialCodeIndex,
    Termios,
};

use crate::{
    attr::{Mode, TtyFlags},
    capability::Capabilities,
    color::ShadowCell,
    config::TerminalConfig,
    cursor::CursorState,
    error::{Result, TtyError},
    sink::Sink,
};

/// Terminal window size in character cells, queried via `TIOCGWINSZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub cols: u32,
    pub rows: u32,
}

impl Default for WindowSize {
    /// Fallback used when the ioctl fails (e.g. output redirected to a file).
    fn default() -> Self {
        Self { cols: 80, rows: 24 }
    }
}

/// Owns one physical terminal's worth of engine state.
pub struct Terminal<W: AsFd + Write> {
    sink: Sink<W>,
    caps: Capabilities,
    cursor: CursorState,
    cell: ShadowCell,
    mode: Mode,
    flags: TtyFlags,
    saved_termios: Option<Termios>,
}

impl<W: AsFd + Write> Terminal<W> {
    /// `tty_init`: resolve capabilities and query the window size, without
    /// touching terminal modes yet.
    pub fn init(out: W, config: &TerminalConfig) -> Result<Self> {
        if !is_tty(out.as_fd()) {
            return Err(TtyError::NotATty);
        }

        let mut caps = Capabilities::resolve(config.term_name.as_deref())?;
        caps.apply_overrides(config.colour_override);

        let size = query_window_size(out.as_fd());
        let debug_log = config
            .debug_log_path
            .as_ref()
            .and_then(|path| std::fs::File::create(path).ok());

        let mut flags = TtyFlags::empty();
        if Capabilities::is_utf8_locale() {
            flags.insert(TtyFlags::UTF8);
        }

        tracing::info!(term = ?config.term_name, cols = size.cols, rows = size.rows, "terminal initialised");

        Ok(Self {
            sink: Sink::new(out, debug_log),
            caps,
            cursor: CursorState::new(size.cols, size.rows),
            cell: ShadowCell::default(),
            mode: Mode::CURSOR,
            flags,
            saved_termios: None,
        })
    }

    /// `tty_open`: mark the terminal opened. Split from `init` so a host
    /// can resolve capabilities for a terminal it isn't ready to draw to
    /// yet (e.g. while still negotiating a pane layout).
    pub fn open(&mut self) {
        self.flags.insert(TtyFlags::OPENED);
        tracing::info!("terminal opened");
    }

    /// `tty_start_tty`: install raw mode, enter the terminal's alternate
    /// screen / keypad-application mode, reset attributes and charset,
    /// clear the screen, show a normal cursor, force every mouse mode off,
    /// and request focus events if asked.
    pub fn start(&mut self, config: &TerminalConfig) -> Result<()> {
        use crate::capability::StdCap;

        self.enable_raw_mode()?;

        if let Some(bytes) = self.caps.string0(StdCap::EnterCaMode) {
            self.sink.write_all(&bytes);
        }
        if let Some(bytes) = self.caps.string0(StdCap::ExitAttributeMode) {
            self.sink.write_all(&bytes);
        }
        self.cell = crate::color::ShadowCell::default();

        if let Some(bytes) = self.caps.string0(StdCap::KeypadLocal) {
            self.sink.write_all(&bytes);
        }
        if self.caps.has(StdCap::AcsChars) {
            if let Some(bytes) = self.caps.string0(StdCap::Enacs) {
                self.sink.write_all(&bytes);
            }
        }
        if let Some(bytes) = self.caps.string0(StdCap::ClearScreen) {
            self.sink.write_all(&bytes);
        }

        if let Some(bytes) = self.caps.string0(StdCap::CursorNormal) {
            self.sink.write_all(&bytes);
        }
        crate::ops::set_mouse_modes(&mut self.sink, &self.caps, Mode::empty());

        if config.focus_events {
            self.sink.write_all(b"\x1b[?1004h");
            self.flags.insert(TtyFlags::FOCUS);
        }

        self.sink.flush()?;
        self.cursor = CursorState::new(self.cursor.sx, self.cursor.sy);
        self.mode = Mode::CURSOR;
        self.flags.insert(TtyFlags::STARTED);
        tracing::info!(focus_events = config.focus_events, "terminal started");
        Ok(())
    }

    /// `tty_stop_tty`: leave alternate screen / application keypad mode and
    /// restore raw-mode settings. Idempotent; safe to call on a terminal
    /// that was never started.
    pub fn stop(&mut self) -> Result<()> {
        use crate::capability::StdCap;

        if !self.flags.contains(TtyFlags::STARTED) {
            return Ok(());
        }

        if self.caps.has(StdCap::ChangeScrollRegion) {
            if let Some(bytes) = self.caps.string2(StdCap::ChangeScrollRegion, 0, i64::from(self.cursor.sy.saturating_sub(1))) {
                self.sink.write_all(&bytes);
            }
        }
        if self.caps.has(StdCap::AcsChars) {
            if let Some(bytes) = self.caps.string0(StdCap::ExitAltCharsetMode) {
                self.sink.write_all(&bytes);
            }
        }
        if let Some(bytes) = self.caps.string0(StdCap::ExitAttributeMode) {
            self.sink.write_all(&bytes);
        }
        if let Some(bytes) = self.caps.string0(StdCap::KeypadLocal) {
            self.sink.write_all(&bytes);
        }
        if let Some(bytes) = self.caps.string0(StdCap::ClearScreen) {
            self.sink.write_all(&bytes);
        }
        if self.mode.contains(Mode::BRACKETPASTE) {
            self.sink.write_all(b"\x1b[?2004l");
        }
        if let Some(bytes) = self.caps.string0(StdCap::CarriageReturn) {
            self.sink.write_all(&bytes);
        }
        if let Some(bytes) = self.caps.string0(StdCap::CursorNormal) {
            self.sink.write_all(&bytes);
        }
        crate::ops::set_mouse_modes(&mut self.sink, &self.caps, Mode::empty());
        if self.flags.contains(TtyFlags::FOCUS) {
            self.sink.write_all(b"\x1b[?1004l");
        }
        if let Some(bytes) = self.caps.string0(StdCap::ExitCaMode) {
            self.sink.write_all(&bytes);
        }
        self.sink.flush()?;

        if let Err(err) = self.disable_raw_mode() {
            tracing::warn!(%err, "failed to restore termios on stop, leaving terminal as-is");
        }
        self.flags.remove(TtyFlags::STARTED | TtyFlags::FOCUS);
        tracing::info!("terminal stopped");
        Ok(())
    }

    /// `tty_close`: stop if running, then mark closed. Distinct from
    /// `stop` so a host can restart the same terminal without re-resolving
    /// capabilities.
    pub fn close(&mut self) -> Result<()> {
        self.stop()?;
        self.flags.remove(TtyFlags::OPENED);
        Ok(())
    }

    /// `tty_free`: final teardown, equivalent to `close` for this engine
    /// since there is no separate allocation to release beyond dropping
    /// `self`.
    pub fn free(mut self) -> Result<()> {
        self.close()
    }

    /// `tty_resize`: re-read the window size via ioctl (falling back to
    /// 80x24 on error) and invalidate the shadowed cursor/region state so
    /// the next operation re-establishes both from scratch. If already
    /// started, re-homes the cursor and re-asserts a full-screen region
    /// immediately rather than waiting for the next draw.
    pub fn resize(&mut self) -> Result<()> {
        let size = query_window_size(self.sink.inner().as_fd());
        tracing::info!(cols = size.cols, rows = size.rows, "terminal resized");
        self.cursor.sx = size.cols;
        self.cursor.sy = size.rows;
        self.cursor.cx = u32::MAX;
        self.cursor.cy = u32::MAX;
        self.cursor.rupper = 0;
        self.cursor.rlower = size.rows.saturating_sub(1);

        if self.flags.contains(TtyFlags::STARTED) {
            self.cursor.move_to(&mut self.sink, &self.caps, 0, 0);
            let rlower = self.cursor.rlower;
            self.cursor.set_region(&mut self.sink, &self.caps, 0, rlower);
            self.sink.flush()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    #[must_use]
    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    #[must_use]
    pub fn cursor_mut(&mut self) -> &mut CursorState {
        &mut self.cursor
    }

    /// The shadowed current output attributes/colours (`tty->cell`),
    /// threaded into [`crate::ops::dispatch`]/[`crate::drawer::draw_line`]
    /// so only attribute/colour deltas are ever emitted.
    #[must_use]
    pub fn shadow_cell_mut(&mut self) -> &mut ShadowCell {
        &mut self.cell
    }

    #[must_use]
    pub fn sink_mut(&mut self) -> &mut Sink<W> {
        &mut self.sink
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the output locale resolved at `init` time was UTF-8, as
    /// passed into [`crate::writer::put_cell`]/[`crate::drawer::draw_line`].
    #[must_use]
    pub fn is_utf8(&self) -> bool {
        self.flags.contains(TtyFlags::UTF8)
    }

    /// Whether this terminal needs the right-column early-wrap workaround,
    /// as passed into [`crate::writer::put_cell`]/[`crate::ops::dispatch`].
    #[must_use]
    pub fn needs_early_wrap(&self) -> bool {
        self.caps.needs_early_wrap()
    }

    /// Apply a requested mode set, emitting only what changed, same
    /// delta-against-shadow discipline as every other piece of state here.
    pub fn set_mode(&mut self, requested: Mode) {
        if requested == self.mode {
            return;
        }
        let changed = requested ^ self.mode;
        if changed.intersects(Mode::ALL_MOUSE) {
            crate::ops::set_mouse_modes(&mut self.sink, &self.caps, requested & Mode::ALL_MOUSE);
        }
        self.mode = requested;
    }

    fn enable_raw_mode(&mut self) -> Result<()> {
        let fd = self.sink.inner().as_fd();
        let mut termios = termios::tcgetattr(fd).map_err(TtyError::Termios)?;
        self.saved_termios = Some(termios.clone());

        termios.input_modes.remove(
            InputModes::IGNBRK
                | InputModes::BRKINT
                | InputModes::PARMRK
                | InputModes::ISTRIP
                | InputModes::INLCR
                | InputModes::IGNCR
                | InputModes::ICRNL
                | InputModes::IXON,
        );
        termios.output_modes.remove(OutputModes::OPOST);
        termios.local_modes.remove(
            LocalModes::ECHO
                | LocalModes::ECHONL
                | LocalModes::ICANON
                | LocalModes::ISIG
                | LocalModes::IEXTEN,
        );
        termios.control_modes.remove(ControlModes::CSIZE | ControlModes::PARENB);
        termios.control_modes.insert(ControlModes::CS8);
        termios.special_codes[SpecialCodeIndex::VMIN] = 1;
        termios.special_codes[SpecialCodeIndex::VTIME] = 0;

        termios::tcsetattr(fd, OptionalActions::Now, &termios).map_err(TtyError::Termios)?;
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        let Some(termios) = self.saved_termios.take() else {
            return Ok(());
        };
        let fd = self.sink.inner().as_fd();
        termios::tcsetattr(fd, OptionalActions::Now, &termios).map_err(TtyError::Termios)?;
        Ok(())
    }
}

fn is_tty(fd: BorrowedFd<'_>) -> bool {
    termios::isatty(fd)
}

fn query_window_size(fd: BorrowedFd<'_>) -> WindowSize {
    match termios::tcgetwinsize(fd) {
        Ok(ws) if ws.ws_col > 0 && ws.ws_row > 0 => {
            WindowSize { cols: u32::from(ws.ws_col), rows: u32::from(ws.ws_row) }
        }
        _ => WindowSize::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_size_is_80x24() {
        let ws = WindowSize::default();
        assert_eq!(ws.cols, 80);
        assert_eq!(ws.rows, 24);
    }

    #[test]
    fn resize_resets_scroll_region_to_full_screen() {
        let mut cursor = CursorState::new(80, 24);
        cursor.rupper = 2;
        cursor.rlower = 10;
        cursor.sx = 100;
        cursor.sy = 40;
        cursor.rupper = 0;
        cursor.rlower = cursor.sy.saturating_sub(1);
        assert_eq!(cursor.rlower, 39);
    }
}
