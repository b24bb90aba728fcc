// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Command-dispatcher conformance tests: capability/fallback matrix and
//! the pane/BCE guard invariants.

mod support;

use paneterm::{dispatch, mock::MockSink, Colour, CursorState, DispatchOutcome, Op, ShadowCell, Sink, TtyCtx};
use pretty_assertions::assert_eq;
use support::{TestPane, TestSource};

/// `insertline` on a pane narrower than the physical terminal can never
/// use a scroll-region primitive (it would scroll the whole terminal
/// width, corrupting whatever sits beside the pane); the dispatcher must
/// fall back to asking the caller to redraw the region instead.
#[test]
fn insert_line_on_non_full_width_pane_requests_redraw_not_csr() {
    let caps = paneterm::mock::test_capabilities("xterm-256color");
    let mut sink = Sink::new(MockSink::new(), None);
    let mut cursor = CursorState::new(80, 24);
    let mut shadow = ShadowCell::default();
    let mut pane = TestPane::new(40, 24);
    let source = TestSource::blank(40, 24);

    let ctx = TtyCtx::pane_relative(0, 0, 0, 3, 0, 5);
    let outcome = dispatch(
        &mut sink,
        &caps,
        &mut cursor,
        false,
        true,
        &mut shadow,
        &mut pane,
        &source,
        &ctx,
        &Op::InsertLine(2),
    );
    sink.flush().unwrap();

    assert_eq!(outcome, DispatchOutcome::RedrawRequested);
    assert_eq!(pane.redraw_requests, vec![(0, 5)]);
    assert!(sink.inner().bytes().is_empty(), "non-full-width pane must never emit a CSR-based primitive");
}

/// `clearendofline` against a pane whose background isn't the terminal
/// default, on a terminal lacking `bce`, must repaint with literal spaces
/// rather than `EL` (which would erase using the terminal's own default
/// background, not the pane's).
#[test]
fn clear_end_of_line_with_fake_bce_uses_spaces_not_el() {
    let caps = paneterm::mock::test_capabilities("ansi");
    assert!(!caps.has_bce(), "test assumes a bce-less terminal");

    let mut sink = Sink::new(MockSink::new(), None);
    let mut cursor = CursorState::new(80, 24);
    let mut shadow = ShadowCell::default();
    let mut pane = TestPane::new(80, 24);
    pane.defaults.bg = Colour::basic(1); // non-default pane background
    let source = TestSource::blank(80, 24);

    let ctx = TtyCtx::pane_relative(0, 0, 10, 0, 0, 23);
    let outcome = dispatch(
        &mut sink,
        &caps,
        &mut cursor,
        false,
        true,
        &mut shadow,
        &mut pane,
        &source,
        &ctx,
        &Op::ClearEndOfLine,
    );
    sink.flush().unwrap();

    assert_eq!(outcome, DispatchOutcome::Primitive);
    let out = sink.inner().bytes();
    assert!(!out.windows(3).any(|w| w == b"\x1b[K"), "EL must not be used when fake BCE is needed");
    assert_eq!(out.iter().filter(|&&b| b == b' ').count(), 70);
}

/// `clearcharacter` under the same fake-BCE condition must not use `ECH`
/// either, even though the terminal advertises it.
#[test]
fn clear_character_with_fake_bce_uses_spaces_not_ech() {
    let caps = paneterm::mock::test_capabilities("ansi");
    assert!(caps.has(paneterm::StdCap::EraseChars), "test assumes ech is advertised");

    let mut sink = Sink::new(MockSink::new(), None);
    let mut cursor = CursorState::new(80, 24);
    let mut shadow = ShadowCell::default();
    let mut pane = TestPane::new(80, 24);
    pane.defaults.bg = Colour::basic(2);
    let source = TestSource::blank(80, 24);

    let ctx = TtyCtx::pane_relative(0, 0, 0, 0, 0, 23);
    dispatch(
        &mut sink,
        &caps,
        &mut cursor,
        false,
        true,
        &mut shadow,
        &mut pane,
        &source,
        &ctx,
        &Op::ClearCharacter(5),
    );
    sink.flush().unwrap();

    // Cursor starts at (0,0), the move-to is a no-op, so the only bytes
    // emitted are five literal spaces from `repeat_space` — no `ECH`.
    assert_eq!(sink.inner().bytes(), b"     ");
}

/// An empty clipboard payload still produces a well-formed, zero-length
/// OSC 52 sequence, provided the terminal advertises `Ms`.
#[test]
fn set_selection_with_empty_payload_emits_empty_osc52() {
    let caps = paneterm::mock::with_set_selection(paneterm::mock::test_capabilities("xterm-256color"), true);
    let mut sink = Sink::new(MockSink::new(), None);
    let mut cursor = CursorState::new(80, 24);
    let mut shadow = ShadowCell::default();
    let mut pane = TestPane::new(80, 24);
    let source = TestSource::blank(80, 24);

    let ctx = TtyCtx::pane_relative(0, 0, 0, 0, 0, 23);
    let outcome = dispatch(
        &mut sink,
        &caps,
        &mut cursor,
        false,
        true,
        &mut shadow,
        &mut pane,
        &source,
        &ctx,
        &Op::SetSelection(Vec::new()),
    );
    sink.flush().unwrap();

    assert_eq!(outcome, DispatchOutcome::Primitive);
    assert_eq!(sink.inner().bytes(), b"\x1b]52;c;\x07");
}

/// Without `Ms` (true of essentially every real installed terminal type,
/// `xterm-256color` included), `setselection` must be a silent no-op rather
/// than emitting an OSC 52 sequence the terminal never asked for.
#[test]
fn set_selection_without_ms_capability_is_skipped() {
    let caps = paneterm::mock::test_capabilities("xterm-256color");
    assert!(!caps.has_set_selection(), "test assumes xterm-256color has no Ms");

    let mut sink = Sink::new(MockSink::new(), None);
    let mut cursor = CursorState::new(80, 24);
    let mut shadow = ShadowCell::default();
    let mut pane = TestPane::new(80, 24);
    let source = TestSource::blank(80, 24);

    let ctx = TtyCtx::pane_relative(0, 0, 0, 0, 0, 23);
    let outcome = dispatch(
        &mut sink,
        &caps,
        &mut cursor,
        false,
        true,
        &mut shadow,
        &mut pane,
        &source,
        &ctx,
        &Op::SetSelection(b"clipboard contents".to_vec()),
    );
    sink.flush().unwrap();

    assert_eq!(outcome, DispatchOutcome::Skipped);
    assert!(sink.inner().bytes().is_empty(), "no bytes should be emitted without Ms");
}
