// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Cursor-movement cost/idempotence conformance tests.

use paneterm::{mock::MockSink, CellData, CursorState, GridCell, Sink};
use pretty_assertions::assert_eq;

/// Writing a wide (2-column) glyph at the last-but-one column pushes the
/// shadow column past the right edge; the next move must fall back to an
/// absolute `CUP`, since no relative primitive is valid from a
/// past-the-margin column.
#[test]
fn wide_glyph_at_right_edge_forces_absolute_move_next() {
    let caps = paneterm::mock::test_capabilities("ansi");
    let mut sink = Sink::new(MockSink::new(), None);
    let mut cursor = CursorState::new(80, 24);

    cursor.move_to(&mut sink, &caps, 78, 0);
    sink.flush().unwrap();
    assert_eq!(cursor.cx, 78);

    let wide = GridCell { data: CellData::Utf8("\u{4e2d}"), ..GridCell::blank() };
    paneterm::writer::put_cell(&mut sink, &caps, &mut cursor, false, true, &wide);
    assert_eq!(cursor.cx, 80);

    let mut sink2 = Sink::new(MockSink::new(), None);
    cursor.move_to(&mut sink2, &caps, 5, 0);
    sink2.flush().unwrap();

    // cup = \E[%i%p1%d;%p2%dH -> row/col 1-based.
    assert_eq!(sink2.inner().bytes(), b"\x1b[1;6H");
}

/// Requesting the same absolute position twice emits bytes only on the
/// first call.
#[test]
fn repeated_move_to_same_position_is_a_noop() {
    let caps = paneterm::mock::test_capabilities("ansi");
    let mut cursor = CursorState::new(80, 24);

    let mut first = Sink::new(MockSink::new(), None);
    cursor.move_to(&mut first, &caps, 10, 5);
    first.flush().unwrap();
    assert!(!first.inner().bytes().is_empty());

    let mut second = Sink::new(MockSink::new(), None);
    cursor.move_to(&mut second, &caps, 10, 5);
    second.flush().unwrap();
    assert!(second.inner().bytes().is_empty());
}

/// Requesting the same scroll region twice emits bytes only on the first
/// call. Needs a terminal advertising `csr`, which `ansi` lacks.
#[test]
fn repeated_set_region_same_bounds_is_a_noop() {
    let caps = paneterm::mock::test_capabilities("xterm-256color");
    let mut cursor = CursorState::new(80, 24);

    let mut first = Sink::new(MockSink::new(), None);
    cursor.set_region(&mut first, &caps, 2, 20);
    first.flush().unwrap();
    assert!(!first.inner().bytes().is_empty());

    let mut second = Sink::new(MockSink::new(), None);
    cursor.set_region(&mut second, &caps, 2, 20);
    second.flush().unwrap();
    assert!(second.inner().bytes().is_empty());
}
