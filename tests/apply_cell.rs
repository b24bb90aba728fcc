// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Attribute/colour application (`apply_cell`) conformance tests.

use paneterm::{apply_cell, mock::MockSink, CellAttr, Colour, DefaultColours, ShadowCell, Sink};
use pretty_assertions::assert_eq;

/// Bright colour down-conversion: an 8-colour terminal (`ansi`) asked to
/// render 256-palette index 196 (pure red) should down-convert to the
/// bright-red base colour plus the `BRIGHT` attribute bit, not a plain
/// basic colour.
#[test]
fn bright_256_colour_downconverts_with_bold_and_setaf() {
    let caps = paneterm::mock::test_capabilities("ansi");
    assert_eq!(caps.colours(), 8, "test assumes an 8-colour terminal");

    let mut sink = Sink::new(MockSink::new(), None);
    let mut shadow = ShadowCell::default();
    let defaults = DefaultColours::default();

    apply_cell(
        &mut sink,
        &caps,
        caps.colours(),
        &mut shadow,
        defaults,
        Colour::palette256(196),
        Colour::default_colour(),
        CellAttr::empty(),
    );
    sink.flush().unwrap();

    let out = sink.inner().as_str();
    assert!(out.contains("\x1b[1m"), "expected bold escape, got {out:?}");
    assert!(out.contains("\x1b[31m"), "expected SETAF red escape, got {out:?}");
    assert_eq!(shadow.fg, Colour::basic(1));
    assert!(shadow.attr.contains(CellAttr::BRIGHT));
}

/// For cells whose resolved attributes/colours are unchanged from the
/// shadow, `apply_cell` must emit nothing at all.
#[test]
fn unchanged_cell_emits_nothing() {
    let caps = paneterm::mock::test_capabilities("ansi");
    let mut shadow = ShadowCell::default();
    let defaults = DefaultColours::default();

    // First call: default colours against a freshly-defaulted shadow is
    // already a no-op (nothing to move away from).
    let mut warm_up = Sink::new(MockSink::new(), None);
    apply_cell(
        &mut warm_up,
        &caps,
        caps.colours(),
        &mut shadow,
        defaults,
        Colour::default_colour(),
        Colour::default_colour(),
        CellAttr::empty(),
    );
    warm_up.flush().unwrap();
    assert!(warm_up.inner().bytes().is_empty());

    // Repeating the exact same request must still emit nothing.
    let mut sink = Sink::new(MockSink::new(), None);
    apply_cell(
        &mut sink,
        &caps,
        caps.colours(),
        &mut shadow,
        defaults,
        Colour::default_colour(),
        Colour::default_colour(),
        CellAttr::empty(),
    );
    sink.flush().unwrap();
    assert!(sink.inner().bytes().is_empty());
}
