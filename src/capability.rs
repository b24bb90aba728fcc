// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Capability adapter: turns a resolved terminfo entry into the small,
//! typed surface the rest of the engine needs — flags, numbers, and
//! parameterized string templates, already expanded against real argument
//! values.
//!
//! The `terminfo` crate gives us database resolution (`$TERM` lookup,
//! compiled-entry search paths) and typed accessors for flag/number/bare
//! string capabilities. Parameter substitution for the handful of
//! capabilities this engine actually calls with arguments (cursor
//! addressing, scroll regions, indexed colour, repeat counts) is done by
//! [`tparm`], a small interpreter for the standard terminfo parameter
//! mini-language, run over the raw template bytes. This sidesteps needing
//! to carry the exact shape of the crate's own parameter-context API, which
//! isn't exercised by any no-argument-capability caller in the corpus.

use std::env;

use terminfo::{capability, Database};

use crate::error::{Result, TtyError};

/// Resolved terminfo entry plus the handful of derived, non-standard bits
/// (truecolor, default-colour support) that terminfo itself has no
/// universal capability name for.
pub struct Capabilities {
    db: Database,
    colours: i32,
    rgb: bool,
    has_ax: bool,
    has_bce: bool,
    has_ms: bool,
}

impl Capabilities {
    /// Resolve a terminfo entry for `term_name`, or `$TERM` if `None`.
    pub fn resolve(term_name: Option<&str>) -> Result<Self> {
        let db = match term_name {
            Some(name) => Database::from_name(name)
                .map_err(|_| TtyError::UnknownTerminal(name.to_owned()))?,
            None => Database::from_env()
                .map_err(|_| TtyError::UnknownTerminal(env_term()))?,
        };
        Ok(Self::from_database(db))
    }

    fn from_database(db: Database) -> Self {
        let colours = db.get::<capability::MaxColors>().map_or(8, |c| c.0);
        let rgb = detect_truecolor();
        let has_ax = db.get::<capability::DefaultColor>().is_some();
        let has_bce = db.get::<capability::BackColorErase>().is_some();
        let has_ms = db.raw("Ms").is_some();
        Self { db, colours, rgb, has_ax, has_bce, has_ms }
    }

    /// Force the `Ms` presence bit, bypassing database resolution. Used by
    /// [`crate::mock::with_set_selection`] so tests can exercise both the
    /// present and absent branches without depending on what happens to be
    /// installed in the host's terminfo database.
    pub(crate) fn set_ms_override(&mut self, present: bool) {
        self.has_ms = present;
    }

    /// Apply host-requested colour-handling overrides, independent of what
    /// the terminfo entry itself advertises.
    pub fn apply_overrides(&mut self, overrides: crate::config::ColourOverride) {
        if overrides.force_true_colour {
            self.rgb = true;
        }
        if overrides.force_256 && self.colours < 256 {
            self.colours = 256;
        }
        if overrides.force_no_default_colours {
            self.has_ax = false;
        }
    }

    /// Number of colours the terminfo entry claims, before any override.
    #[must_use]
    pub fn colours(&self) -> i32 {
        self.colours
    }

    /// Whether this terminal should be treated as truecolor-capable.
    ///
    /// `Tc`/`RGB` are not standard terminfo capability names (tmux and
    /// ncurses both treat them as user-defined extensions looked up by
    /// raw name), so this is resolved the way the rest of the ecosystem
    /// resolves it: `$COLORTERM=truecolor` or a well-known terminal
    /// identifying itself via `$TERM`/`$TERM_PROGRAM`.
    #[must_use]
    pub fn has_rgb(&self) -> bool {
        self.rgb
    }

    /// Whether the terminal can restore a cell's colours to the theme
    /// default (terminfo `AX` capability, sniffed as `set_a_foreground`/
    /// `set_a_background` advertising an OP equivalent — here approximated
    /// by the presence of `orig_pair`/`orig_colors`).
    #[must_use]
    pub fn has_default_colours(&self) -> bool {
        self.has_ax
    }

    /// Whether the terminal honours background colour when erasing
    /// (`bce`). If absent, the drawer must fake it by repainting cells.
    #[must_use]
    pub fn has_bce(&self) -> bool {
        self.has_bce
    }

    /// Whether the terminal advertises `Ms` (set-selection, OSC 52
    /// clipboard write). `Ms` isn't one of the standard terminfo(5)
    /// capabilities the `terminfo` crate's typed API covers — it's a
    /// tmux/screen-defined extension shipped in their own terminfo
    /// overrides — so this goes through the database's raw-by-name lookup
    /// instead of the `get::<C>()` path the rest of this module uses.
    #[must_use]
    pub fn has_set_selection(&self) -> bool {
        self.has_ms
    }

    #[must_use]
    pub fn has_auto_right_margin(&self) -> bool {
        self.db.get::<capability::AutoRightMargin>().is_some()
    }

    #[must_use]
    pub fn has_eat_newline_glitch(&self) -> bool {
        self.db.get::<capability::EatNewlineGlitch>().is_some()
    }

    /// Whether writing a glyph into the last column of the last row needs
    /// to be suppressed to avoid an unwanted scroll: a terminal that
    /// auto-wraps (`am`) but doesn't forgive a write to that exact corner
    /// (`xenl`) would otherwise scroll the screen on its own.
    #[must_use]
    pub fn needs_early_wrap(&self) -> bool {
        self.has_auto_right_margin() && !self.has_eat_newline_glitch()
    }

    #[must_use]
    pub fn is_utf8_locale() -> bool {
        env::var("LC_ALL")
            .or_else(|_| env::var("LC_CTYPE"))
            .or_else(|_| env::var("LANG"))
            .is_ok_and(|v| v.to_ascii_uppercase().contains("UTF-8") || v.to_ascii_uppercase().contains("UTF8"))
    }

    /// Fetch and param-expand a zero-argument string capability.
    pub fn string0(&self, name: StdCap) -> Option<Vec<u8>> {
        self.template(name).map(|t| tparm(&t, &[]))
    }

    /// Fetch and param-expand a one-argument string capability.
    pub fn string1(&self, name: StdCap, a: i64) -> Option<Vec<u8>> {
        self.template(name).map(|t| tparm(&t, &[a]))
    }

    /// Fetch and param-expand a two-argument string capability.
    pub fn string2(&self, name: StdCap, a: i64, b: i64) -> Option<Vec<u8>> {
        self.template(name).map(|t| tparm(&t, &[a, b]))
    }

    /// Whether the given string capability is present in the terminfo
    /// entry at all (regardless of what it expands to).
    #[must_use]
    pub fn has(&self, name: StdCap) -> bool {
        self.template(name).is_some()
    }

    fn template(&self, name: StdCap) -> Option<Vec<u8>> {
        macro_rules! bytes_of {
            ($cap:ty) => {
                self.db.get::<$cap>().map(|c| c.as_ref().to_vec())
            };
        }
        match name {
            StdCap::CursorAddress => bytes_of!(capability::CursorAddress),
            StdCap::CursorUp => bytes_of!(capability::CursorUp),
            StdCap::CursorDown => bytes_of!(capability::CursorDown),
            StdCap::CursorLeft => bytes_of!(capability::CursorLeft),
            StdCap::CursorRight => bytes_of!(capability::CursorRight),
            StdCap::CursorHome => bytes_of!(capability::CursorHome),
            StdCap::ParmUpCursor => bytes_of!(capability::ParmUpCursor),
            StdCap::ParmDownCursor => bytes_of!(capability::ParmDownCursor),
            StdCap::ParmLeftCursor => bytes_of!(capability::ParmLeftCursor),
            StdCap::ParmRightCursor => bytes_of!(capability::ParmRightCursor),
            StdCap::ColumnAddress => bytes_of!(capability::ColumnAddress),
            StdCap::RowAddress => bytes_of!(capability::RowAddress),
            StdCap::ChangeScrollRegion => bytes_of!(capability::ChangeScrollRegion),
            StdCap::ClearScreen => bytes_of!(capability::ClearScreen),
            StdCap::ClrEol => bytes_of!(capability::ClrEol),
            StdCap::ClrBol => bytes_of!(capability::ClrBol),
            StdCap::ClrEos => bytes_of!(capability::ClrEos),
            StdCap::EraseChars => bytes_of!(capability::EraseChars),
            StdCap::ParmDch => bytes_of!(capability::ParmDch),
            StdCap::DeleteCharacter => bytes_of!(capability::DeleteCharacter),
            StdCap::ParmIch => bytes_of!(capability::ParmIch),
            StdCap::InsertCharacter => bytes_of!(capability::InsertCharacter),
            StdCap::ParmInsertLine => bytes_of!(capability::ParmInsertLine),
            StdCap::InsertLine => bytes_of!(capability::InsertLine),
            StdCap::ParmDeleteLine => bytes_of!(capability::ParmDeleteLine),
            StdCap::DeleteLine => bytes_of!(capability::DeleteLine),
            StdCap::ScrollReverse => bytes_of!(capability::ScrollReverse),
            StdCap::ScrollForward => bytes_of!(capability::ScrollForward),
            StdCap::EnterBoldMode => bytes_of!(capability::EnterBoldMode),
            StdCap::EnterDimMode => bytes_of!(capability::EnterDimMode),
            StdCap::EnterUnderlineMode => bytes_of!(capability::EnterUnderlineMode),
            StdCap::EnterBlinkMode => bytes_of!(capability::EnterBlinkMode),
            StdCap::EnterReverseMode => bytes_of!(capability::EnterReverseMode),
            StdCap::EnterSecureMode => bytes_of!(capability::EnterSecureMode),
            StdCap::EnterItalicsMode => bytes_of!(capability::EnterItalicsMode),
            StdCap::ExitAttributeMode => bytes_of!(capability::ExitAttributeMode),
            StdCap::SetAForeground => bytes_of!(capability::SetAForeground),
            StdCap::SetABackground => bytes_of!(capability::SetABackground),
            StdCap::OrigPair => bytes_of!(capability::OrigPair),
            StdCap::EnterCaMode => bytes_of!(capability::EnterCaMode),
            StdCap::ExitCaMode => bytes_of!(capability::ExitCaMode),
            StdCap::KeypadXmit => bytes_of!(capability::KeypadXmit),
            StdCap::KeypadLocal => bytes_of!(capability::KeypadLocal),
            StdCap::EnterAltCharsetMode => bytes_of!(capability::EnterAltCharsetMode),
            StdCap::ExitAltCharsetMode => bytes_of!(capability::ExitAltCharsetMode),
            StdCap::Enacs => bytes_of!(capability::EnaAcs),
            StdCap::AcsChars => bytes_of!(capability::AcsChars),
            StdCap::CursorNormal => bytes_of!(capability::CursorNormal),
            StdCap::CursorInvisible => bytes_of!(capability::CursorInvisible),
            StdCap::CursorVisible => bytes_of!(capability::CursorVisible),
            StdCap::CarriageReturn => bytes_of!(capability::CarriageReturn),
            StdCap::ToStatusLine => bytes_of!(capability::ToStatusLine),
            StdCap::FromStatusLine => bytes_of!(capability::FromStatusLine),
        }
    }
}

fn env_term() -> String {
    env::var("TERM").unwrap_or_default()
}

fn detect_truecolor() -> bool {
    if env::var("COLORTERM").is_ok_and(|v| v == "truecolor" || v == "24bit") {
        return true;
    }
    env::var("TERM_PROGRAM").is_ok_and(|v| v == "iTerm.app" || v == "WezTerm")
}

/// The subset of terminfo capabilities this engine calls by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StdCap {
    CursorAddress,
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    CursorHome,
    ParmUpCursor,
    ParmDownCursor,
    ParmLeftCursor,
    ParmRightCursor,
    ColumnAddress,
    RowAddress,
    ChangeScrollRegion,
    ClearScreen,
    ClrEol,
    ClrBol,
    ClrEos,
    EraseChars,
    ParmDch,
    DeleteCharacter,
    ParmIch,
    InsertCharacter,
    ParmInsertLine,
    InsertLine,
    ParmDeleteLine,
    DeleteLine,
    ScrollReverse,
    ScrollForward,
    EnterBoldMode,
    EnterDimMode,
    EnterUnderlineMode,
    EnterBlinkMode,
    EnterReverseMode,
    EnterSecureMode,
    EnterItalicsMode,
    ExitAttributeMode,
    SetAForeground,
    SetABackground,
    OrigPair,
    EnterCaMode,
    ExitCaMode,
    KeypadXmit,
    KeypadLocal,
    EnterAltCharsetMode,
    ExitAltCharsetMode,
    /// One-time startup enable for the alternate character set (`enacs`),
    /// distinct from the per-cell `smacs`/`rmacs` toggle pair.
    Enacs,
    AcsChars,
    CursorNormal,
    CursorInvisible,
    CursorVisible,
    CarriageReturn,
    ToStatusLine,
    FromStatusLine,
}

/// A minimal interpreter for the terminfo parameter-expansion language
/// (`%d`, `%p1`..`%p9`, `%i`, `%{n}`, arithmetic/comparison operators, and
/// `%?%t%e%;` conditionals). Covers the templates actually emitted by the
/// terminal families this engine targets (xterm-compatible cursor
/// addressing, indexed/256-colour `setaf`/`setab`).
pub fn tparm(template: &[u8], params: &[i64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(template.len());
    let mut stack: Vec<i64> = Vec::new();
    let mut statics = [0i64; 26];
    let mut args = [0i64; 9];
    for (i, p) in params.iter().enumerate().take(9) {
        args[i] = *p;
    }
    let mut incremented = false;

    let mut i = 0;
    while i < template.len() {
        let b = template[i];
        if b != b'%' {
            out.push(b);
            i += 1;
            continue;
        }
        i += 1;
        if i >= template.len() {
            break;
        }
        match template[i] {
            b'%' => out.push(b'%'),
            b'i' => {
                if !incremented {
                    args[0] += 1;
                    args[1] += 1;
                    incremented = true;
                }
            }
            b'd' => {
                if let Some(v) = stack.pop() {
                    out.extend_from_slice(v.to_string().as_bytes());
                }
            }
            b'c' => {
                if let Some(v) = stack.pop() {
                    out.push(v as u8);
                }
            }
            b'p' => {
                i += 1;
                if i < template.len() {
                    let n = (template[i] - b'1') as usize;
                    stack.push(args.get(n).copied().unwrap_or(0));
                }
            }
            b'P' => {
                i += 1;
                if i < template.len() {
                    let reg = (template[i] - b'a') as usize;
                    if reg < 26 {
                        statics[reg] = stack.pop().unwrap_or(0);
                    }
                }
            }
            b'g' => {
                i += 1;
                if i < template.len() {
                    let reg = (template[i] - b'a') as usize;
                    if reg < 26 {
                        stack.push(statics[reg]);
                    }
                }
            }
            b'\'' => {
                i += 1;
                if i < template.len() {
                    stack.push(i64::from(template[i]));
                    i += 1;
                }
            }
            b'{' => {
                let start = i + 1;
                let mut end = start;
                while end < template.len() && template[end] != b'}' {
                    end += 1;
                }
                let text = std::str::from_utf8(&template[start..end]).unwrap_or("0");
                stack.push(text.parse().unwrap_or(0));
                i = end;
            }
            b'+' | b'-' | b'*' | b'/' | b'm' | b'&' | b'|' | b'^' | b'=' | b'>' | b'<' | b'A'
            | b'O' => {
                let rhs = stack.pop().unwrap_or(0);
                let lhs = stack.pop().unwrap_or(0);
                let r = match template[i] {
                    b'+' => lhs + rhs,
                    b'-' => lhs - rhs,
                    b'*' => lhs * rhs,
                    b'/' => {
                        if rhs == 0 {
                            0
                        } else {
                            lhs / rhs
                        }
                    }
                    b'm' => {
                        if rhs == 0 {
                            0
                        } else {
                            lhs % rhs
                        }
                    }
                    b'&' => lhs & rhs,
                    b'|' => lhs | rhs,
                    b'^' => lhs ^ rhs,
                    b'=' => i64::from(lhs == rhs),
                    b'>' => i64::from(lhs > rhs),
                    b'<' => i64::from(lhs < rhs),
                    b'A' => i64::from(lhs != 0 && rhs != 0),
                    b'O' => i64::from(lhs != 0 || rhs != 0),
                    _ => unreachable!(),
                };
                stack.push(r);
            }
            b'!' => {
                if let Some(v) = stack.pop() {
                    stack.push(i64::from(v == 0));
                }
            }
            b'~' => {
                if let Some(v) = stack.pop() {
                    stack.push(!v);
                }
            }
            b'?' => {}
            b't' => {
                let cond = stack.pop().unwrap_or(0);
                if cond == 0 {
                    i = skip_branch(template, i + 1);
                    continue;
                }
            }
            b'e' => {
                i = skip_to_semi(template, i + 1);
            }
            b';' => {}
            _ => {}
        }
        i += 1;
    }
    out
}

/// From just after `%t`, find the index of the matching `%e` or `%;` at
/// this nesting level (so the `then` branch can be skipped to find the
/// `else`/end).
fn skip_branch(template: &[u8], mut i: usize) -> usize {
    let mut depth = 0;
    while i < template.len() {
        if template[i] == b'%' && i + 1 < template.len() {
            match template[i + 1] {
                b'?' => depth += 1,
                b';' if depth == 0 => return i + 1,
                b';' => depth -= 1,
                b'e' if depth == 0 => return i + 1,
                _ => {}
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    i
}

/// From just after `%e`, find the matching `%;` at this nesting level.
fn skip_to_semi(template: &[u8], mut i: usize) -> usize {
    let mut depth = 0;
    while i < template.len() {
        if template[i] == b'%' && i + 1 < template.len() {
            match template[i + 1] {
                b'?' => depth += 1,
                b';' if depth == 0 => return i + 1,
                b';' => depth -= 1,
                _ => {}
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use super::{tparm, StdCap};

    #[test]
    fn enacs_is_distinct_from_the_per_cell_smacs_rmacs_pair() {
        let caps = crate::mock::test_capabilities("screen");
        let enacs = caps.string0(StdCap::Enacs).expect("screen defines enacs");
        let smacs = caps.string0(StdCap::EnterAltCharsetMode).expect("screen defines smacs");
        let rmacs = caps.string0(StdCap::ExitAltCharsetMode).expect("screen defines rmacs");
        assert_ne!(enacs, smacs, "enacs is a one-time setup sequence, not the per-cell toggle");
        assert_ne!(enacs, rmacs);
    }

    #[test]
    fn needs_early_wrap_true_when_am_set_without_xenl() {
        let caps = crate::mock::test_capabilities("ansi");
        assert!(caps.has_auto_right_margin());
        assert!(!caps.has_eat_newline_glitch());
        assert!(caps.needs_early_wrap());
    }

    #[test]
    fn needs_early_wrap_false_when_xenl_forgives_the_corner() {
        let caps = crate::mock::test_capabilities("xterm-256color");
        assert!(caps.has_auto_right_margin());
        assert!(caps.has_eat_newline_glitch());
        assert!(!caps.needs_early_wrap());
    }

    #[test]
    fn cup_template_one_indexes_and_orders_row_then_column() {
        let out = tparm(b"\x1b[%i%p1%d;%p2%dH", &[4, 9]);
        assert_eq!(out, b"\x1b[5;10H");
    }

    #[test]
    fn single_param_template() {
        let out = tparm(b"\x1b[%p1%dA", &[3]);
        assert_eq!(out, b"\x1b[3A");
    }

    #[test]
    fn setaf_conditional_picks_basic_branch_under_eight() {
        let template: &[u8] =
            b"\x1b[%?%p1%{8}%<%t3%p1%d%e%p1%{16}%<%t9%p1%{8}%-%d%e38;5;%p1%d%;m";
        assert_eq!(tparm(template, &[3]), b"\x1b[33m");
    }

    #[test]
    fn setaf_conditional_picks_bright_branch_under_sixteen() {
        let template: &[u8] =
            b"\x1b[%?%p1%{8}%<%t3%p1%d%e%p1%{16}%<%t9%p1%{8}%-%d%e38;5;%p1%d%;m";
        assert_eq!(tparm(template, &[12]), b"\x1b[94m");
    }

    #[test]
    fn setaf_conditional_falls_through_to_256_branch() {
        let template: &[u8] =
            b"\x1b[%?%p1%{8}%<%t3%p1%d%e%p1%{16}%<%t9%p1%{8}%-%d%e38;5;%p1%d%;m";
        assert_eq!(tparm(template, &[200]), b"\x1b[38;5;200m");
    }
}
