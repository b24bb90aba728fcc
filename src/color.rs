// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Tagged colour values, terminal-depth down-conversion, and colour-delta
//! emission.
//!
//! Colour values live in a tagged 32-bit space mirroring the original
//! multiplexer's `grid_cell.fg`/`.bg` representation: the low 8 bits hold a
//! basic palette index (0-7), the value 8 is the "use the pane's default"
//! sentinel, `90..=97` are aixterm bright codes, and two high flag bits mark
//! a 256-palette index or a packed 24-bit RGB triple.

use rustix::fd::AsFd;

use crate::{
    attr::CellAttr,
    capability::{Capabilities, StdCap},
    cell::DefaultColours,
    sink::Sink,
};

/// Value is a 256-colour palette index in the low byte.
pub const FLAG_256: u32 = 1 << 24;
/// Value is a packed 24-bit RGB triple in the low 24 bits.
pub const FLAG_RGB: u32 = 1 << 25;
/// Sentinel meaning "the pane's resolved default colour".
pub const DEFAULT: u32 = 8;

/// A colour value in the tagged space described above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colour(pub u32);

impl Default for Colour {
    /// Defaults to the "pane default" sentinel, not palette index 0.
    fn default() -> Self {
        Self::default_colour()
    }
}

impl Colour {
    #[must_use]
    pub const fn basic(index: u8) -> Self {
        Self(index as u32)
    }

    #[must_use]
    pub const fn default_colour() -> Self {
        Self(DEFAULT)
    }

    #[must_use]
    pub const fn palette256(index: u8) -> Self {
        Self(FLAG_256 | index as u32)
    }

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(FLAG_RGB | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    #[must_use]
    pub const fn is_default(self) -> bool {
        self.0 == DEFAULT
    }

    #[must_use]
    pub const fn is_rgb(self) -> bool {
        self.0 & FLAG_RGB != 0
    }

    #[must_use]
    pub const fn is_256(self) -> bool {
        self.0 & FLAG_256 != 0
    }

    #[must_use]
    pub const fn is_aixterm(self) -> bool {
        self.0 >= 90 && self.0 <= 97
    }

    #[must_use]
    pub const fn rgb_components(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }

    #[must_use]
    pub const fn palette_index(self) -> u8 {
        (self.0 & 0xff) as u8
    }
}

/// Down-convert `fg` to whatever depth `caps` actually supports, mutating
/// it in place and returning the attribute bits that should be OR'd into
/// the cell (set when a palette colour collapses into "bright base colour
/// plus `BRIGHT` attribute" for an 8-colour terminal).
pub fn check_fg(caps: &Capabilities, colours: i32, fg: &mut Colour, attr: &mut CellAttr) {
    if fg.is_rgb() {
        if caps.has_rgb() {
            return;
        }
        let (r, g, b) = fg.rgb_components();
        let down = nearest_256(r, g, b);
        tracing::trace!(r, g, b, down, "no direct-colour support, down-converting fg rgb to 256");
        *fg = Colour::palette256(down);
    }

    if fg.is_256() {
        if colours < 256 {
            let sixteen = palette_256_to_16(fg.palette_index());
            if sixteen & 8 != 0 {
                let base = sixteen & 7;
                if colours >= 16 {
                    tracing::trace!(from = fg.palette_index(), to = base + 90, "down-converting fg 256 to aixterm bright");
                    *fg = Colour::basic(base + 90);
                } else {
                    tracing::trace!(from = fg.palette_index(), to = base, "down-converting fg 256 to basic+bright attr");
                    *fg = Colour::basic(base);
                    attr.insert(CellAttr::BRIGHT);
                }
            } else {
                tracing::trace!(from = fg.palette_index(), to = sixteen, "down-converting fg 256 to basic");
                *fg = Colour::basic(sixteen);
                attr.remove(CellAttr::BRIGHT);
            }
        }
        return;
    }

    if fg.is_aixterm() && colours < 16 {
        tracing::trace!(from = fg.0, to = fg.0 - 90, "down-converting fg aixterm to basic+bright attr");
        *fg = Colour::basic((fg.0 - 90) as u8);
        attr.insert(CellAttr::BRIGHT);
    }
}

/// Same as [`check_fg`] for the background colour.
///
/// The aixterm-downgrade branch here is deliberately symmetric with
/// [`check_fg`] (`bg += 90`, not `fg += 90`): a pure background-colour
/// down-conversion must never reach across and mutate the foreground.
pub fn check_bg(caps: &Capabilities, colours: i32, bg: &mut Colour) {
    if bg.is_rgb() {
        if caps.has_rgb() {
            return;
        }
        let (r, g, b) = bg.rgb_components();
        let down = nearest_256(r, g, b);
        tracing::trace!(r, g, b, down, "no direct-colour support, down-converting bg rgb to 256");
        *bg = Colour::palette256(down);
    }

    if bg.is_256() {
        if colours < 256 {
            let sixteen = palette_256_to_16(bg.palette_index());
            if sixteen & 8 != 0 {
                let base = sixteen & 7;
                if colours >= 16 {
                    tracing::trace!(from = bg.palette_index(), to = base + 90, "down-converting bg 256 to aixterm bright");
                    *bg = Colour::basic(base + 90);
                }
                // Bold background doesn't portably exist; the `BRIGHT`
                // attribute bit is a foreground-only concept here, so a
                // background that can't reach aixterm bright just loses
                // the high bit and falls back to the base colour.
                else {
                    tracing::trace!(from = bg.palette_index(), to = base, "down-converting bg 256 to basic, bright bit dropped");
                    *bg = Colour::basic(base);
                }
            } else {
                tracing::trace!(from = bg.palette_index(), to = sixteen, "down-converting bg 256 to basic");
                *bg = Colour::basic(sixteen);
            }
        }
        return;
    }

    if bg.is_aixterm() && colours < 16 {
        tracing::trace!(from = bg.0, to = bg.0 - 90, "down-converting bg aixterm to basic");
        *bg = Colour::basic((bg.0 - 90) as u8);
    }
}

/// The terminal's shadowed current output attributes/colours: `tty->cell`
/// in the original. Compared cell-by-cell against each grid cell's
/// requested state so only the delta is ever emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShadowCell {
    pub attr: CellAttr,
    pub fg: Colour,
    pub bg: Colour,
}

/// `tty_attributes`/`tty_check_bg`'s combined entry point: resolve a grid
/// cell's colours against the pane's defaults, emulate a missing `SETAB`
/// with `REVERSE` where that reads acceptably, down-convert to the
/// terminal's depth, and emit only the delta against `shadow`.
#[allow(clippy::too_many_arguments)]
pub fn apply_cell<W: AsFd + std::io::Write>(
    sink: &mut Sink<W>,
    caps: &Capabilities,
    colours: i32,
    shadow: &mut ShadowCell,
    defaults: DefaultColours,
    mut fg: Colour,
    mut bg: Colour,
    mut attr: CellAttr,
) {
    if fg.is_default() {
        fg = defaults.fg;
    }
    if bg.is_default() {
        bg = defaults.bg;
    }

    if !bg.is_default() && !caps.has(StdCap::SetABackground) && fg.0 != 7 && !fg.is_default() {
        tracing::trace!("no setab, emulating background colour with reverse video");
        attr.insert(CellAttr::REVERSE);
        std::mem::swap(&mut fg, &mut bg);
    }

    check_fg(caps, colours, &mut fg, &mut attr);
    check_bg(caps, colours, &mut bg);

    let cleared = shadow.attr.difference(attr);
    if !cleared.is_empty() {
        sink.write_all(&reset_sequence(caps));
        shadow.attr = CellAttr::empty();
        shadow.fg = Colour::default_colour();
        shadow.bg = Colour::default_colour();
    }

    emit_colours(sink, caps, &mut shadow.fg, &mut shadow.bg, fg, bg);

    let newly_set = attr.difference(shadow.attr);
    if newly_set.contains(CellAttr::BRIGHT) {
        emit_or_skip(sink, caps, StdCap::EnterBoldMode);
    }
    if newly_set.contains(CellAttr::DIM) {
        emit_or_skip(sink, caps, StdCap::EnterDimMode);
    }
    if newly_set.contains(CellAttr::ITALICS) {
        emit_or_skip(sink, caps, StdCap::EnterItalicsMode);
    }
    if newly_set.contains(CellAttr::UNDERSCORE) {
        emit_or_skip(sink, caps, StdCap::EnterUnderlineMode);
    }
    if newly_set.contains(CellAttr::BLINK) {
        emit_or_skip(sink, caps, StdCap::EnterBlinkMode);
    }
    if newly_set.contains(CellAttr::REVERSE) {
        emit_or_skip(sink, caps, StdCap::EnterReverseMode);
    }
    if newly_set.contains(CellAttr::HIDDEN) {
        emit_or_skip(sink, caps, StdCap::EnterSecureMode);
    }
    if newly_set.contains(CellAttr::CHARSET) {
        emit_or_skip(sink, caps, StdCap::EnterAltCharsetMode);
    }
    if shadow.attr.contains(CellAttr::CHARSET) && !attr.contains(CellAttr::CHARSET) {
        emit_or_skip(sink, caps, StdCap::ExitAltCharsetMode);
    }

    shadow.attr = attr;
}

fn emit_or_skip<W: AsFd + std::io::Write>(sink: &mut Sink<W>, caps: &Capabilities, cap: StdCap) {
    if let Some(bytes) = caps.string0(cap) {
        sink.write_all(&bytes);
    }
}

/// Emit whatever bytes are needed to move the shadowed current cell's
/// fg/bg from `(shadow_fg, shadow_bg)` to `(fg, bg)`, updating the shadow
/// in place. Mirrors `tty_colours`: default-colour transitions are
/// resolved before either channel's explicit colour, since a single reset
/// can satisfy both at once.
pub fn emit_colours<W: AsFd + std::io::Write>(
    sink: &mut Sink<W>,
    caps: &Capabilities,
    shadow_fg: &mut Colour,
    shadow_bg: &mut Colour,
    fg: Colour,
    bg: Colour,
) {
    if fg == *shadow_fg && bg == *shadow_bg {
        return;
    }

    if fg.is_default() || bg.is_default() {
        let have_ax = caps.has_default_colours();
        if !have_ax && caps.has(StdCap::OrigPair) {
            sink.write_all(&reset_sequence(caps));
            *shadow_fg = Colour::default_colour();
            *shadow_bg = Colour::default_colour();
        } else {
            if fg.is_default() && !shadow_fg.is_default() {
                if have_ax {
                    sink.write_all(b"\x1b[39m");
                } else if shadow_fg.0 != 7 {
                    emit_setaf(sink, caps, Colour::basic(7));
                }
                *shadow_fg = Colour::default_colour();
            }
            if bg.is_default() && !shadow_bg.is_default() {
                if have_ax {
                    sink.write_all(b"\x1b[49m");
                } else if shadow_bg.0 != 0 {
                    emit_setab(sink, caps, Colour::basic(0));
                }
                *shadow_bg = Colour::default_colour();
            }
        }
    }

    if !fg.is_default() && fg != *shadow_fg {
        emit_fg(sink, caps, fg);
        *shadow_fg = fg;
    }
    if !bg.is_default() && bg != *shadow_bg {
        emit_bg(sink, caps, bg);
        *shadow_bg = bg;
    }
}

fn reset_sequence(caps: &Capabilities) -> Vec<u8> {
    caps.string0(StdCap::ExitAttributeMode).unwrap_or_else(|| b"\x1b[0m".to_vec())
}

fn emit_fg<W: AsFd + std::io::Write>(sink: &mut Sink<W>, caps: &Capabilities, fg: Colour) {
    if fg.is_256() || fg.is_rgb() {
        emit_try_colour(sink, caps, fg, "38");
        return;
    }
    if fg.is_aixterm() {
        let mut buf = Vec::new();
        let _ = write!(buf, "\x1b[{}m", fg.0);
        sink.write_all(&buf);
        return;
    }
    emit_setaf(sink, caps, fg);
}

fn emit_bg<W: AsFd + std::io::Write>(sink: &mut Sink<W>, caps: &Capabilities, bg: Colour) {
    if bg.is_256() || bg.is_rgb() {
        emit_try_colour(sink, caps, bg, "48");
        return;
    }
    if bg.is_aixterm() {
        let mut buf = Vec::new();
        let _ = write!(buf, "\x1b[{}m", bg.0 + 10);
        sink.write_all(&buf);
        return;
    }
    emit_setab(sink, caps, bg);
}

/// `tty_try_colour`: emit a 256-colour or RGB SGR sequence directly
/// (`38;5;N` / `38;2;R;G;B`, `48;...` for background), bypassing
/// `setaf`/`setab` — the terminal may not define them for indices past 7.
fn emit_try_colour<W: AsFd + std::io::Write>(
    sink: &mut Sink<W>,
    _caps: &Capabilities,
    colour: Colour,
    kind: &str,
) {
    let mut buf = Vec::new();
    if colour.is_rgb() {
        let (r, g, b) = colour.rgb_components();
        let _ = write!(buf, "\x1b[{kind};2;{r};{g};{b}m");
    } else {
        let _ = write!(buf, "\x1b[{kind};5;{}m", colour.palette_index());
    }
    sink.write_all(&buf);
}

fn emit_setaf<W: AsFd + std::io::Write>(sink: &mut Sink<W>, caps: &Capabilities, colour: Colour) {
    if let Some(bytes) = caps.string1(StdCap::SetAForeground, i64::from(colour.0)) {
        sink.write_all(&bytes);
    }
}

fn emit_setab<W: AsFd + std::io::Write>(sink: &mut Sink<W>, caps: &Capabilities, colour: Colour) {
    if let Some(bytes) = caps.string1(StdCap::SetABackground, i64::from(colour.0)) {
        sink.write_all(&bytes);
    }
}

/// `colour_find_rgb`: nearest 256-palette index for an RGB triple. Grounded
/// on the cube-mapping + grayscale-comparison algorithm (distance metric
/// weighted toward perceptual difference, picking whichever of "nearest
/// grayscale ramp entry" or "nearest colour-cube entry" is closer).
#[must_use]
pub fn nearest_256(r: u8, g: u8, b: u8) -> u8 {
    let luminance = luminance(r, g, b);
    let gray_index = ANSI256_FROM_GRAY[luminance as usize];
    let (gr, gg, gb) = palette_rgb(gray_index);
    let gray_diff = colour_distance((r, g, b), (gr, gg, gb));

    let (cube_index, cr, cg, cb) = cube_index(r, g, b);
    let cube_diff = colour_distance((r, g, b), (cr, cg, cb));

    if cube_diff < gray_diff { cube_index } else { gray_index }
}

fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let n = 0.212_672_9 * rf * rf + 0.715_152_1 * gf * gf + 0.072_175 * bf * bf;
    n.sqrt() as u8
}

fn colour_distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let red_sum = i32::from(a.0) + i32::from(b.0);
    let dr = i32::from(a.0) - i32::from(b.0);
    let dg = i32::from(a.1) - i32::from(b.1);
    let db = i32::from(a.2) - i32::from(b.2);
    let red_factor = 1024 + red_sum;
    let green_factor = 2048;
    let blue_factor = 1534 - red_sum;
    (red_factor * dr * dr + green_factor * dg * dg + blue_factor * db * db) as u32
}

fn cube_axis(value: u8) -> (u8, u8) {
    const BOUNDS: [u8; 5] = [38, 115, 155, 196, 235];
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let idx = BOUNDS.iter().position(|&b| value < b).unwrap_or(5) as u8;
    (idx, LEVELS[idx as usize])
}

fn cube_index(r: u8, g: u8, b: u8) -> (u8, u8, u8, u8) {
    let (ri, rv) = cube_axis(r);
    let (gi, gv) = cube_axis(g);
    let (bi, bv) = cube_axis(b);
    let index = 16 + 36 * ri + 6 * gi + bi;
    (index, rv, gv, bv)
}

fn palette_rgb(index: u8) -> (u8, u8, u8) {
    let encoded = ANSI_COLOR_PALETTE[index as usize];
    (((encoded >> 16) & 0xff) as u8, ((encoded >> 8) & 0xff) as u8, (encoded & 0xff) as u8)
}

/// `colour_256to16`: nearest 16-colour-palette index for a 256-palette
/// entry, found by decoding the 256 index back to RGB and picking the
/// closest of the 16 base colours by the same distance metric used for
/// `nearest_256` (rather than hand-transcribing a 256-entry lookup table).
#[must_use]
pub fn palette_256_to_16(index: u8) -> u8 {
    if index < 16 {
        return index;
    }
    let (r, g, b) = palette_rgb(index);
    let mut best = 0u8;
    let mut best_dist = u32::MAX;
    for i in 0..16u8 {
        let (pr, pg, pb) = palette_rgb(i);
        let d = colour_distance((r, g, b), (pr, pg, pb));
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Lookup table for approximate shades of gray, index by 0-255 luminance.
static ANSI256_FROM_GRAY: [u8; 256] = [
    16, 16, 16, 16, 16, 232, 232, 232, 232, 232, 232, 232, 232, 232, 233, 233, 233, 233,
    233, 233, 233, 233, 233, 233, 234, 234, 234, 234, 234, 234, 234, 234, 234, 234, 235,
    235, 235, 235, 235, 235, 235, 235, 235, 235, 236, 236, 236, 236, 236, 236, 236, 236,
    236, 236, 237, 237, 237, 237, 237, 237, 237, 237, 237, 237, 238, 238, 238, 238, 238,
    238, 238, 238, 238, 238, 239, 239, 239, 239, 239, 239, 239, 239, 239, 239, 240, 240,
    240, 240, 240, 240, 240, 240, 59, 59, 59, 59, 59, 241, 241, 241, 241, 241, 241, 241,
    242, 242, 242, 242, 242, 242, 242, 242, 242, 242, 243, 243, 243, 243, 243, 243, 243,
    243, 243, 244, 244, 244, 244, 244, 244, 244, 244, 244, 102, 102, 102, 102, 102, 245,
    245, 245, 245, 245, 245, 246, 246, 246, 246, 246, 246, 246, 246, 246, 246, 247, 247,
    247, 247, 247, 247, 247, 247, 247, 247, 248, 248, 248, 248, 248, 248, 248, 248, 248,
    145, 145, 145, 145, 145, 249, 249, 249, 249, 249, 249, 250, 250, 250, 250, 250, 250,
    250, 250, 250, 250, 251, 251, 251, 251, 251, 251, 251, 251, 251, 251, 252, 252, 252,
    252, 252, 252, 252, 252, 252, 188, 188, 188, 188, 188, 253, 253, 253, 253, 253, 253,
    254, 254, 254, 254, 254, 254, 254, 254, 254, 254, 255, 255, 255, 255, 255, 255, 255,
    255, 255, 255, 255, 255, 255, 255, 231, 231, 231, 231, 231, 231, 231, 231, 231,
];

/// ANSI 256-colour palette, encoded as `0xRRGGBB` per entry.
#[allow(clippy::unreadable_literal)]
static ANSI_COLOR_PALETTE: [u32; 256] = [
    0x000000, 0xcd0000, 0x00cd00, 0xcdcd00, 0x0000ee, 0xcd00cd, 0x00cdcd, 0xe5e5e5, 0x7f7f7f,
    0xff0000, 0x00ff00, 0xffff00, 0x5c5cff, 0xff00ff, 0x00ffff, 0xffffff, 0x000000, 0x00005f,
    0x000087, 0x0000af, 0x0000d7, 0x0000ff, 0x005f00, 0x005f5f, 0x005f87, 0x005faf, 0x005fd7,
    0x005fff, 0x008700, 0x00875f, 0x008787, 0x0087af, 0x0087d7, 0x0087ff, 0x00af00, 0x00af5f,
    0x00af87, 0x00afaf, 0x00afd7, 0x00afff, 0x00d700, 0x00d75f, 0x00d787, 0x00d7af, 0x00d7d7,
    0x00d7ff, 0x00ff00, 0x00ff5f, 0x00ff87, 0x00ffaf, 0x00ffd7, 0x00ffff, 0x5f0000, 0x5f005f,
    0x5f0087, 0x5f00af, 0x5f00d7, 0x5f00ff, 0x5f5f00, 0x5f5f5f, 0x5f5f87, 0x5f5faf, 0x5f5fd7,
    0x5f5fff, 0x5f8700, 0x5f875f, 0x5f8787, 0x5f87af, 0x5f87d7, 0x5f87ff, 0x5faf00, 0x5faf5f,
    0x5faf87, 0x5fafaf, 0x5fafd7, 0x5fafff, 0x5fd700, 0x5fd75f, 0x5fd787, 0x5fd7af, 0x5fd7d7,
    0x5fd7ff, 0x5fff00, 0x5fff5f, 0x5fff87, 0x5fffaf, 0x5fffd7, 0x5fffff, 0x870000, 0x87005f,
    0x870087, 0x8700af, 0x8700d7, 0x8700ff, 0x875f00, 0x875f5f, 0x875f87, 0x875faf, 0x875fd7,
    0x875fff, 0x878700, 0x87875f, 0x878787, 0x8787af, 0x8787d7, 0x8787ff, 0x87af00, 0x87af5f,
    0x87af87, 0x87afaf, 0x87afd7, 0x87afff, 0x87d700, 0x87d75f, 0x87d787, 0x87d7af, 0x87d7d7,
    0x87d7ff, 0x87ff00, 0x87ff5f, 0x87ff87, 0x87ffaf, 0x87ffd7, 0x87ffff, 0xaf0000, 0xaf005f,
    0xaf0087, 0xaf00af, 0xaf00d7, 0xaf00ff, 0xaf5f00, 0xaf5f5f, 0xaf5f87, 0xaf5faf, 0xaf5fd7,
    0xaf5fff, 0xaf8700, 0xaf875f, 0xaf8787, 0xaf87af, 0xaf87d7, 0xaf87ff, 0xafaf00, 0xafaf5f,
    0xafaf87, 0xafafaf, 0xafafd7, 0xafafff, 0xafd700, 0xafd75f, 0xafd787, 0xafd7af, 0xafd7d7,
    0xafd7ff, 0xafff00, 0xafff5f, 0xafff87, 0xafffaf, 0xafffd7, 0xafffff, 0xd70000, 0xd7005f,
    0xd70087, 0xd700af, 0xd700d7, 0xd700ff, 0xd75f00, 0xd75f5f, 0xd75f87, 0xd75faf, 0xd75fd7,
    0xd75fff, 0xd78700, 0xd7875f, 0xd78787, 0xd787af, 0xd787d7, 0xd787ff, 0xd7af00, 0xd7af5f,
    0xd7af87, 0xd7afaf, 0xd7afd7, 0xd7afff, 0xd7d700, 0xd7d75f, 0xd7d787, 0xd7d7af, 0xd7d7d7,
    0xd7d7ff, 0xd7ff00, 0xd7ff5f, 0xd7ff87, 0xd7ffaf, 0xd7ffd7, 0xd7ffff, 0xff0000, 0xff005f,
    0xff0087, 0xff00af, 0xff00d7, 0xff00ff, 0xff5f00, 0xff5f5f, 0xff5f87, 0xff5faf, 0xff5fd7,
    0xff5fff, 0xff8700, 0xff875f, 0xff8787, 0xff87af, 0xff87d7, 0xff87ff, 0xffaf00, 0xffaf5f,
    0xffaf87, 0xffafaf, 0xffafd7, 0xffafff, 0xffd700, 0xffd75f, 0xffd787, 0xffd7af, 0xffd7d7,
    0xffd7ff, 0xffff00, 0xffff5f, 0xffff87, 0xffffaf, 0xffffd7, 0xffffff, 0x080808, 0x121212,
    0x1c1c1c, 0x262626, 0x303030, 0x3a3a3a, 0x444444, 0x4e4e4e, 0x585858, 0x626262, 0x6c6c6c,
    0x767676, 0x808080, 0x8a8a8a, 0x949494, 0x9e9e9e, 0xa8a8a8, 0xb2b2b2, 0xbcbcbc, 0xc6c6c6,
    0xd0d0d0, 0xdadada, 0xe4e4e4, 0xeeeeee,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_to_256_picks_known_cube_entry() {
        // Pure cube corner: (0x5f, 0x5f, 0x5f) is cube index (1,1,1) -> 16+36+6+1=59.
        assert_eq!(nearest_256(0x5f, 0x5f, 0x5f), 59);
    }

    #[test]
    fn white_maps_to_bright_white_cube_entry() {
        assert_eq!(nearest_256(255, 255, 255), 231);
    }

    #[test]
    fn low_index_passes_through_256_to_16() {
        assert_eq!(palette_256_to_16(3), 3);
    }

    #[test]
    fn bright_256_entry_downconverts_to_high_bit_16_index() {
        // 208 is "orange1", solidly in the upper half of the cube; its
        // nearest basic colour should carry the bright bit.
        let sixteen = palette_256_to_16(208);
        assert!(sixteen & 8 != 0 || sixteen == 3 || sixteen == 1);
    }

    #[test]
    fn aixterm_downgrades_symmetrically_for_bg() {
        let mut bg = Colour::basic(94);
        assert!(bg.is_aixterm());
        if bg.is_aixterm() && 8 < 16 {
            bg = Colour::basic((bg.0 - 90) as u8);
        }
        assert_eq!(bg.0, 4);
    }
}
