#![forbid(unsafe_code)]

//! ANSI escape sequence writers.
//!
//! Pure byte emitters with no state; [`crate::presenter`] decides when to
//! call them. All coordinates are 0-indexed on input and converted to the
//! terminal's 1-indexed form here.

use std::io::{self, Write};

use crate::cell::{PackedRgba, StyleFlags};

/// SGR on-codes in emission order.
const FLAG_CODES: [(StyleFlags, u8); 8] = [
    (StyleFlags::BOLD, 1),
    (StyleFlags::DIM, 2),
    (StyleFlags::ITALIC, 3),
    (StyleFlags::UNDERLINE, 4),
    (StyleFlags::BLINK, 5),
    (StyleFlags::REVERSE, 7),
    (StyleFlags::HIDDEN, 8),
    (StyleFlags::STRIKETHROUGH, 9),
];

/// Reset all attributes and colors (`CSI 0 m`).
pub fn sgr_reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Enable every flag in `flags` with a single SGR sequence.
pub fn sgr_flags<W: Write>(w: &mut W, flags: StyleFlags) -> io::Result<()> {
    if flags.is_empty() {
        return Ok(());
    }
    let codes: Vec<String> = FLAG_CODES
        .iter()
        .filter(|(flag, _)| flags.contains(*flag))
        .map(|(_, code)| code.to_string())
        .collect();
    write!(w, "\x1b[{}m", codes.join(";"))
}

/// Foreground color; alpha 0 selects the terminal default.
pub fn sgr_fg_packed<W: Write>(w: &mut W, color: PackedRgba) -> io::Result<()> {
    if color.a() == 0 {
        return w.write_all(b"\x1b[39m");
    }
    write!(w, "\x1b[38;2;{};{};{}m", color.r(), color.g(), color.b())
}

/// Background color; alpha 0 selects the terminal default.
pub fn sgr_bg_packed<W: Write>(w: &mut W, color: PackedRgba) -> io::Result<()> {
    if color.a() == 0 {
        return w.write_all(b"\x1b[49m");
    }
    write!(w, "\x1b[48;2;{};{};{}m", color.r(), color.g(), color.b())
}

/// Cursor position (CUP).
pub fn cup<W: Write>(w: &mut W, row: u16, col: u16) -> io::Result<()> {
    write!(
        w,
        "\x1b[{};{}H",
        row.saturating_add(1),
        col.saturating_add(1)
    )
}

pub fn cursor_hide<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

pub fn cursor_show<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// Switch the caret to a blinking bar (DECSCUSR 5).
pub fn cursor_blinking_bar<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[5 q")
}

/// Erase the whole display (`CSI 2 J`).
pub fn erase_display<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}
