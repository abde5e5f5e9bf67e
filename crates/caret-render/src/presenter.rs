#![forbid(unsafe_code)]

//! State-tracked ANSI presenter.
//!
//! Writes a whole [`Frame`] to the terminal: every row is repainted, but SGR
//! sequences are only emitted when the style actually changes between
//! consecutive cells. After the grid, the caret is shown at
//! [`Frame::cursor_position`] or hidden when the frame has none.
//!
//! The caret is hidden while painting so it never flickers across the
//! screen mid-frame.

use std::io::{self, BufWriter, Write};

use crate::ansi;
use crate::cell::{Cell, PackedRgba, StyleFlags};
use crate::frame::Frame;

/// Output buffer capacity; one full 200x60 frame of ASCII fits comfortably.
const BUFFER_CAPACITY: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellStyle {
    fg: PackedRgba,
    bg: PackedRgba,
    attrs: StyleFlags,
}

impl CellStyle {
    fn from_cell(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            attrs: cell.attrs,
        }
    }
}

/// Frame-at-a-time ANSI writer.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    /// Current style state (None = unknown/reset).
    current_style: Option<CellStyle>,
}

impl<W: Write> Presenter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            current_style: None,
        }
    }

    /// Paint `frame` and place the caret.
    pub fn present(&mut self, frame: &Frame) -> io::Result<()> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "present",
            width = frame.width(),
            height = frame.height(),
            cursor = ?frame.cursor_position
        )
        .entered();

        ansi::cursor_hide(&mut self.writer)?;

        for y in 0..frame.height() {
            ansi::cup(&mut self.writer, y, 0)?;
            for cell in frame.buffer.row_cells(y) {
                self.emit_cell(cell)?;
            }
        }

        ansi::sgr_reset(&mut self.writer)?;
        self.current_style = None;

        match frame.cursor_position {
            Some((x, y)) if frame.cursor_visible => {
                ansi::cup(&mut self.writer, y, x)?;
                ansi::cursor_show(&mut self.writer)?;
            }
            _ => {}
        }

        self.writer.flush()
    }

    fn emit_cell(&mut self, cell: &Cell) -> io::Result<()> {
        // The head cell already advanced the terminal cursor past the tail.
        if cell.is_continuation() {
            return Ok(());
        }

        let style = CellStyle::from_cell(cell);
        if self.current_style != Some(style) {
            ansi::sgr_reset(&mut self.writer)?;
            if style.fg.a() > 0 {
                ansi::sgr_fg_packed(&mut self.writer, style.fg)?;
            }
            if style.bg.a() > 0 {
                ansi::sgr_bg_packed(&mut self.writer, style.bg)?;
            }
            ansi::sgr_flags(&mut self.writer, style.attrs)?;
            self.current_style = Some(style);
        }

        match cell.content.as_char() {
            Some(ch) if cell.content.width() > 0 => {
                let mut buf = [0u8; 4];
                self.writer.write_all(ch.encode_utf8(&mut buf).as_bytes())
            }
            _ => self.writer.write_all(b" "),
        }
    }

    /// Clear the screen and forget the tracked style.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        ansi::erase_display(&mut self.writer)?;
        ansi::cup(&mut self.writer, 0, 0)?;
        self.current_style = None;
        self.writer.flush()
    }

    /// Use a blinking bar caret for the rest of the session.
    pub fn use_blinking_bar(&mut self) -> io::Result<()> {
        ansi::cursor_blinking_bar(&mut self.writer)?;
        self.writer.flush()
    }

    /// Get the inner writer (consuming the presenter), flushing first.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| io::Error::other(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present(frame: &Frame) -> String {
        let mut presenter = Presenter::new(Vec::new());
        presenter.present(frame).expect("present to Vec");
        String::from_utf8(presenter.into_inner().expect("flush")).expect("utf8 output")
    }

    #[test]
    fn caret_is_shown_at_cursor_position() {
        let mut frame = Frame::new(4, 2);
        frame.set_cursor(Some((2, 1)));
        let out = present(&frame);
        assert!(out.ends_with("\x1b[2;3H\x1b[?25h"), "got {out:?}");
    }

    #[test]
    fn caret_stays_hidden_without_position() {
        let frame = Frame::new(4, 2);
        let out = present(&frame);
        assert!(out.starts_with("\x1b[?25l"));
        assert!(!out.contains("\x1b[?25h"));
    }

    #[test]
    fn style_only_emitted_on_change() {
        let mut frame = Frame::new(3, 1);
        let reversed = Cell::from_char('a').with_attrs(StyleFlags::REVERSE);
        frame.buffer.set(0, 0, reversed);
        frame.buffer.set(1, 0, reversed.with_char('b'));
        frame.buffer.set(2, 0, Cell::from_char('c'));
        let out = present(&frame);
        assert_eq!(out.matches("\x1b[7m").count(), 1);
        assert!(out.contains("\x1b[7mab\x1b[0mc"), "got {out:?}");
    }

    #[test]
    fn wide_char_skips_continuation() {
        let mut frame = Frame::new(3, 1);
        frame.buffer.set(0, 0, Cell::from_char('中'));
        let out = present(&frame);
        assert!(out.contains("中 "), "got {out:?}");
        assert!(!out.contains("中  "), "continuation painted twice: {out:?}");
    }
}
