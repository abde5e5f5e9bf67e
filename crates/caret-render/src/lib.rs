#![forbid(unsafe_code)]

//! Render kernel: cells, buffers, frames, styles, and ANSI presentation.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod frame;
pub mod presenter;
pub mod style;

pub use style::Style;

mod text_width {
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

    /// Columns occupied by a single code point.
    ///
    /// Control characters take no columns; the editor never draws them.
    #[inline]
    pub fn char_width(ch: char) -> usize {
        if ch.is_control() {
            return 0;
        }
        UnicodeWidthChar::width(ch).unwrap_or(0)
    }

    /// Columns occupied by a string, ignoring control characters.
    #[inline]
    pub fn display_width(text: &str) -> usize {
        if text.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
            return text.len();
        }
        if !text.chars().any(char::is_control) {
            return UnicodeWidthStr::width(text);
        }
        text.chars().map(char_width).sum()
    }
}

pub use text_width::{char_width, display_width};
