#![forbid(unsafe_code)]

//! Cell types and invariants.
//!
//! A [`Cell`] is one slot of the terminal grid: a single code point plus
//! colors and style flags. The editor indexes text by code point, so a cell
//! never holds a multi-code-point cluster; wide characters occupy a head
//! cell followed by [`CellContent::CONTINUATION`] cells.

use crate::char_width;

/// Cell content: a Unicode scalar value, empty, or a wide-char continuation.
///
/// # Special Values
///
/// - `EMPTY` (0x0): empty cell, width 0
/// - `CONTINUATION` (0x7FFF_FFFF): trailing half of a wide character
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CellContent(u32);

impl CellContent {
    /// Empty cell content (no character).
    pub const EMPTY: Self = Self(0);

    /// Continuation marker for wide characters.
    ///
    /// Outside the Unicode scalar range, so it never collides with a char.
    pub const CONTINUATION: Self = Self(0x7FFF_FFFF);

    /// Create content from a single Unicode character.
    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self(c as u32)
    }

    /// Check if this is a continuation cell (part of a wide character).
    #[inline]
    pub const fn is_continuation(self) -> bool {
        self.0 == Self::CONTINUATION.0
    }

    /// Check if this cell is empty.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }

    /// The character, or `None` for empty and continuation cells.
    #[inline]
    pub fn as_char(self) -> Option<char> {
        if self.is_empty() || self.is_continuation() {
            None
        } else {
            char::from_u32(self.0)
        }
    }

    /// Display width in columns.
    #[inline]
    pub fn width(self) -> usize {
        self.as_char().map_or(0, char_width)
    }
}

impl Default for CellContent {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl core::fmt::Debug for CellContent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_empty() {
            write!(f, "CellContent::EMPTY")
        } else if self.is_continuation() {
            write!(f, "CellContent::CONTINUATION")
        } else if let Some(c) = self.as_char() {
            write!(f, "CellContent::Char({c:?})")
        } else {
            write!(f, "CellContent(0x{:08x})", self.0)
        }
    }
}

/// A single terminal cell.
///
/// The default cell is empty with transparent colors and no style flags.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    /// Character content.
    pub content: CellContent,
    /// Foreground color.
    pub fg: PackedRgba,
    /// Background color.
    pub bg: PackedRgba,
    /// Style flags.
    pub attrs: StyleFlags,
}

impl Cell {
    /// Trailing half of a wide character.
    pub const CONTINUATION: Self = Self {
        content: CellContent::CONTINUATION,
        fg: PackedRgba::TRANSPARENT,
        bg: PackedRgba::TRANSPARENT,
        attrs: StyleFlags::empty(),
    };

    /// Create a cell from a single character with default colors.
    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self {
            content: CellContent::from_char(c),
            fg: PackedRgba::TRANSPARENT,
            bg: PackedRgba::TRANSPARENT,
            attrs: StyleFlags::empty(),
        }
    }

    #[inline]
    pub const fn is_continuation(&self) -> bool {
        self.content.is_continuation()
    }

    /// Check if this cell carries a style flag.
    #[inline]
    pub const fn has_flag(&self, flag: StyleFlags) -> bool {
        self.attrs.contains(flag)
    }

    #[inline]
    #[must_use]
    pub const fn with_char(mut self, c: char) -> Self {
        self.content = CellContent::from_char(c);
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: PackedRgba) -> Self {
        self.fg = fg;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: PackedRgba) -> Self {
        self.bg = bg;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_attrs(mut self, attrs: StyleFlags) -> Self {
        self.attrs = attrs;
        self
    }
}

impl core::fmt::Debug for Cell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cell")
            .field("content", &self.content)
            .field("fg", &self.fg)
            .field("bg", &self.bg)
            .field("attrs", &self.attrs)
            .finish()
    }
}

/// An RGBA color packed into a `u32` as `0xRRGGBBAA`.
///
/// Alpha 0 means "terminal default" to the presenter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Transparent (terminal default color).
    pub const TRANSPARENT: Self = Self(0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from RGB components.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }
}

bitflags::bitflags! {
    /// Text style attributes.
    ///
    /// `DIM` doubles as the caret's render attribute: the editor draws the
    /// cursor marker dim so an attribute scan can find it.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct StyleFlags: u8 {
        const BOLD          = 0b0000_0001;
        const DIM           = 0b0000_0010;
        const ITALIC        = 0b0000_0100;
        const UNDERLINE     = 0b0000_1000;
        const BLINK         = 0b0001_0000;
        const REVERSE       = 0b0010_0000;
        const STRIKETHROUGH = 0b0100_0000;
        const HIDDEN        = 0b1000_0000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_continuation_have_no_char() {
        assert_eq!(CellContent::EMPTY.as_char(), None);
        assert_eq!(CellContent::CONTINUATION.as_char(), None);
        assert_eq!(CellContent::from_char('x').as_char(), Some('x'));
    }

    #[test]
    fn content_width() {
        assert_eq!(CellContent::from_char('a').width(), 1);
        assert_eq!(CellContent::from_char('中').width(), 2);
        assert_eq!(CellContent::EMPTY.width(), 0);
        assert_eq!(CellContent::CONTINUATION.width(), 0);
    }

    #[test]
    fn nul_char_encodes_as_empty() {
        // U+0000 shares the EMPTY encoding; it is treated as empty.
        assert!(CellContent::from_char('\0').is_empty());
    }

    #[test]
    fn rgba_components_round_trip() {
        let c = PackedRgba::rgba(1, 2, 3, 4);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
        assert_eq!(PackedRgba::rgb(9, 8, 7).a(), 255);
        assert_eq!(PackedRgba::TRANSPARENT.a(), 0);
    }

    #[test]
    fn builder_sets_fields() {
        let cell = Cell::from_char('q')
            .with_fg(PackedRgba::WHITE)
            .with_bg(PackedRgba::BLACK)
            .with_attrs(StyleFlags::DIM | StyleFlags::BOLD);
        assert_eq!(cell.content.as_char(), Some('q'));
        assert!(cell.has_flag(StyleFlags::DIM));
        assert!(cell.has_flag(StyleFlags::BOLD));
        assert!(!cell.has_flag(StyleFlags::REVERSE));
    }

    #[test]
    fn default_cell_is_blank() {
        let cell = Cell::default();
        assert!(cell.content.is_empty());
        assert!(cell.attrs.is_empty());
        assert_eq!(cell.fg, PackedRgba::TRANSPARENT);
    }
}
