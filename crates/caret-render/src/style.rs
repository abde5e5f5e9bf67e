#![forbid(unsafe_code)]

//! Partial cell styles.
//!
//! A [`Style`] says what to change on a cell and leaves everything else
//! alone, so styles can be layered: a block background, then a selection
//! highlight on top, then the caret's dim marker.

use crate::cell::{Cell, PackedRgba, StyleFlags};

/// A patch applied to cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<PackedRgba>,
    pub bg: Option<PackedRgba>,
    /// Flags to add; existing flags are kept.
    pub attrs: Option<StyleFlags>,
}

impl Style {
    /// Empty style (changes nothing).
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    #[must_use]
    pub const fn fg(mut self, color: PackedRgba) -> Self {
        self.fg = Some(color);
        self
    }

    #[must_use]
    pub const fn bg(mut self, color: PackedRgba) -> Self {
        self.bg = Some(color);
        self
    }

    /// Add style flags.
    #[must_use]
    pub fn add(mut self, flags: StyleFlags) -> Self {
        self.attrs = Some(self.attrs.unwrap_or_default() | flags);
        self
    }

    #[must_use]
    pub fn bold(self) -> Self {
        self.add(StyleFlags::BOLD)
    }

    #[must_use]
    pub fn dim(self) -> Self {
        self.add(StyleFlags::DIM)
    }

    #[must_use]
    pub fn reverse(self) -> Self {
        self.add(StyleFlags::REVERSE)
    }

    /// True when applying this style would change nothing.
    pub const fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_none()
    }

    /// Layer `other` on top of `self`; `other`'s colors win, flags combine.
    #[must_use]
    pub fn patch(self, other: Style) -> Self {
        Self {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            attrs: match (self.attrs, other.attrs) {
                (Some(a), Some(b)) => Some(a | b),
                (a, b) => a.or(b),
            },
        }
    }

    /// Apply to a cell, preserving its content.
    pub fn apply_to(&self, cell: &mut Cell) {
        if let Some(fg) = self.fg {
            cell.fg = fg;
        }
        if let Some(bg) = self.bg {
            cell.bg = bg;
        }
        if let Some(attrs) = self.attrs {
            cell.attrs |= attrs;
        }
    }
}
