#![forbid(unsafe_code)]

//! Frame = Buffer + metadata for a render pass.
//!
//! Widgets draw into [`Frame::buffer`] and may also register named screen
//! regions, which later stages of the same frame can query by name. The
//! editor uses this to publish where its cursor marker landed so the caret
//! can be placed without rescanning the grid.
//!
//! # Usage
//!
//! ```
//! use caret_core::geometry::Rect;
//! use caret_render::cell::Cell;
//! use caret_render::frame::Frame;
//!
//! let mut frame = Frame::new(80, 24);
//! frame.buffer.set(0, 0, Cell::from_char('H'));
//! frame.register_region("cursor", Rect::cell(1, 0));
//!
//! let caret = frame.region("cursor").map(|r| r.origin());
//! frame.set_cursor(caret);
//! assert_eq!(frame.cursor_position, Some((1, 0)));
//! ```

use crate::buffer::Buffer;
use caret_core::geometry::Rect;

/// A named rectangle registered during rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub rect: Rect,
}

/// Render target for one frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The cell grid.
    pub buffer: Buffer,

    /// Where the terminal caret should be shown, if anywhere.
    pub cursor_position: Option<(u16, u16)>,

    /// Whether the caret is visible at all.
    pub cursor_visible: bool,

    regions: Vec<Region>,
}

impl Frame {
    /// Create a blank frame.
    pub fn new(width: u16, height: u16) -> Self {
        Self::from_buffer(Buffer::new(width, height))
    }

    /// Wrap an existing buffer.
    pub fn from_buffer(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor_position: None,
            cursor_visible: true,
            regions: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.buffer.bounds()
    }

    /// Reset the grid, the caret, and all registered regions.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor_position = None;
        self.regions.clear();
    }

    /// Position the caret, or hide it with `None`.
    ///
    /// Positions outside the frame are clamped onto its last row/column.
    pub fn set_cursor(&mut self, position: Option<(u16, u16)>) {
        self.cursor_position = position.map(|(x, y)| self.bounds().clamp_point(x, y));
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    /// Register a named region, replacing any earlier region of that name.
    ///
    /// The rect is clipped to the frame; a region entirely outside the
    /// frame is not registered and `false` is returned.
    pub fn register_region(&mut self, name: impl Into<String>, rect: Rect) -> bool {
        let name = name.into();
        self.regions.retain(|region| region.name != name);
        match rect.intersection_opt(&self.bounds()) {
            Some(rect) => {
                self.regions.push(Region { name, rect });
                true
            }
            None => false,
        }
    }

    /// Look up a region registered this frame.
    pub fn region(&self, name: &str) -> Option<Rect> {
        self.regions
            .iter()
            .find(|region| region.name == name)
            .map(|region| region.rect)
    }

    /// All regions registered this frame, in registration order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }
}
