#![forbid(unsafe_code)]

//! Buffer grid storage.
//!
//! The `Buffer` is a 2D grid of [`Cell`]s representing the terminal display.
//! It provides cell access with scissor (clipping) regions and keeps wide
//! characters consistent: a wide head is always followed by its continuation
//! cells, and overwriting either half clears the other.
//!
//! # Layout
//!
//! Cells are stored in row-major order: `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height never change after creation
//! 3. Scissor stack intersection monotonically decreases on push
//! 4. The scissor stack always has at least one element

use crate::cell::Cell;
use caret_core::geometry::Rect;

/// A 2D grid of terminal cells.
///
/// # Example
///
/// ```
/// use caret_render::buffer::Buffer;
/// use caret_render::cell::Cell;
///
/// let mut buffer = Buffer::new(80, 24);
/// buffer.set(0, 0, Cell::from_char('H'));
/// buffer.set(1, 0, Cell::from_char('i'));
/// assert_eq!(buffer.row_text(0).trim_end(), "Hi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    scissor_stack: Vec<Rect>,
}

impl Buffer {
    /// Create a new buffer with the given dimensions.
    ///
    /// Zero dimensions are raised to 1 so a collapsed terminal still has a
    /// drawable (if useless) surface.
    pub fn new(width: u16, height: u16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let size = width as usize * height as usize;

        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
            scissor_stack: vec![Rect::from_size(width, height)],
        }
    }

    /// Buffer width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Bounding rect of the entire buffer.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Get a reference to the cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Get a mutable reference to the cell at (x, y).
    ///
    /// Bypasses the scissor; used for in-place attribute edits.
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Clear the other half of any wide character that `(x, y)` belongs to.
    fn cleanup_overlap(&mut self, x: u16, y: u16) {
        let Some(idx) = self.index(x, y) else { return };
        let current = self.cells[idx];

        if current.content.width() > 1 {
            for i in 1..current.content.width() as u16 {
                if let Some(tail) = self.index(x.saturating_add(i), y)
                    && self.cells[tail].is_continuation()
                {
                    self.cells[tail] = Cell::default();
                }
            }
        } else if current.is_continuation() {
            let mut head_x = x;
            while head_x > 0 {
                head_x -= 1;
                let Some(head) = self.index(head_x, y) else { break };
                if self.cells[head].is_continuation() {
                    continue;
                }
                let width = self.cells[head].content.width() as u16;
                if head_x + width > x {
                    self.cells[head] = Cell::default();
                    for i in 1..width {
                        if let Some(tail) = self.index(head_x + i, y)
                            && self.cells[tail].is_continuation()
                        {
                            self.cells[tail] = Cell::default();
                        }
                    }
                }
                break;
            }
        }
    }

    /// Set the cell at (x, y).
    ///
    /// - Skips cells outside the bounds or the current scissor
    /// - Writes CONTINUATION cells after wide characters
    /// - A wide character that does not fully fit is not written at all
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let width = cell.content.width().max(1) as u16;
        let scissor = self.current_scissor();

        for i in 0..width {
            let cx = x.saturating_add(i);
            if self.index(cx, y).is_none() || !scissor.contains(cx, y) {
                return;
            }
        }

        for i in 0..width {
            self.cleanup_overlap(x + i, y);
        }

        self.set_raw(x, y, cell);
        for i in 1..width {
            self.set_raw(x + i, y, Cell::CONTINUATION);
        }
    }

    /// Set the cell at (x, y) without scissor processing.
    ///
    /// Does nothing if coordinates are out of bounds.
    #[inline]
    pub fn set_raw(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = cell;
        }
    }

    /// Clear all cells to the default.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Get the cells for a single row; empty when `y` is out of bounds.
    #[inline]
    pub fn row_cells(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// The characters of row `y`, empty cells as spaces, continuations skipped.
    pub fn row_text(&self, y: u16) -> String {
        self.row_cells(y)
            .iter()
            .filter(|cell| !cell.is_continuation())
            .map(|cell| cell.content.as_char().unwrap_or(' '))
            .collect()
    }

    // ========== Scissor Stack ==========

    /// Push a scissor (clipping) region onto the stack.
    ///
    /// The effective scissor is the intersection of all pushed rects.
    pub fn push_scissor(&mut self, rect: Rect) {
        let intersected = self.current_scissor().intersection(&rect);
        self.scissor_stack.push(intersected);
    }

    /// Pop a scissor region from the stack.
    ///
    /// Does nothing if only the base scissor remains.
    pub fn pop_scissor(&mut self) {
        if self.scissor_stack.len() > 1 {
            self.scissor_stack.pop();
        }
    }

    /// Get the current effective scissor region.
    #[inline]
    pub fn current_scissor(&self) -> Rect {
        self.scissor_stack.last().copied().unwrap_or_else(|| self.bounds())
    }

    #[inline]
    pub fn scissor_depth(&self) -> usize {
        self.scissor_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{PackedRgba, StyleFlags};

    #[test]
    fn zero_dimensions_are_raised() {
        let buf = Buffer::new(0, 0);
        assert_eq!((buf.width(), buf.height()), (1, 1));
    }

    #[test]
    fn get_and_set() {
        let mut buf = Buffer::new(4, 2);
        buf.set(1, 1, Cell::from_char('z'));
        assert_eq!(buf.get(1, 1).and_then(|c| c.content.as_char()), Some('z'));
        assert!(buf.get(4, 0).is_none());
        assert!(buf.get(0, 2).is_none());
    }

    #[test]
    fn out_of_bounds_set_is_ignored() {
        let mut buf = Buffer::new(2, 2);
        buf.set(5, 5, Cell::from_char('x'));
        assert_eq!(buf, Buffer::new(2, 2));
    }

    #[test]
    fn scissor_clips_writes() {
        let mut buf = Buffer::new(5, 1);
        buf.push_scissor(Rect::new(1, 0, 2, 1));
        for x in 0..5 {
            buf.set(x, 0, Cell::from_char('#'));
        }
        buf.pop_scissor();
        assert_eq!(buf.row_text(0), " ##  ");
    }

    #[test]
    fn scissor_base_cannot_be_popped() {
        let mut buf = Buffer::new(3, 3);
        buf.pop_scissor();
        assert_eq!(buf.scissor_depth(), 1);
        assert_eq!(buf.current_scissor(), buf.bounds());
    }

    #[test]
    fn nested_scissors_intersect() {
        let mut buf = Buffer::new(10, 10);
        buf.push_scissor(Rect::new(0, 0, 6, 6));
        buf.push_scissor(Rect::new(4, 4, 6, 6));
        assert_eq!(buf.current_scissor(), Rect::new(4, 4, 2, 2));
    }

    #[test]
    fn wide_char_writes_continuation() {
        let mut buf = Buffer::new(4, 1);
        buf.set(0, 0, Cell::from_char('中'));
        assert!(buf.get(1, 0).is_some_and(Cell::is_continuation));
        assert_eq!(buf.row_text(0), "中  ");
    }

    #[test]
    fn wide_char_that_does_not_fit_is_skipped() {
        let mut buf = Buffer::new(3, 1);
        buf.set(2, 0, Cell::from_char('中'));
        assert!(buf.get(2, 0).is_some_and(|c| c.content.is_empty()));
    }

    #[test]
    fn overwriting_continuation_clears_head() {
        let mut buf = Buffer::new(4, 1);
        buf.set(0, 0, Cell::from_char('中'));
        buf.set(1, 0, Cell::from_char('a'));
        assert!(buf.get(0, 0).is_some_and(|c| c.content.is_empty()));
        assert_eq!(buf.row_text(0), " a  ");
    }

    #[test]
    fn get_mut_edits_attributes_in_place() {
        let mut buf = Buffer::new(2, 1);
        buf.set(0, 0, Cell::from_char('a').with_attrs(StyleFlags::DIM));
        if let Some(cell) = buf.get_mut(0, 0) {
            cell.attrs.remove(StyleFlags::DIM);
            cell.fg = PackedRgba::WHITE;
        }
        let cell = buf.get(0, 0).copied().unwrap_or_default();
        assert!(!cell.has_flag(StyleFlags::DIM));
        assert_eq!(cell.content.as_char(), Some('a'));
    }

    #[test]
    fn row_cells_out_of_bounds_is_empty() {
        let buf = Buffer::new(3, 1);
        assert!(buf.row_cells(7).is_empty());
        assert_eq!(buf.row_cells(0).len(), 3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn dimensions_are_preserved(width in 1u16..200, height in 1u16..200) {
                let buf = Buffer::new(width, height);
                prop_assert_eq!(buf.width(), width);
                prop_assert_eq!(buf.height(), height);
                prop_assert_eq!(buf.row_cells(height - 1).len(), width as usize);
            }

            #[test]
            fn scissor_push_pop_restores_depth(
                width in 1u16..50,
                height in 1u16..50,
                pushes in 1usize..8,
            ) {
                let mut buf = Buffer::new(width, height);
                for i in 0..pushes {
                    buf.push_scissor(Rect::new(i as u16, i as u16, width, height));
                }
                prop_assert_eq!(buf.scissor_depth(), pushes + 1);
                for _ in 0..pushes {
                    buf.pop_scissor();
                }
                prop_assert_eq!(buf.current_scissor(), buf.bounds());
            }
        }
    }
}
