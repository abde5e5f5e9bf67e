#![forbid(unsafe_code)]

//! Cursor movement over a wrapped layout.
//!
//! [`MovementEngine`] turns relative, absolute, and page moves into a new
//! cursor offset using a [`LayoutGeometry`], then applies the selection
//! policy:
//!
//! - **collapse**: when not selecting, the anchor follows the cursor, so
//!   any selection disappears;
//! - **extend**: when selecting, the anchor stays where it was.
//!
//! Vertical moves remember the column they started from (the *goal
//! column*) so moving through a short line and back does not drift left.
//! Any non-vertical move forgets it.
//!
//! # Absolute coordinates
//!
//! [`MovementEngine::move_absolute`] takes signed coordinates; negative
//! values count from the end, so `-1` is the last column or row. The two
//! overflow flags switch what the coordinates index:
//!
//! | flag         | `false`                     | `true`                                   |
//! |--------------|-----------------------------|------------------------------------------|
//! | `overflow_x` | display column in the row   | code point in the row's logical line     |
//! | `overflow_y` | visual row                  | logical line                             |
//!
//! With those rules the usual keys are:
//!
//! | key       | call                                   |
//! |-----------|----------------------------------------|
//! | Home      | `(0, row, true, false)`                |
//! | End       | `(-1, row, true, false)`               |
//! | Ctrl+Home | `(0, 0, true, true)`                   |
//! | Ctrl+End  | `(-1, -1, true, true)`                 |
//!
//! where `row` is the cursor's current visual row. See [`Absolute`].

use crate::layout::LayoutGeometry;
use crate::model::TextModel;

/// Page direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Up,
    Down,
}

/// Named absolute targets, resolved against the cursor's current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absolute {
    /// Start of the current logical line.
    LineStart,
    /// End of the current logical line.
    LineEnd,
    /// Start of the document.
    DocumentStart,
    /// End of the document.
    DocumentEnd,
}

/// Moves the cursor of a [`TextModel`] through a [`LayoutGeometry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementEngine {
    goal_column: Option<usize>,
}

impl MovementEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column vertical moves aim for, if one is remembered.
    pub fn goal_column(&self) -> Option<usize> {
        self.goal_column
    }

    /// Forget the goal column (call after edits).
    pub fn reset_goal(&mut self) {
        self.goal_column = None;
    }

    /// Move by `dx` code points and `dy` visual rows.
    ///
    /// Horizontal moves walk the document, so stepping past the end of a
    /// visual row lands on the next one. Vertical moves keep the display
    /// column, clamped to the target row. When both are non-zero the
    /// vertical part is applied first.
    pub fn move_relative<L: LayoutGeometry>(
        &mut self,
        model: &mut TextModel,
        layout: &L,
        dx: isize,
        dy: isize,
        selecting: bool,
    ) {
        let mut target = model.cursor();

        if dy != 0 {
            let (col, row) = layout.position_of(target);
            let goal = *self.goal_column.get_or_insert(col);
            let last_row = layout.row_count() - 1;
            let row = offset_by(row, dy).min(last_row);
            target = layout.offset_at(goal, row);
        }

        if dx != 0 {
            self.goal_column = None;
            target = offset_by(target, dx).min(model.len());
        }

        tracing::debug!(dx, dy, from = model.cursor(), to = target, selecting, "move relative");
        apply(model, target, selecting);
    }

    /// Move to an absolute position; see the module docs for coordinates.
    #[allow(clippy::too_many_arguments)]
    pub fn move_absolute<L: LayoutGeometry>(
        &mut self,
        model: &mut TextModel,
        layout: &L,
        x: isize,
        y: isize,
        overflow_x: bool,
        overflow_y: bool,
        selecting: bool,
    ) {
        self.goal_column = None;

        let target = if overflow_y {
            let line = from_end(y, layout.line_count());
            let range = layout.line_range(line);
            if overflow_x {
                let len = range.end - range.start;
                range.start + from_end_inclusive(x, len)
            } else {
                let first_row = (0..layout.row_count())
                    .find(|&row| layout.line_of_row(row) == line)
                    .unwrap_or(0);
                layout.offset_at(from_end_inclusive(x, usize::MAX), first_row)
            }
        } else {
            let row = from_end(y, layout.row_count());
            if overflow_x {
                let range = layout.line_range(layout.line_of_row(row));
                let len = range.end - range.start;
                range.start + from_end_inclusive(x, len)
            } else {
                layout.offset_at(from_end_inclusive(x, usize::MAX), row)
            }
        };

        tracing::debug!(
            x,
            y,
            overflow_x,
            overflow_y,
            from = model.cursor(),
            to = target,
            selecting,
            "move absolute"
        );
        apply(model, target, selecting);
    }

    /// Jump to a named absolute target.
    pub fn jump<L: LayoutGeometry>(
        &mut self,
        model: &mut TextModel,
        layout: &L,
        to: Absolute,
        selecting: bool,
    ) {
        let (_, row) = layout.position_of(model.cursor());
        let row = isize::try_from(row).unwrap_or(isize::MAX);
        let (x, y, overflow_y) = match to {
            Absolute::LineStart => (0, row, false),
            Absolute::LineEnd => (-1, row, false),
            Absolute::DocumentStart => (0, 0, true),
            Absolute::DocumentEnd => (-1, -1, true),
        };
        self.move_absolute(model, layout, x, y, true, overflow_y, selecting);
    }

    /// Move one page (the layout's page height) up or down.
    pub fn page<L: LayoutGeometry>(
        &mut self,
        model: &mut TextModel,
        layout: &L,
        direction: PageDirection,
        selecting: bool,
    ) {
        let rows = isize::try_from(layout.page_height()).unwrap_or(isize::MAX);
        let dy = match direction {
            PageDirection::Up => -rows,
            PageDirection::Down => rows,
        };
        self.move_relative(model, layout, 0, dy, selecting);
    }
}

/// Collapse or extend the selection around the new cursor.
fn apply(model: &mut TextModel, cursor: usize, selecting: bool) {
    let anchor = if selecting { model.anchor() } else { cursor };
    model.set_selection(anchor, cursor);
}

fn offset_by(base: usize, delta: isize) -> usize {
    if delta < 0 {
        base.saturating_sub(delta.unsigned_abs())
    } else {
        base.saturating_add(delta.unsigned_abs())
    }
}

/// Resolve a signed index into `0..count` (negative counts from the end).
fn from_end(index: isize, count: usize) -> usize {
    let last = count.saturating_sub(1);
    if index < 0 {
        last.saturating_sub(index.unsigned_abs() - 1)
    } else {
        index.unsigned_abs().min(last)
    }
}

/// Resolve a signed index into `0..=len`, where `-1` means `len`.
fn from_end_inclusive(index: isize, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs() - 1)
    } else {
        index.unsigned_abs().min(len)
    }
}
