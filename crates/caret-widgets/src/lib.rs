#![forbid(unsafe_code)]

//! Widgets for the caret editor: the bordered [`Block`](block::Block), the
//! wrapped [`TextView`](text_view::TextView), and the embeddable
//! [`Editor`](editor::Editor).

pub mod block;
pub mod borders;
pub mod editor;
pub mod text_view;

pub use block::{Alignment, Block, BorderType, Borders};
pub use editor::{
    CaretStrategy, CursorReconciler, Dispatch, EditAction, Editor, InputDispatcher, Interception,
    KeyInterceptor,
};
pub use text_view::{TextView, TextViewState};

use caret_core::geometry::Rect;
use caret_render::Style;
use caret_render::cell::Cell;
use caret_render::char_width;
use caret_render::frame::Frame;

/// A `Widget` is a renderable component.
///
/// Widgets render into a [`Frame`] so they can register named regions
/// alongside the cells they draw.
pub trait Widget {
    /// Render the widget into the frame at the given area.
    fn render(&self, area: Rect, frame: &mut Frame);
}

/// A `StatefulWidget` renders based on mutable state kept across frames.
pub trait StatefulWidget {
    type State;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State);
}

/// Apply a style to all cells in a rectangular area, preserving content.
pub(crate) fn set_style_area(frame: &mut Frame, area: Rect, style: Style) {
    if style.is_empty() {
        return;
    }
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if let Some(cell) = frame.buffer.get_mut(x, y) {
                style.apply_to(cell);
            }
        }
    }
}

/// Draw a text span at `(x, y)`, stopping at `max_x` (exclusive).
///
/// Returns the x position after the last drawn character. Zero-width code
/// points are skipped; a wide character that does not fit ends the span.
pub(crate) fn draw_text_span(
    frame: &mut Frame,
    mut x: u16,
    y: u16,
    content: &str,
    style: Style,
    max_x: u16,
) -> u16 {
    for ch in content.chars() {
        if x >= max_x {
            break;
        }
        let w = char_width(ch);
        if w == 0 {
            continue;
        }
        if x as usize + w > max_x as usize {
            break;
        }
        let mut cell = Cell::from_char(ch);
        style.apply_to(&mut cell);
        frame.buffer.set(x, y, cell);
        x = x.saturating_add(w as u16);
    }
    x
}
