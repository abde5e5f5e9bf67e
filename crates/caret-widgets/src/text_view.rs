#![forbid(unsafe_code)]

//! Wrapped, scrolling view of a [`TextModel`].
//!
//! The view draws the document through the same [`VisualLayout`] the
//! movement engine uses, highlights the selection, and marks the caret:
//! the cell under the cursor gets the marker style (DIM by default) and is
//! registered as the frame region named [`CURSOR_REGION`].
//!
//! The marker takes no column of its own. At the end of a line the caret
//! sits on the blank cell after the last character.
//!
//! Text is drawn under a scissor set to the render area, so a layout wider
//! than the area is clipped instead of spilling into neighbouring cells.

use caret_core::geometry::Rect;
use caret_render::Style;
use caret_render::cell::Cell;
use caret_render::frame::Frame;
use caret_text::{LayoutGeometry, TextModel, VisualLayout};

use crate::StatefulWidget;

/// Frame region the view registers for the caret cell.
pub const CURSOR_REGION: &str = "cursor";

/// Scroll position kept across frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextViewState {
    /// First visual row shown.
    pub scroll_row: usize,
}

impl TextViewState {
    /// Scroll just enough to bring `row` into a viewport `height` rows tall.
    pub fn scroll_to(&mut self, row: usize, height: usize) {
        let height = height.max(1);
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + height {
            self.scroll_row = row + 1 - height;
        }
    }
}

/// Renders a model laid out by a [`VisualLayout`].
#[derive(Debug, Clone, Copy)]
pub struct TextView<'a> {
    model: &'a TextModel,
    layout: &'a VisualLayout,
    style: Style,
    selection_style: Style,
    marker_style: Style,
}

impl<'a> TextView<'a> {
    pub fn new(model: &'a TextModel, layout: &'a VisualLayout) -> Self {
        Self {
            model,
            layout,
            style: Style::new(),
            selection_style: Style::new().reverse(),
            marker_style: Style::new().dim(),
        }
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn selection_style(mut self, style: Style) -> Self {
        self.selection_style = style;
        self
    }

    #[must_use]
    pub fn marker_style(mut self, style: Style) -> Self {
        self.marker_style = style;
        self
    }
}

impl StatefulWidget for TextView<'_> {
    type State = TextViewState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "TextView",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }

        let chars = self.model.chars();
        let selection = self.model.selection_range();
        let (caret_col, caret_row) = self.layout.position_of(self.model.cursor());
        let height = usize::from(area.height);

        // A shrunk document must not leave blank rows below the last one.
        state.scroll_row = state
            .scroll_row
            .min(self.layout.row_count().saturating_sub(height));
        state.scroll_to(caret_row, height);

        frame.buffer.push_scissor(area);
        let rows = self.layout.rows().iter().skip(state.scroll_row).take(height);
        for (dy, row) in rows.enumerate() {
            let y = area.y + dy as u16;
            let mut x = area.x;
            for offset in row.start..row.end {
                let width = self.layout.char_width_at(offset);
                if width == 0 {
                    continue;
                }
                let mut cell = Cell::from_char(chars[offset]);
                self.style.apply_to(&mut cell);
                if selection.as_ref().is_some_and(|r| r.contains(&offset)) {
                    self.selection_style.apply_to(&mut cell);
                }
                frame.buffer.set(x, y, cell);
                x = x.saturating_add(width as u16);
            }
        }
        frame.buffer.pop_scissor();

        let visible_row = caret_row - state.scroll_row;
        let (Ok(col), Ok(row)) = (u16::try_from(caret_col), u16::try_from(visible_row)) else {
            return;
        };
        if col >= area.width {
            return;
        }
        let (x, y) = (area.x + col, area.y + row);
        if let Some(cell) = frame.buffer.get_mut(x, y) {
            self.marker_style.apply_to(cell);
        }
        frame.register_region(CURSOR_REGION, Rect::cell(x, y));
    }
}
