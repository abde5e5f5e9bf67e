#![forbid(unsafe_code)]

//! Bordered container with an optional title.

use caret_core::geometry::Rect;
use caret_render::Style;
use caret_render::cell::Cell;
use caret_render::display_width;
use caret_render::frame::Frame;

use crate::Widget;
pub use crate::borders::{BorderSet, BorderType, Borders};
use crate::{draw_text_span, set_style_area};

/// A widget that draws a block with optional borders and a title.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    borders: Borders,
    border_style: Style,
    border_type: BorderType,
    title: Option<String>,
    title_alignment: Alignment,
    style: Style,
}

/// Title alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a block with all borders enabled.
    pub fn bordered() -> Self {
        Self::default().borders(Borders::ALL)
    }

    #[must_use]
    pub fn borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    #[must_use]
    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    #[must_use]
    pub fn border_type(mut self, border_type: BorderType) -> Self {
        self.border_type = border_type;
        self
    }

    /// Set the title drawn on the top border.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn title_alignment(mut self, alignment: Alignment) -> Self {
        self.title_alignment = alignment;
        self
    }

    /// Style applied to the whole block area before borders are drawn.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn title_text(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Replace the title in place.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Compute the inner area inside the block's borders.
    pub fn inner(&self, area: Rect) -> Rect {
        let mut inner = area;

        if self.borders.contains(Borders::LEFT) {
            inner.x = inner.x.saturating_add(1);
            inner.width = inner.width.saturating_sub(1);
        }
        if self.borders.contains(Borders::TOP) {
            inner.y = inner.y.saturating_add(1);
            inner.height = inner.height.saturating_sub(1);
        }
        if self.borders.contains(Borders::RIGHT) {
            inner.width = inner.width.saturating_sub(1);
        }
        if self.borders.contains(Borders::BOTTOM) {
            inner.height = inner.height.saturating_sub(1);
        }

        inner
    }

    fn border_cell(&self, c: char) -> Cell {
        let mut cell = Cell::from_char(c);
        self.border_style.apply_to(&mut cell);
        cell
    }

    fn render_borders(&self, area: Rect, frame: &mut Frame) {
        let set = self.border_type.to_border_set();
        let buf = &mut frame.buffer;

        if self.borders.contains(Borders::LEFT) {
            for y in area.y..area.bottom() {
                buf.set(area.x, y, self.border_cell(set.vertical));
            }
        }
        if self.borders.contains(Borders::RIGHT) {
            let x = area.right() - 1;
            for y in area.y..area.bottom() {
                buf.set(x, y, self.border_cell(set.vertical));
            }
        }
        if self.borders.contains(Borders::TOP) {
            for x in area.x..area.right() {
                buf.set(x, area.y, self.border_cell(set.horizontal));
            }
        }
        if self.borders.contains(Borders::BOTTOM) {
            let y = area.bottom() - 1;
            for x in area.x..area.right() {
                buf.set(x, y, self.border_cell(set.horizontal));
            }
        }

        // Corners overwrite the edge characters.
        if self.borders.contains(Borders::LEFT | Borders::TOP) {
            buf.set(area.x, area.y, self.border_cell(set.top_left));
        }
        if self.borders.contains(Borders::RIGHT | Borders::TOP) {
            buf.set(area.right() - 1, area.y, self.border_cell(set.top_right));
        }
        if self.borders.contains(Borders::LEFT | Borders::BOTTOM) {
            buf.set(area.x, area.bottom() - 1, self.border_cell(set.bottom_left));
        }
        if self.borders.contains(Borders::RIGHT | Borders::BOTTOM) {
            buf.set(
                area.right() - 1,
                area.bottom() - 1,
                self.border_cell(set.bottom_right),
            );
        }
    }

    fn render_title(&self, area: Rect, frame: &mut Frame) {
        let Some(title) = self.title.as_deref() else {
            return;
        };
        if !self.borders.contains(Borders::TOP) || area.width < 3 {
            return;
        }

        let available_width = area.width.saturating_sub(2) as usize;
        let title_width = display_width(title).min(available_width);

        let x = match self.title_alignment {
            Alignment::Left => area.x.saturating_add(1),
            Alignment::Center => area
                .x
                .saturating_add(1)
                .saturating_add(((available_width - title_width) / 2) as u16),
            Alignment::Right => area
                .right()
                .saturating_sub(1)
                .saturating_sub(title_width as u16),
        };

        let max_x = area.right().saturating_sub(1);
        draw_text_span(frame, x, area.y, title, self.border_style, max_x);
    }
}

impl Widget for Block {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Block",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }

        set_style_area(frame, area, self.style);
        self.render_borders(area, frame);
        self.render_title(area, frame);
    }
}
