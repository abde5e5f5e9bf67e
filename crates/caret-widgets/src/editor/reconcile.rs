#![forbid(unsafe_code)]

//! Places the terminal caret where the cursor marker was drawn.
//!
//! Two ways to find the marker cell:
//!
//! - [`CaretStrategy::RegionLookup`] reads the `"cursor"` region the text
//!   view registered on the frame.
//! - [`CaretStrategy::AttributeScan`] walks the inner rect row by row and
//!   takes the first DIM cell.
//!
//! Either way the DIM attribute is cleared on the found cell, since it only
//! marks the caret and is not part of the text's style. When nothing is
//! found the caret goes to the inner rect's origin.
//!
//! A found position is cached until [`CursorReconciler::invalidate`]. The
//! origin fallback is never cached, so the next frame searches again.

use caret_core::geometry::Rect;
use caret_render::cell::StyleFlags;
use caret_render::frame::Frame;

use crate::text_view::CURSOR_REGION;

/// How the caret cell is located.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaretStrategy {
    #[default]
    RegionLookup,
    AttributeScan,
}

/// Resolves and caches the caret's screen position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorReconciler {
    strategy: CaretStrategy,
    cached: Option<(u16, u16)>,
}

impl CursorReconciler {
    pub fn new(strategy: CaretStrategy) -> Self {
        Self {
            strategy,
            cached: None,
        }
    }

    pub fn strategy(&self) -> CaretStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: CaretStrategy) {
        self.strategy = strategy;
        self.invalidate();
    }

    /// The cached position, if still valid.
    pub fn cached(&self) -> Option<(u16, u16)> {
        self.cached
    }

    /// Drop the cached position; the next reconcile searches again.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Find the caret cell inside `inner` and show the caret there.
    pub fn reconcile(&mut self, frame: &mut Frame, inner: Rect) -> (u16, u16) {
        let position = match self.cached {
            Some(position) => position,
            None => {
                let found = match self.strategy {
                    CaretStrategy::RegionLookup => frame.region(CURSOR_REGION).map(|r| r.origin()),
                    CaretStrategy::AttributeScan => scan_for_dim(frame, inner),
                };
                caret_core::trace!(
                    strategy = ?self.strategy,
                    found = ?found,
                    "caret resolved"
                );
                // Only a real hit is cached; the fallback is retried next frame.
                self.cached = found;
                found.unwrap_or_else(|| inner.origin())
            }
        };

        if let Some(cell) = frame.buffer.get_mut(position.0, position.1) {
            cell.attrs.remove(StyleFlags::DIM);
        }
        frame.set_cursor(Some(position));
        position
    }
}

/// First DIM cell in row-major order.
fn scan_for_dim(frame: &Frame, inner: Rect) -> Option<(u16, u16)> {
    let area = inner.intersection(&frame.bounds());
    (area.y..area.bottom())
        .flat_map(|y| (area.x..area.right()).map(move |x| (x, y)))
        .find(|&(x, y)| {
            frame
                .buffer
                .get(x, y)
                .is_some_and(|cell| cell.has_flag(StyleFlags::DIM))
        })
}
