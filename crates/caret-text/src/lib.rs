#![forbid(unsafe_code)]

//! Document model and cursor movement for the caret editor.
//!
//! - [`TextModel`] - code points plus a cursor and a selection anchor
//! - [`VisualLayout`] - the document wrapped into visual rows
//! - [`MovementEngine`] - relative, absolute, and page moves over a layout
//!
//! # Example
//! ```
//! use caret_text::{Absolute, MovementEngine, TextModel, VisualLayout};
//!
//! let mut model = TextModel::with_text("hello\nworld");
//! model.set_cursor(8);
//!
//! let layout = VisualLayout::new(model.chars(), 80, 24);
//! let mut engine = MovementEngine::new();
//!
//! engine.jump(&mut model, &layout, Absolute::LineStart, false);
//! assert_eq!(model.cursor(), 6);
//!
//! engine.jump(&mut model, &layout, Absolute::DocumentStart, false);
//! assert_eq!(model.cursor(), 0);
//! ```

pub mod layout;
pub mod model;
pub mod movement;

pub use layout::{LayoutGeometry, VisualLayout, VisualRow};
pub use model::{CURSOR_MARKER, Projection, Spans, TextModel};
pub use movement::{Absolute, MovementEngine, PageDirection};
