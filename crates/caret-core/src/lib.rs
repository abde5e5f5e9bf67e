#![forbid(unsafe_code)]

//! Core: geometry, input events, terminal lifecycle, and logging macros
//! shared by the caret editor crates.

pub mod event;
pub mod geometry;
pub mod logging;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal_session;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, warn};
