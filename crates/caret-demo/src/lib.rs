#![forbid(unsafe_code)]

//! Terminal demo for the caret editor widget.

pub mod app;
pub mod cli;
