//! Text presentation layer for a retaildesk session.
//!
//! - [`repl`]: line-oriented command loop, one dispatch per line
//! - [`render`]: tables and bar charts as plain text

pub mod render;
pub mod repl;
