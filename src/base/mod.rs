//! Foundation types shared by the symbol graph, the syntax front end and the binder.
//!
//! - [`FileId`] - Source file handles used in diagnostics and locations
//! - [`TextRange`], [`TextSize`] - Source positions
//! - [`LineCol`], [`LineIndex`] - Line/column conversion for rendering
//! - [`Name`], [`Interner`] - Identifier interning
//!
//! This module has NO dependencies on other modules of the crate.

mod file_id;
mod intern;
mod span;

pub use file_id::FileId;
pub use intern::{Interner, Name};
pub use span::{LineCol, LineIndex, Location, TextRange, TextSize};

pub use text_size;
