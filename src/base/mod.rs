//! Foundation types for the model builder.
//!
//! - [`FileId`], [`FileTable`] - compilation unit identifiers
//! - [`TextRange`], [`TextSize`], [`LineCol`], [`LineIndex`] - source positions
//! - [`Name`], [`Interner`] - string interning for member lookups
//! - Domain constants (stereotypes, tag names, extensions)
//!
//! This module has NO dependencies on other crate modules.

pub mod constants;
mod file_id;
mod intern;
mod span;

pub use file_id::{FileId, FileTable};
pub use intern::{Interner, Name};
pub use span::{LineCol, LineIndex, TextRange, TextSize};

pub use text_size;
