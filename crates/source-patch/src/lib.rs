//! Source positions and text patching for vue-declassify.
//!
//! The rewriter never pretty-prints a whole syntax tree. It copies the
//! original source byte-for-byte and splices generated text over the spans
//! that change. This crate holds the pieces that make that possible:
//! byte spans, a line index for reporting positions, and a [`Patch`] that
//! applies a set of non-overlapping edits and remembers where each copied
//! run of output came from.

mod line_index;
mod patch;
mod source_map;
mod span;

pub use line_index::{line_indent, LineCol, LineIndex};
pub use patch::{Edit, Patch, PatchError, Patched};
pub use source_map::{Mapping, SourceMap, SourceMapBuilder};
pub use span::{ByteOffset, Span};
