//! Span-based text patching.
//!
//! A [`Patch`] collects replacements against one original source string and
//! renders them in a single left-to-right pass, copying untouched bytes
//! verbatim. Edits must not overlap; insertions (empty spans) at the same
//! offset are applied in the order they were added.

use crate::{ByteOffset, SourceMap, Span};
use std::fmt;

/// A single replacement of `span` in the original source with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Span,
    pub text: String,
}

/// Two edits claimed overlapping parts of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchError {
    pub first: Span,
    pub second: Span,
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "overlapping edits at {:?}..{:?} and {:?}..{:?}",
            self.first.start, self.first.end, self.second.start, self.second.end
        )
    }
}

impl std::error::Error for PatchError {}

/// The result of applying a patch to a range of the source.
#[derive(Debug, Clone)]
pub struct Patched {
    pub text: String,
    /// Maps positions in `text` that were copied unchanged back to the source.
    pub map: SourceMap,
}

/// An ordered set of non-overlapping edits.
#[derive(Debug, Clone, Default)]
pub struct Patch {
    edits: Vec<Edit>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn edits(&self) -> impl Iterator<Item = &Edit> {
        self.edits.iter()
    }

    /// Replaces the text covered by `span`.
    pub fn replace(&mut self, span: Span, text: impl Into<String>) {
        self.edits.push(Edit {
            span,
            text: text.into(),
        });
    }

    /// Inserts text at `offset` without removing anything.
    pub fn insert(&mut self, offset: ByteOffset, text: impl Into<String>) {
        self.replace(Span::empty(offset), text);
    }

    /// Removes the text covered by `span`.
    pub fn delete(&mut self, span: Span) {
        self.replace(span, String::new());
    }

    /// Appends every edit of `other`.
    pub fn extend(&mut self, other: Patch) {
        self.edits.extend(other.edits);
    }

    /// Applies the patch to the whole source.
    pub fn apply(&self, source: &str) -> Result<String, PatchError> {
        self.apply_range(source, Span::from_usize(0, source.len()))
            .map(|patched| patched.text)
    }

    /// Applies the edits that fall inside `range` and returns only that
    /// range of the patched text.
    ///
    /// Edits outside `range` are ignored. An edit straddling its boundary
    /// is reported as an overlap.
    pub fn apply_range(&self, source: &str, range: Span) -> Result<Patched, PatchError> {
        let mut edits: Vec<&Edit> = Vec::with_capacity(self.edits.len());
        for edit in &self.edits {
            let inside = range.start <= edit.span.start && edit.span.end <= range.end;
            if inside {
                edits.push(edit);
            } else if edit.span.overlaps(range) {
                return Err(PatchError {
                    first: range,
                    second: edit.span,
                });
            }
        }
        // Stable sort keeps same-offset insertions in insertion order.
        edits.sort_by_key(|edit| (edit.span.start, edit.span.end));

        for pair in edits.windows(2) {
            let (first, second) = (pair[0].span, pair[1].span);
            if second.start < first.end {
                return Err(PatchError { first, second });
            }
        }

        let mut text = String::with_capacity(range.range().len());
        let mut map = SourceMap::builder();
        let mut cursor = range.start;
        for edit in edits {
            let copied = &source[Span::new(cursor, edit.span.start).range()];
            map.add_source(cursor, copied);
            text.push_str(copied);
            map.add_generated(&edit.text);
            text.push_str(&edit.text);
            cursor = edit.span.end;
        }
        let rest = &source[Span::new(cursor, range.end).range()];
        map.add_source(cursor, rest);
        text.push_str(rest);
        Ok(Patched {
            text,
            map: map.build(),
        })
    }
}
