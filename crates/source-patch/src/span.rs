//! Byte spans over source text.

use std::ops::Range;

use text_size::{TextRange, TextSize};

/// A byte offset into a source string.
pub type ByteOffset = TextSize;

/// A half-open byte range `[start, end)` into a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// The start byte offset (inclusive).
    pub start: ByteOffset,
    /// The end byte offset (exclusive).
    pub end: ByteOffset,
}

impl Span {
    /// Creates a new span from start and end byte offsets.
    #[inline]
    pub fn new(start: impl Into<ByteOffset>, end: impl Into<ByteOffset>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Creates a span from `usize` offsets, as produced by `str` searches.
    ///
    /// Offsets are 32-bit, so sources are limited to 4 GiB. Callers reject
    /// longer input before building spans.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        debug_assert!(u32::try_from(end).is_ok(), "offset {end} exceeds 4 GiB");
        Self::new(start as u32, end as u32)
    }

    /// Creates an empty span at the given offset. Used for insertions.
    #[inline]
    pub fn empty(offset: impl Into<ByteOffset>) -> Self {
        let offset = offset.into();
        Self {
            start: offset,
            end: offset,
        }
    }

    #[inline]
    pub fn len(&self) -> TextSize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if this span contains the given offset.
    #[inline]
    pub fn contains(&self, offset: ByteOffset) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns true if the two spans share at least one byte.
    #[inline]
    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Moves the span right by `offset` bytes.
    ///
    /// Used to turn positions inside an embedded `<script>` block into
    /// positions inside the whole file.
    #[inline]
    pub fn shift(self, offset: u32) -> Span {
        Span {
            start: self.start + TextSize::from(offset),
            end: self.end + TextSize::from(offset),
        }
    }

    /// Returns the span as a `usize` range for slicing.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        u32::from(self.start) as usize..u32::from(self.end) as usize
    }

    /// Returns the text this span covers, or `None` when it is out of
    /// bounds or splits a character.
    #[inline]
    pub fn text<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.range())
    }
}

impl From<TextRange> for Span {
    fn from(range: TextRange) -> Self {
        Self {
            start: range.start(),
            end: range.end(),
        }
    }
}

impl From<Span> for TextRange {
    fn from(span: Span) -> Self {
        TextRange::new(span.start, span.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_text() {
        let source = "export default class Foo {}";
        let span = Span::from_usize(21, 24);
        assert_eq!(span.text(source), Some("Foo"));
        assert_eq!(Span::from_usize(10, 100).text(source), None);
    }

    #[test]
    fn test_span_overlaps() {
        let a = Span::new(5u32, 10u32);
        assert!(a.overlaps(Span::new(9u32, 12u32)));
        assert!(!a.overlaps(Span::new(10u32, 12u32)));
        assert!(!a.overlaps(Span::empty(10u32)));
    }

    #[test]
    fn test_span_shift() {
        let span = Span::new(2u32, 4u32).shift(10);
        assert_eq!(span, Span::new(12u32, 14u32));
        assert_eq!(span.range(), 12..14);
    }

    #[test]
    fn test_from_usize_up_to_u32_max() {
        let span = Span::from_usize(0, u32::MAX as usize);
        assert_eq!(span.end, TextSize::from(u32::MAX));
    }
}
