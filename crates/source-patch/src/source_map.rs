//! Mapping from patched output back to the original source.

use crate::{ByteOffset, Span};
use text_size::TextSize;

/// A run of output bytes copied unchanged from the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    /// The span in the patched output.
    pub generated: Span,
    /// The span in the original source.
    pub original: Span,
}

/// Tracks which parts of a patched text were copied from the original.
///
/// Bytes produced by an edit have no mapping.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    /// Sorted by generated position.
    mappings: Vec<Mapping>,
}

impl SourceMap {
    pub fn builder() -> SourceMapBuilder {
        SourceMapBuilder::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn mappings(&self) -> impl Iterator<Item = &Mapping> {
        self.mappings.iter()
    }

    /// Finds the original position of a generated position.
    ///
    /// Returns `None` for positions inside generated text.
    pub fn original_position(&self, generated: ByteOffset) -> Option<ByteOffset> {
        let idx = match self
            .mappings
            .binary_search_by(|m| m.generated.start.cmp(&generated))
        {
            Ok(idx) => idx,
            Err(idx) => idx.checked_sub(1)?,
        };
        let mapping = self.mappings.get(idx)?;
        if !mapping.generated.contains(generated) {
            return None;
        }
        let offset_in_span = u32::from(generated) - u32::from(mapping.generated.start);
        Some(mapping.original.start + TextSize::from(offset_in_span))
    }
}

/// Records mappings while a patched text is assembled left to right.
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    mappings: Vec<Mapping>,
    generated_offset: ByteOffset,
}

impl SourceMapBuilder {
    #[inline]
    pub fn generated_offset(&self) -> ByteOffset {
        self.generated_offset
    }

    /// Records text copied unchanged from `original_start`.
    pub fn add_source(&mut self, original_start: ByteOffset, text: &str) {
        if text.is_empty() {
            return;
        }
        let len = TextSize::from(text.len() as u32);
        self.mappings.push(Mapping {
            generated: Span::new(self.generated_offset, self.generated_offset + len),
            original: Span::new(original_start, original_start + len),
        });
        self.generated_offset += len;
    }

    /// Records text with no original counterpart.
    pub fn add_generated(&mut self, text: &str) {
        self.generated_offset += TextSize::from(text.len() as u32);
    }

    pub fn build(self) -> SourceMap {
        SourceMap {
            mappings: self.mappings,
        }
    }
}
