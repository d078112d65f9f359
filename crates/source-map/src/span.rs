//! Byte spans into a component file.

use std::ops::Range;

use text_size::{TextRange, TextSize};

/// A byte offset into a source string.
pub type ByteOffset = TextSize;

/// A half-open byte range `[start, end)` into a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// The start byte offset (inclusive).
    pub start: ByteOffset,
    /// The end byte offset (exclusive).
    pub end: ByteOffset,
}

impl Span {
    #[inline]
    pub fn new(start: impl Into<ByteOffset>, end: impl Into<ByteOffset>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Creates a span from a `usize` byte range.
    ///
    /// Component files are far below 4 GiB; offsets beyond `u32::MAX` saturate.
    #[inline]
    pub fn from_range(range: Range<usize>) -> Self {
        Self::new(to_size(range.start), to_size(range.end))
    }

    /// Creates an empty span at the given offset.
    #[inline]
    pub fn empty(offset: impl Into<ByteOffset>) -> Self {
        let offset = offset.into();
        Self::new(offset, offset)
    }

    #[inline]
    pub fn len(&self) -> TextSize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the span as a `usize` range suitable for slicing.
    #[inline]
    pub fn range(self) -> Range<usize> {
        u32::from(self.start) as usize..u32::from(self.end) as usize
    }

    /// Returns the text this span covers, or `None` when it is out of bounds
    /// or splits a UTF-8 character.
    pub fn text(self, source: &str) -> Option<&str> {
        source.get(self.range())
    }

    /// Returns a span covering both this span and another.
    #[inline]
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: std::cmp::min(self.start, other.start),
            end: std::cmp::max(self.end, other.end),
        }
    }
}

fn to_size(offset: usize) -> TextSize {
    TextSize::from(u32::try_from(offset).unwrap_or(u32::MAX))
}

impl From<TextRange> for Span {
    fn from(range: TextRange) -> Self {
        Self::new(range.start(), range.end())
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
    fn test_from_range_and_text() {
        let source = "<script>x</script>";
        let span = Span::from_range(8..9);
        assert_eq!(span.text(source), Some("x"));
        assert_eq!(span.range(), 8..9);
    }

    #[test]
    fn test_text_out_of_bounds() {
        let span = Span::from_range(4..40);
        assert_eq!(span.text("short"), None);
    }

    #[test]
    fn test_empty_span() {
        let span = Span::empty(5u32);
        assert!(span.is_empty());
        assert_eq!(span.text("0123456"), Some(""));
    }

    #[test]
    fn test_cover() {
        let covered = Span::from_range(5..10).cover(Span::from_range(8..20));
        assert_eq!(covered, Span::from_range(5..20));
    }
}
