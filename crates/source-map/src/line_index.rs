//! Line index for offset to line/column conversion.

use crate::ByteOffset;
use text_size::TextSize;

/// A 0-indexed line and column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LineCol {
    pub line: u32,
    /// Byte offset within the line.
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// Byte offsets of every line start in a text.
///
/// A text always has at least one line: `""` is one empty line, and a
/// trailing `\n` opens a final empty line. `\r\n` counts as one line break.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<ByteOffset>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(offset, _)| TextSize::from((offset + 1) as u32)),
        );
        Self { line_starts }
    }

    /// Returns the number of lines in the text.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset to a line/column position.
    pub fn line_col(&self, offset: ByteOffset) -> LineCol {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let col = u32::from(offset) - u32::from(self.line_starts[line]);
        LineCol::new(line as u32, col)
    }

    /// Returns the 1-based line number containing `offset`, the form used in
    /// user-facing messages.
    pub fn line_number(&self, offset: usize) -> u32 {
        self.line_col(TextSize::from(offset as u32)).line + 1
    }

    /// Returns the byte offset where a line starts.
    pub fn line_start(&self, line: u32) -> Option<ByteOffset> {
        self.line_starts.get(line as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_text_is_one_line() {
        assert_eq!(LineIndex::new("").line_count(), 1);
    }

    #[test]
    fn test_trailing_newline_opens_a_line() {
        assert_eq!(LineIndex::new("a\nb").line_count(), 2);
        assert_eq!(LineIndex::new("a\nb\n").line_count(), 3);
    }

    #[test]
    fn test_crlf_counts_once() {
        let index = LineIndex::new("a\r\nb\r\nc");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_col(TextSize::from(3)), LineCol::new(1, 0));
    }

    #[test]
    fn test_line_col() {
        let index = LineIndex::new("hello\nworld\nfoo");
        assert_eq!(index.line_col(TextSize::from(0)), LineCol::new(0, 0));
        assert_eq!(index.line_col(TextSize::from(5)), LineCol::new(0, 5));
        assert_eq!(index.line_col(TextSize::from(6)), LineCol::new(1, 0));
        assert_eq!(index.line_col(TextSize::from(14)), LineCol::new(2, 2));
        assert_eq!(index.line_number(14), 3);
    }

    #[test]
    fn test_line_start() {
        let index = LineIndex::new("hello\nworld\n");
        assert_eq!(index.line_start(1), Some(TextSize::from(6)));
        assert_eq!(index.line_start(2), Some(TextSize::from(12)));
        assert_eq!(index.line_start(3), None);
    }
}
