//! Line-preserving text edits.
//!
//! Every edit keeps the number of newlines of the text it replaces, so line
//! `n` of the rewritten script is line `n` of the original.

use std::ops::Range;

#[derive(Debug)]
struct Edit {
    range: Range<usize>,
    text: String,
}

/// A set of non-overlapping edits against one source text.
#[derive(Debug)]
pub(crate) struct Edits<'a> {
    source: &'a str,
    edits: Vec<Edit>,
}

impl<'a> Edits<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    /// Inserts single-line text at `at`.
    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.edits.push(Edit {
            range: at..at,
            text: text.into(),
        });
    }

    /// Replaces every character of `range` except newlines with a space.
    pub fn blank(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let text = self.source[range.clone()]
            .chars()
            .map(|c| match c {
                '\n' | '\r' => c,
                _ => ' ',
            })
            .collect::<String>();
        self.edits.push(Edit { range, text });
    }

    /// Replaces `range` with `text`, appending newlines so the line count of
    /// the replaced region survives. `text` must not contain more lines than
    /// the region.
    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) {
        let mut text = text.into();
        let lost = self.source[range.clone()].matches('\n').count();
        let kept = text.matches('\n').count();
        debug_assert!(kept <= lost, "replacement adds lines");
        for _ in kept..lost {
            text.push('\n');
        }
        self.edits.push(Edit { range, text });
    }

    /// Applies all edits. Edits overlapping an earlier one are dropped.
    pub fn apply(mut self) -> String {
        self.edits.sort_by_key(|edit| (edit.range.start, edit.range.end));

        let mut out = String::with_capacity(self.source.len() + 64);
        let mut cursor = 0;
        for edit in self.edits {
            if edit.range.start < cursor {
                continue;
            }
            out.push_str(&self.source[cursor..edit.range.start]);
            out.push_str(&edit.text);
            cursor = edit.range.end;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}
