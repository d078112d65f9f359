//! Extraction error types.

use source_map::Span;
use thiserror::Error;

/// A problem found while extracting blocks.
///
/// Extraction never fails outright: the offending block is skipped and the
/// error is returned next to the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Where the problem was found.
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A second `<script>` or `<template>` block. The first one is kept.
    #[error("duplicate <{tag_name}> block, only the first one is used")]
    DuplicateBlock { tag_name: String },

    /// A top-level block without its closing tag.
    #[error("unclosed block: <{tag_name}>")]
    UnclosedBlock { tag_name: String },

    /// A start tag that runs into the end of the file.
    #[error("unclosed tag: <{tag_name}")]
    UnclosedTag { tag_name: String },

    #[error("unterminated comment")]
    UnterminatedComment,
}
