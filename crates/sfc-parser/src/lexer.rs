//! Tag lexer built on `logos`.
//!
//! Only the inside of start and end tags is tokenized. Text between tags is
//! skipped by the block scanner without lexing it, since script and style
//! contents are raw text.

use logos::Logos;
use source_map::Span;
use text_size::TextSize;

/// Token kinds inside a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    /// `<name`
    #[regex(r"<[A-Za-z][^\s/>]*")]
    TagOpen,

    /// `</name`
    #[regex(r"</[A-Za-z][^\s/>]*")]
    CloseTagOpen,

    #[token(">")]
    RAngle,

    #[token("/>")]
    SlashRAngle,

    #[token("=")]
    Eq,

    #[regex(r#""[^"]*""#)]
    DoubleQuoted,

    #[regex(r"'[^']*'")]
    SingleQuoted,

    /// Attribute names and unquoted attribute values.
    #[regex(r#"[^\s"'<>/=]+"#)]
    Name,

    /// A `/` that does not close the tag.
    #[token("/")]
    Slash,

    /// End of input.
    Eof,

    #[default]
    Error,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::TagOpen => "'<tag'",
            TokenKind::CloseTagOpen => "'</tag'",
            TokenKind::RAngle => "'>'",
            TokenKind::SlashRAngle => "'/>'",
            TokenKind::Eq => "'='",
            TokenKind::DoubleQuoted | TokenKind::SingleQuoted => "quoted value",
            TokenKind::Name => "name",
            TokenKind::Slash => "'/'",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "error",
        }
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self, TokenKind::DoubleQuoted | TokenKind::SingleQuoted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Absolute span in the component file.
    pub span: Span,
}

/// Lexes tag tokens starting at a byte offset of the component file.
///
/// Spans are reported relative to the whole file, not to the starting offset.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    base: usize,
    end: usize,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::at(source, 0)
    }

    /// Starts lexing at `offset`, which must be a char boundary.
    pub fn at(source: &'src str, offset: usize) -> Self {
        let rest = source.get(offset..).unwrap_or("");
        Self {
            inner: TokenKind::lexer(rest),
            base: offset,
            end: offset + rest.len(),
            finished: false,
        }
    }

    /// Returns the text of the current token.
    pub fn slice(&self) -> &'src str {
        self.inner.slice()
    }

    fn span(&self, range: std::ops::Range<usize>) -> Span {
        Span::new(
            TextSize::from((self.base + range.start) as u32),
            TextSize::from((self.base + range.end) as u32),
        )
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(result) => {
                let kind = result.unwrap_or(TokenKind::Error);
                Some(Token {
                    kind,
                    span: self.span(self.inner.span()),
                })
            }
            None => {
                self.finished = true;
                Some(Token {
                    kind: TokenKind::Eof,
                    span: Span::empty(TextSize::from(self.end as u32)),
                })
            }
        }
    }
}
