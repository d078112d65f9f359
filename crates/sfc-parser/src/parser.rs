//! Block scanner.
//!
//! Walks the file looking for depth-0 start tags. `<template>` content is
//! scanned as markup with an element stack so nested templates close
//! correctly. Every other block is raw text up to its closing tag.

use smol_str::SmolStr;
use source_map::Span;

use crate::descriptor::{Attribute, SfcBlock, SfcDescriptor, SfcStyleBlock};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::{PadOption, ParseOptions, ParseResult};

/// Elements whose content is raw text inside a template.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea"];

/// A start or end tag.
#[derive(Debug)]
struct Tag {
    name: SmolStr,
    start: usize,
    /// Offset just past the closing `>`.
    end: usize,
    closing: bool,
    self_closing: bool,
    attributes: Vec<Attribute>,
}

enum Markup {
    /// A comment, doctype or processing instruction ending at the offset.
    Skip(usize),
    Tag(Tag),
}

pub(crate) struct Parser<'src> {
    source: &'src str,
    options: ParseOptions,
    pos: usize,
    descriptor: SfcDescriptor,
    errors: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, options: ParseOptions) -> Self {
        Self {
            source,
            options,
            pos: 0,
            descriptor: SfcDescriptor::default(),
            errors: Vec::new(),
        }
    }

    pub fn parse(mut self) -> ParseResult {
        while let Some(start) = self.find_from(self.pos, "<") {
            match self.markup_at(start) {
                Some(Markup::Skip(end)) => self.pos = end,
                Some(Markup::Tag(tag)) => {
                    self.pos = tag.end;
                    // Stray end tags at the top level are ignored.
                    if !tag.closing {
                        self.read_block(tag);
                    }
                }
                None => self.pos = start + 1,
            }
        }

        ParseResult {
            descriptor: self.descriptor,
            errors: self.errors,
        }
    }

    fn find_from(&self, from: usize, needle: &str) -> Option<usize> {
        self.source
            .get(from..)
            .and_then(|rest| rest.find(needle))
            .map(|idx| from + idx)
    }

    fn error(&mut self, kind: ParseErrorKind, start: usize, end: usize) {
        self.errors
            .push(ParseError::new(kind, Span::from_range(start..end)));
    }

    /// Classifies the markup starting at a `<`. Returns `None` for a `<` that
    /// starts nothing, which is plain text.
    fn markup_at(&mut self, start: usize) -> Option<Markup> {
        let rest = &self.source[start..];
        if rest.starts_with("<!--") {
            return Some(match self.find_from(start + 4, "-->") {
                Some(end) => Markup::Skip(end + 3),
                None => {
                    self.error(ParseErrorKind::UnterminatedComment, start, self.source.len());
                    Markup::Skip(self.source.len())
                }
            });
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = self
                .find_from(start, ">")
                .map_or(self.source.len(), |end| end + 1);
            return Some(Markup::Skip(end));
        }
        self.read_tag(start).map(Markup::Tag)
    }

    fn read_tag(&mut self, start: usize) -> Option<Tag> {
        let mut lexer = Lexer::at(self.source, start);
        let first = lexer.next()?;
        let closing = match first.kind {
            TokenKind::TagOpen => false,
            TokenKind::CloseTagOpen => true,
            _ => return None,
        };
        let prefix = if closing { 2 } else { 1 };
        let name = SmolStr::new(&self.source[first.span.range()][prefix..]);

        let mut attributes = Vec::new();
        let mut pending: Option<Attribute> = None;
        let mut awaiting_value = false;

        for token in lexer {
            match token.kind {
                TokenKind::RAngle | TokenKind::SlashRAngle => {
                    attributes.extend(pending.take());
                    return Some(Tag {
                        name,
                        start,
                        end: token.span.range().end,
                        closing,
                        self_closing: token.kind == TokenKind::SlashRAngle,
                        attributes,
                    });
                }
                TokenKind::Eq => awaiting_value = pending.is_some(),
                TokenKind::Name | TokenKind::DoubleQuoted | TokenKind::SingleQuoted
                    if awaiting_value =>
                {
                    if let Some(mut attr) = pending.take() {
                        attr.value = Some(self.attribute_value(token));
                        attr.span = attr.span.cover(token.span);
                        attributes.push(attr);
                    }
                    awaiting_value = false;
                }
                TokenKind::Name => {
                    attributes.extend(pending.take());
                    pending = Some(Attribute {
                        span: token.span,
                        name: SmolStr::new(&self.source[token.span.range()]),
                        value: None,
                    });
                }
                TokenKind::TagOpen | TokenKind::CloseTagOpen | TokenKind::Eof => {
                    // The tag runs into the next tag or the end of the file.
                    let end = token.span.range().start;
                    self.error(
                        ParseErrorKind::UnclosedTag {
                            tag_name: name.to_string(),
                        },
                        start,
                        end,
                    );
                    attributes.extend(pending.take());
                    return Some(Tag {
                        name,
                        start,
                        end,
                        closing,
                        self_closing: false,
                        attributes,
                    });
                }
                TokenKind::DoubleQuoted
                | TokenKind::SingleQuoted
                | TokenKind::Slash
                | TokenKind::Error => {}
            }
        }
        None
    }

    fn attribute_value(&self, token: Token) -> String {
        let raw = &self.source[token.span.range()];
        if token.kind.is_quoted() {
            raw[1..raw.len() - 1].to_string()
        } else {
            raw.to_string()
        }
    }

    fn read_block(&mut self, tag: Tag) {
        let content_start = tag.end;
        if tag.self_closing {
            self.add_block(tag, content_start, content_start, content_start);
            return;
        }

        let found = if tag.name.eq_ignore_ascii_case("template") {
            self.find_template_end(content_start)
        } else {
            self.find_raw_text_end(content_start, &tag.name)
        };

        match found {
            Some((content_end, block_end)) => {
                self.pos = block_end;
                self.add_block(tag, content_start, content_end, block_end);
            }
            None => {
                self.error(
                    ParseErrorKind::UnclosedBlock {
                        tag_name: tag.name.to_string(),
                    },
                    tag.start,
                    tag.end,
                );
                self.pos = self.source.len();
            }
        }
    }

    /// Finds `</name` (ASCII case-insensitive) at or after `from`. Returns the
    /// offset of the end tag and the offset just past its `>`.
    fn find_raw_text_end(&self, from: usize, name: &str) -> Option<(usize, usize)> {
        let mut cursor = from;
        while let Some(at) = self.find_from(cursor, "</") {
            let name_start = at + 2;
            let name_end = name_start + name.len();
            let matches = self
                .source
                .get(name_start..name_end)
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
                && self.source[name_end..]
                    .chars()
                    .next()
                    .map_or(true, |c| c == '>' || c == '/' || c.is_ascii_whitespace());
            if matches {
                let end = self
                    .find_from(name_end, ">")
                    .map_or(self.source.len(), |end| end + 1);
                return Some((at, end));
            }
            cursor = name_start;
        }
        None
    }

    /// Finds the `</template>` closing a top-level template.
    ///
    /// An end tag closes the nearest open element with the same name and
    /// everything opened after it, so unclosed inner elements such as `<br>`
    /// need no special casing.
    fn find_template_end(&mut self, from: usize) -> Option<(usize, usize)> {
        let mut open: Vec<SmolStr> = Vec::new();
        let mut cursor = from;

        while let Some(start) = self.find_from(cursor, "<") {
            match self.markup_at(start) {
                Some(Markup::Skip(end)) => cursor = end,
                Some(Markup::Tag(tag)) if tag.closing => {
                    cursor = tag.end;
                    match open
                        .iter()
                        .rposition(|name| name.eq_ignore_ascii_case(&tag.name))
                    {
                        Some(idx) => open.truncate(idx),
                        None if tag.name.eq_ignore_ascii_case("template") => {
                            return Some((start, tag.end));
                        }
                        None => {}
                    }
                }
                Some(Markup::Tag(tag)) => {
                    cursor = tag.end;
                    if tag.self_closing {
                        continue;
                    }
                    if is_raw_text_element(&tag.name) {
                        let (_, end) = self.find_raw_text_end(tag.end, &tag.name)?;
                        cursor = end;
                    } else {
                        open.push(tag.name);
                    }
                }
                None => cursor = start + 1,
            }
        }
        None
    }

    fn add_block(&mut self, tag: Tag, content_start: usize, content_end: usize, end: usize) {
        let mut block = SfcBlock {
            tag: tag.name,
            span: Span::from_range(tag.start..end),
            content_span: Span::from_range(content_start..content_end),
            content: String::new(),
            attributes: tag.attributes,
        };
        let padding = self.padding(&block, content_start);
        block.content = padding + &self.source[content_start..content_end];

        let kind = block.tag.to_ascii_lowercase();
        match kind.as_str() {
            "template" if self.descriptor.template.is_some() => self.duplicate(&block),
            "template" => self.descriptor.template = Some(block),
            "script" if self.descriptor.script.is_some() => self.duplicate(&block),
            "script" => self.descriptor.script = Some(block),
            "style" => self.descriptor.styles.push(SfcStyleBlock::new(block)),
            _ => self.descriptor.custom_blocks.push(block),
        }
    }

    fn duplicate(&mut self, block: &SfcBlock) {
        self.errors.push(ParseError::new(
            ParseErrorKind::DuplicateBlock {
                tag_name: block.tag.to_string(),
            },
            block.span,
        ));
    }

    /// Text prepended to a block so that its line `n` is line `n` of the file.
    /// Templates are never padded.
    fn padding(&self, block: &SfcBlock, content_start: usize) -> String {
        if block.tag.eq_ignore_ascii_case("template") {
            return String::new();
        }
        let before = &self.source[..content_start];
        match self.options.pad {
            PadOption::NoPad => String::new(),
            PadOption::Line => {
                let line = if block.tag.eq_ignore_ascii_case("script") && block.lang().is_none() {
                    "//\n"
                } else {
                    "\n"
                };
                line.repeat(before.matches('\n').count())
            }
            PadOption::Space => before
                .chars()
                .map(|c| if c == '\n' { '\n' } else { ' ' })
                .collect(),
        }
    }
}

fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS
        .iter()
        .any(|raw| raw.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use crate::{parse, parse_with_options, PadOption, ParseErrorKind, ParseOptions};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_templates_close_in_order() {
        let source = "<template><div><template v-if=\"a\"><p/></template></div></template>";
        let result = parse(source);
        assert!(result.errors.is_empty());
        assert_eq!(
            result.descriptor.template.map(|t| t.content),
            Some("<div><template v-if=\"a\"><p/></template></div>".to_string())
        );
    }

    #[test]
    fn test_unclosed_inner_elements() {
        let source = "<template><div><br><img src=\"a.png\"></div></template>\n<script>x</script>";
        let result = parse(source);
        let descriptor = result.descriptor;
        assert_eq!(
            descriptor.template.map(|t| t.content),
            Some("<div><br><img src=\"a.png\"></div>".to_string())
        );
        assert_eq!(descriptor.script.map(|s| s.content), Some("x".to_string()));
    }

    #[test]
    fn test_script_is_raw_text() {
        let source = "<script>if (a < b && '</div>') {}</script>";
        let result = parse(source);
        assert_eq!(
            result.descriptor.script.map(|s| s.content),
            Some("if (a < b && '</div>') {}".to_string())
        );
    }

    #[test]
    fn test_raw_text_inside_template() {
        let source = "<template><div><textarea></template></textarea></div></template>";
        let result = parse(source);
        assert_eq!(
            result.descriptor.template.map(|t| t.content),
            Some("<div><textarea></template></textarea></div>".to_string())
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let source = "<!-- <script>nope</script> -->\n<script>yes</script>";
        let result = parse(source);
        assert_eq!(
            result.descriptor.script.map(|s| s.content),
            Some("yes".to_string())
        );
    }

    #[test]
    fn test_duplicate_script_keeps_first() {
        let result = parse("<script>one</script><script>two</script>");
        assert_eq!(
            result.descriptor.script.map(|s| s.content),
            Some("one".to_string())
        );
        assert_eq!(
            result.errors.iter().map(|e| e.kind.clone()).collect::<Vec<_>>(),
            vec![ParseErrorKind::DuplicateBlock {
                tag_name: "script".to_string()
            }]
        );
    }

    #[test]
    fn test_unclosed_block_is_dropped() {
        let result = parse("<template><div></div></template><script>let a = 1");
        assert!(result.descriptor.script.is_none());
        assert!(result.descriptor.template.is_some());
        assert!(matches!(
            result.errors[0].kind,
            ParseErrorKind::UnclosedBlock { .. }
        ));
    }

    #[test]
    fn test_line_padding_for_plain_script() {
        let source = "<template>\n  <div/>\n</template>\n<script>\nexport default {}\n</script>";
        let result = parse_with_options(source, ParseOptions { pad: PadOption::Line });
        assert_eq!(
            result.descriptor.script.map(|s| s.content),
            Some("//\n//\n//\n\nexport default {}\n".to_string())
        );
    }

    #[test]
    fn test_line_padding_for_typed_script() {
        let source = "<template/>\n<script lang=\"ts\">\nlet a = 1\n</script>";
        let result = parse_with_options(source, ParseOptions { pad: PadOption::Line });
        assert_eq!(
            result.descriptor.script.map(|s| s.content),
            Some("\n\nlet a = 1\n".to_string())
        );
    }

    #[test]
    fn test_space_padding() {
        let source = "<i>\n</i><style>a{}</style>";
        let result = parse_with_options(source, ParseOptions { pad: PadOption::Space });
        assert_eq!(
            result.descriptor.styles[0].block.content,
            "   \n           a{}".to_string()
        );
    }

    #[test]
    fn test_template_is_never_padded() {
        let source = "\n\n<template><p/></template>";
        let result = parse_with_options(source, ParseOptions { pad: PadOption::Line });
        assert_eq!(
            result.descriptor.template.map(|t| t.content),
            Some("<p/>".to_string())
        );
    }
}
