//! Block extractor for single-file components.
//!
//! Splits a component file into its top-level `<template>`, `<script>`,
//! `<style>` and custom blocks. Block content is kept exactly as written so
//! that line numbers stay meaningful downstream; [`PadOption::Line`] goes one
//! step further and pads the content so that its line `n` is line `n` of the
//! file.
//!
//! # Example
//!
//! ```
//! use sfc_parser::{parse_with_options, PadOption, ParseOptions};
//!
//! let source = "<template>\n  <p>{{ msg }}</p>\n</template>\n<script lang=\"ts\">\nexport default {}\n</script>\n";
//!
//! let result = parse_with_options(source, ParseOptions { pad: PadOption::Line });
//! let script = result.descriptor.script.unwrap();
//! assert_eq!(script.lang(), Some("ts"));
//! assert_eq!(script.content.lines().nth(4), Some("export default {}"));
//! ```

mod descriptor;
mod error;
mod lexer;
mod parser;

pub use descriptor::{Attribute, SfcBlock, SfcDescriptor, SfcStyleBlock};
pub use error::{ParseError, ParseErrorKind};
pub use lexer::{Lexer, Token, TokenKind};
pub use source_map::Span;

/// How block content is padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PadOption {
    /// One padding line per file line before the content: `//` for a script
    /// without `lang`, empty otherwise.
    Line,
    /// Every character before the content replaced by a space, newlines kept.
    Space,
    #[default]
    NoPad,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub pad: PadOption,
}

/// The result of extracting blocks from a component file.
#[derive(Debug)]
pub struct ParseResult {
    pub descriptor: SfcDescriptor,
    /// Problems found along the way. Affected blocks are skipped.
    pub errors: Vec<ParseError>,
}

/// Extracts the blocks of a component file without padding.
pub fn parse(source: &str) -> ParseResult {
    parse_with_options(source, ParseOptions::default())
}

pub fn parse_with_options(source: &str, options: ParseOptions) -> ParseResult {
    parser::Parser::new(source, options).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_empty() {
        let result = parse("");
        assert!(result.errors.is_empty());
        assert_eq!(result.descriptor, SfcDescriptor::default());
    }

    #[test]
    fn test_blocks_are_optional() {
        let result = parse("<template><div/></template>");
        assert!(result.descriptor.script.is_none());
        assert!(result.descriptor.template.is_some());

        let result = parse("<script>export default {}</script>");
        assert!(result.descriptor.template.is_none());
        assert!(result.descriptor.script.is_some());
    }

    #[test]
    fn test_block_attributes() {
        let result = parse(
            "<template lang=pug>p hi</template>\n<style scoped module>a{}</style>\n<style module=\"classes\"></style>",
        );
        let descriptor = result.descriptor;
        let template = descriptor.template.unwrap();
        assert_eq!(template.lang(), Some("pug"));
        assert_eq!(template.content, "p hi");

        assert_eq!(descriptor.styles.len(), 2);
        assert!(descriptor.styles[0].scoped);
        assert_eq!(descriptor.styles[0].module.as_deref(), Some("$style"));
        assert!(!descriptor.styles[1].scoped);
        assert_eq!(descriptor.styles[1].module.as_deref(), Some("classes"));
    }

    #[test]
    fn test_empty_lang_is_absent() {
        let result = parse("<script lang=\"\">a</script>");
        assert_eq!(result.descriptor.script.unwrap().lang(), None);
    }

    #[test]
    fn test_custom_blocks() {
        let result = parse("<docs>\n# Title\n</docs>\n<i18n lang=\"json\">{}</i18n>");
        let names: Vec<_> = result
            .descriptor
            .custom_blocks
            .iter()
            .map(|b| b.tag.as_str())
            .collect();
        assert_eq!(names, vec!["docs", "i18n"]);
    }

    #[test]
    fn test_content_span_points_into_source() {
        let source = "<script>\nlet a = 1\n</script>";
        let script = parse(source).descriptor.script.unwrap();
        assert_eq!(script.content_span.text(source), Some("\nlet a = 1\n"));
        assert_eq!(script.span.text(source), Some(source));
    }
}
