//! Blocks of a single-file component.

use smol_str::SmolStr;
use source_map::Span;

/// An attribute on a block's start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub span: Span,
    pub name: SmolStr,
    /// Unquoted value, `None` for a bare attribute such as `scoped`.
    pub value: Option<String>,
}

/// A top-level block such as `<script>` or `<template>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfcBlock {
    /// Tag name as written.
    pub tag: SmolStr,
    /// From the `<` of the start tag to the end of the closing tag.
    pub span: Span,
    /// The text between the start tag and the closing tag.
    pub content_span: Span,
    /// Block content, including any padding requested through
    /// [`crate::PadOption`].
    pub content: String,
    pub attributes: Vec<Attribute>,
}

impl SfcBlock {
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// The declared dialect tag. An empty `lang=""` counts as absent.
    pub fn lang(&self) -> Option<&str> {
        self.attr("lang")
            .and_then(|a| a.value.as_deref())
            .filter(|lang| !lang.is_empty())
    }

    pub fn src(&self) -> Option<&str> {
        self.attr("src").and_then(|a| a.value.as_deref())
    }
}

/// A `<style>` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfcStyleBlock {
    pub scoped: bool,
    /// CSS modules binding name, `$style` for a bare `module` attribute.
    pub module: Option<String>,
    pub block: SfcBlock,
}

impl SfcStyleBlock {
    pub(crate) fn new(block: SfcBlock) -> Self {
        let module = block.attr("module").map(|a| match a.value.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => "$style".to_string(),
        });
        Self {
            scoped: block.has_attr("scoped"),
            module,
            block,
        }
    }
}

/// All blocks found in a component file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SfcDescriptor {
    pub template: Option<SfcBlock>,
    pub script: Option<SfcBlock>,
    pub styles: Vec<SfcStyleBlock>,
    /// Any other top-level block, e.g. `<docs>` or `<i18n>`.
    pub custom_blocks: Vec<SfcBlock>,
}
