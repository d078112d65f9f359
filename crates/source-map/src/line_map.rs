//! Line-granular source maps in the v3 format.

use serde::Serialize;

use crate::vlq::encode_vlq;

/// One generated line mapped to one original line, column 0 on both sides.
///
/// Lines are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMapping {
    pub generated_line: u32,
    pub original_line: u32,
    /// Index into [`SourceMap::sources`].
    pub source: u32,
}

/// A source map mapping whole lines of a generated file back to its sources.
///
/// Serializes to the standard v3 JSON shape with VLQ-encoded `mappings`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMap {
    file: Option<String>,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    /// Sorted by generated line.
    mappings: Vec<LineMapping>,
}

impl SourceMap {
    pub fn builder() -> SourceMapBuilder {
        SourceMapBuilder::default()
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn sources_content(&self) -> &[Option<String>] {
        &self.sources_content
    }

    pub fn mappings(&self) -> &[LineMapping] {
        &self.mappings
    }

    /// Finds the original line of a generated line.
    pub fn original_line(&self, generated_line: u32) -> Option<u32> {
        self.mappings
            .binary_search_by_key(&generated_line, |m| m.generated_line)
            .ok()
            .map(|idx| self.mappings[idx].original_line)
    }

    /// Finds the generated line of an original line in the given source.
    pub fn generated_line(&self, source: u32, original_line: u32) -> Option<u32> {
        self.mappings
            .iter()
            .find(|m| m.source == source && m.original_line == original_line)
            .map(|m| m.generated_line)
    }

    /// Encodes the mappings into the v3 `mappings` string.
    ///
    /// Each segment carries four fields: generated column (reset per line),
    /// then source index, original line and original column relative to the
    /// previous segment.
    pub fn encoded_mappings(&self) -> String {
        let mut out = String::new();
        let mut line = 0u32;
        let mut first_on_line = true;
        let mut prev_source = 0i64;
        let mut prev_original_line = 0i64;

        for mapping in &self.mappings {
            while line < mapping.generated_line {
                out.push(';');
                line += 1;
                first_on_line = true;
            }
            if !first_on_line {
                out.push(',');
            }
            encode_vlq(0, &mut out);
            encode_vlq(i64::from(mapping.source) - prev_source, &mut out);
            encode_vlq(
                i64::from(mapping.original_line) - prev_original_line,
                &mut out,
            );
            encode_vlq(0, &mut out);

            prev_source = i64::from(mapping.source);
            prev_original_line = i64::from(mapping.original_line);
            first_on_line = false;
        }

        out
    }

    /// Serializes the map to v3 JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceMap<'a> {
    version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<&'a str>,
    sources: &'a [String],
    sources_content: &'a [Option<String>],
    names: [&'a str; 0],
    mappings: String,
}

impl Serialize for SourceMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawSourceMap {
            version: 3,
            file: self.file.as_deref(),
            sources: &self.sources,
            sources_content: &self.sources_content,
            names: [],
            mappings: self.encoded_mappings(),
        }
        .serialize(serializer)
    }
}

/// Builds a [`SourceMap`] one line mapping at a time.
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    map: SourceMap,
}

impl SourceMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of the generated file.
    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.map.file = Some(file.into());
        self
    }

    /// Registers a source and returns its index.
    pub fn add_source(&mut self, name: impl Into<String>) -> u32 {
        self.map.sources.push(name.into());
        self.map.sources_content.push(None);
        (self.map.sources.len() - 1) as u32
    }

    /// Embeds the full text of a registered source.
    pub fn set_source_content(&mut self, source: u32, content: impl Into<String>) {
        if let Some(slot) = self.map.sources_content.get_mut(source as usize) {
            *slot = Some(content.into());
        }
    }

    /// Maps a generated line to an original line of `source`.
    pub fn add_line_mapping(&mut self, generated_line: u32, original_line: u32, source: u32) {
        self.map.mappings.push(LineMapping {
            generated_line,
            original_line,
            source,
        });
    }

    pub fn build(mut self) -> SourceMap {
        self.map.mappings.sort_by_key(|m| m.generated_line);
        self.map
    }
}
