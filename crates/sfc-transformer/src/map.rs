//! Line source maps for assembled modules.

use camino::Utf8Path;
use source_map::{LineIndex, SourceMap};

/// Maps every line of `original_script` to the line it lands on in the
/// assembled module, with the component file as the only source.
pub fn generate_map(
    original_script: &str,
    script_start_line: u32,
    path: &str,
    source: &str,
) -> SourceMap {
    let name = Utf8Path::new(path).file_name().unwrap_or(path);

    let mut builder = SourceMap::builder();
    let source_id = builder.add_source(name);
    builder.set_source_content(source_id, source);

    let line_count = LineIndex::new(original_script).line_count() as u32;
    for line in 0..line_count {
        builder.add_line_mapping(line + script_start_line, line, source_id);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lines_are_offset() {
        let map = generate_map("a\nb\nc", 1, "src/components/Foo.vue", "<script>...");
        assert_eq!(map.sources(), ["Foo.vue".to_string()]);
        assert_eq!(map.sources_content(), [Some("<script>...".to_string())]);
        assert_eq!(map.original_line(1), Some(0));
        assert_eq!(map.original_line(3), Some(2));
        assert_eq!(map.original_line(0), None);
        assert_eq!(map.encoded_mappings(), ";AAAA;AACA;AACA");
    }

    #[test]
    fn test_empty_script_is_one_line() {
        let map = generate_map("", 1, "Foo.vue", "");
        assert_eq!(map.mappings().len(), 1);
    }
}
