//! CSV export of registered spans and brace-delimited nested text

use std::io::Write;

use crate::error::ExportError;
use crate::registry::SpanRegistry;

/// Header row of every export
pub const HEADER: [&str; 2] = ["Word/Phrase", "Category"];

/// Category value written for brace-delimited substrings
pub const NESTED_CATEGORY: &str = "nested";

/// Collect every `{...}` substring, trimmed, left to right.
///
/// Each `{` pairs with the next `}` after it; scanning resumes after that
/// `}`. An unterminated `{` ends the scan.
pub fn extract_nested(text: &str) -> Vec<&str> {
    let mut nested = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        let after_open = &rest[open + 1..];
        match after_open.find('}') {
            Some(close) => {
                nested.push(after_open[..close].trim());
                rest = &after_open[close + 1..];
            }
            None => break,
        }
    }

    nested
}

/// Write the header, one row per registry entry and one row per nested
/// substring of `buffer`. Returns the number of data rows written.
pub fn write_csv<W: Write>(
    writer: W,
    registry: &SpanRegistry,
    buffer: &str,
) -> Result<usize, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADER)?;

    let mut rows = 0;
    for entry in registry.iter() {
        wtr.serialize(entry)?;
        rows += 1;
    }

    for nested in extract_nested(buffer) {
        wtr.write_record([nested, NESTED_CATEGORY])?;
        rows += 1;
    }

    wtr.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn to_string(registry: &SpanRegistry, buffer: &str) -> String {
        let mut out = Vec::new();
        write_csv(&mut out, registry, buffer).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_extract_nested_pairs() {
        let text = "I {get ready}, so {  brush teeth } and done";
        assert_eq!(extract_nested(text), vec!["get ready", "brush teeth"]);
    }

    #[test]
    fn test_unterminated_brace_yields_nothing() {
        assert!(extract_nested("abc {def ghi").is_empty());
        assert_eq!(extract_nested("{a} then {b"), vec!["a"]);
    }

    #[test]
    fn test_inner_open_brace_is_content() {
        // First-match pairing: the second `{` belongs to the first pair
        assert_eq!(extract_nested("{a {b} c}"), vec!["a {b"]);
        assert_eq!(extract_nested("} {x}"), vec!["x"]);
        assert_eq!(extract_nested("{}"), vec![""]);
    }

    #[test]
    fn test_header_only_for_empty_session() {
        let csv = to_string(&SpanRegistry::new(), "");
        assert_eq!(csv, "Word/Phrase,Category\r\n");
    }

    #[test]
    fn test_rows_are_quoted_when_needed() {
        let mut registry = SpanRegistry::new();
        registry.insert("store", Category::Place);
        registry.insert("\"quoted\"", Category::EmotionThought);

        let csv = to_string(&registry, "I went to the {store, then came home}");
        let lines: Vec<_> = csv.split("\r\n").collect();
        assert_eq!(lines[0], "Word/Phrase,Category");
        assert_eq!(lines[1], "store,Place");
        assert_eq!(lines[2], "\"\"\"quoted\"\"\",Emotion/Thought");
        assert_eq!(lines[3], "\"store, then came home\",nested");
    }

    #[test]
    fn test_row_count_excludes_header() {
        let mut registry = SpanRegistry::new();
        registry.insert("x", Category::Time);
        let rows = write_csv(Vec::new(), &registry, "{a} {b}").unwrap();
        assert_eq!(rows, 3);
    }
}
