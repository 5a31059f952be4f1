//! Flattens a page into one plain-text string for search and feeds.

use super::page::top_level_ids;
use super::walker::walk;
use crate::constants::TEXT_SEGMENT_DELIMITER;
use crate::model::{
    BlockCommon, BlockGraph, BlockVisitor, HeadingBlock, OtherBlock, PageBlock, PageRef,
    RecordMap, TextBlock,
};

/// Collects the title text of every visited block, one segment per block.
///
/// Synced-block references and containers have no text of their own; the
/// walk substitutes what they point at or hold.
#[derive(Debug, Default)]
struct TextCollector {
    segments: Vec<String>,
}

impl TextCollector {
    fn push(&mut self, common: &BlockCommon<'_>) {
        if common.title.is_empty() {
            return;
        }
        self.segments.push(common.title.plain_text());
    }

    fn finish(self) -> String {
        self.segments.join(TEXT_SEGMENT_DELIMITER)
    }
}

impl BlockVisitor for TextCollector {
    fn visit_text(&mut self, block: &TextBlock<'_>) {
        self.push(&block.common);
    }
    fn visit_heading(&mut self, block: &HeadingBlock<'_>) {
        self.push(&block.common);
    }
    fn visit_page(&mut self, block: &PageBlock<'_>) {
        self.push(&block.common);
    }
    fn visit_other(&mut self, block: &OtherBlock<'_>) {
        self.push(&block.common);
    }
}

/// Returns all readable text of `page`, block texts joined by newlines.
///
/// Missing blocks and dangling synced-block pointers contribute nothing;
/// an empty or unresolvable page yields `""`.
pub fn extract_text(page: &PageRef, record_map: &RecordMap) -> String {
    let graph = BlockGraph::new(record_map);
    extract_text_from_graph(page, &graph)
}

/// Same as [`extract_text`] over an already built graph.
pub fn extract_text_from_graph(page: &PageRef, graph: &BlockGraph<'_>) -> String {
    let ids = top_level_ids(page, graph);
    let mut collector = TextCollector::default();
    walk(graph, &ids, &mut collector);
    collector.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reference_without_target_yields_empty_string() {
        let map = RecordMap::from_value(json!({
            "block": {
                "block-1": {
                    "value": {
                        "id": "block-1",
                        "type": "transclusion_reference",
                        "format": { "transclusion_reference_pointer": { "id": "missing-block" } }
                    }
                }
            }
        }))
        .unwrap();
        let page = PageRef::with_content("post-id", vec!["block-1".into()]);
        assert_eq!(extract_text(&page, &map), "");
    }

    #[test]
    fn blank_titles_add_no_empty_segments() {
        let map = RecordMap::from_value(json!({
            "block": {
                "a": { "value": { "id": "a", "type": "text", "properties": { "title": [["A"]] } } },
                "divider": { "value": { "id": "divider", "type": "divider" } },
                "b": { "value": { "id": "b", "type": "text", "properties": { "title": [] } } },
                "c": { "value": { "id": "c", "type": "code", "properties": { "title": [["let x = 1;"]], "language": [["Rust"]] } } }
            }
        }))
        .unwrap();
        let page = PageRef::with_content(
            "p",
            vec!["a".into(), "divider".into(), "b".into(), "c".into()],
        );
        assert_eq!(extract_text(&page, &map), "A\nlet x = 1;");
    }
}
