//! Locating a page's top-level block list.

use crate::model::{Block, BlockGraph, PageRef, RecordMap};

/// Content of the page block itself, found by canonical id.
///
/// Record maps fetched for a post sometimes key the page under an id that
/// differs from the post's, or hold a stub of it without a `content` key;
/// the first `page` block in map order is used then. Returns an empty list
/// when neither is found.
pub fn resolve_page_content(page_id: &str, record_map: &RecordMap) -> Vec<String> {
    resolve_in_graph(page_id, &BlockGraph::new(record_map))
}

pub(crate) fn resolve_in_graph(page_id: &str, graph: &BlockGraph<'_>) -> Vec<String> {
    if let Some(value) = graph.value(page_id) {
        if let Some(content) = &value.content {
            return content.clone();
        }
        log::debug!("Page block {} carries no content list", page_id);
    }

    match graph
        .blocks_in_order()
        .find(|block| matches!(block, Block::Page(_)))
    {
        Some(page) => {
            log::debug!(
                "Page {} not keyed by its own id; using page block {}",
                page_id,
                page.id()
            );
            page.content().to_vec()
        }
        None => {
            log::debug!("No page block found for {}", page_id);
            Vec::new()
        }
    }
}

/// The list the walks start from: `page.content` when the caller supplied
/// it, otherwise whatever [`resolve_page_content`] finds.
pub(crate) fn top_level_ids(page: &PageRef, graph: &BlockGraph<'_>) -> Vec<String> {
    match &page.content {
        Some(content) => content.clone(),
        None => resolve_in_graph(&page.id, graph),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefers_block_keyed_by_page_id() {
        let map = RecordMap::from_value(json!({
            "block": {
                "other-page": { "value": { "id": "other-page", "type": "page", "content": ["x"] } },
                "550e8400-e29b-41d4-a716-446655440000": {
                    "value": {
                        "id": "550e8400-e29b-41d4-a716-446655440000",
                        "type": "page",
                        "content": ["a", "b"]
                    }
                }
            }
        }))
        .unwrap();

        assert_eq!(
            resolve_page_content("550e8400e29b41d4a716446655440000", &map),
            vec!["a", "b"]
        );
    }

    #[test]
    fn page_found_by_id_is_used_even_when_empty() {
        let map = RecordMap::from_value(json!({
            "block": {
                "first": { "value": { "id": "first", "type": "page", "content": ["x"] } },
                "me": { "value": { "id": "me", "type": "page", "content": [] } }
            }
        }))
        .unwrap();
        assert!(resolve_page_content("me", &map).is_empty());
    }

    #[test]
    fn page_without_content_key_falls_back_to_first_page() {
        let map = RecordMap::from_value(json!({
            "block": {
                "first": { "value": { "id": "first", "type": "page", "content": ["x"] } },
                "me": { "value": { "id": "me", "type": "page" } }
            }
        }))
        .unwrap();
        assert_eq!(resolve_page_content("me", &map), vec!["x"]);
    }

    #[test]
    fn nothing_to_find() {
        let map = RecordMap::from_value(json!({
            "block": { "t": { "value": { "id": "t", "type": "text" } } }
        }))
        .unwrap();
        assert!(resolve_page_content("whatever", &map).is_empty());
    }

    #[test]
    fn caller_supplied_content_wins() {
        let map = RecordMap::default();
        let graph = BlockGraph::new(&map);
        let page = PageRef::with_content("p", vec!["z".into()]);
        assert_eq!(top_level_ids(&page, &graph), vec!["z"]);
    }
}
