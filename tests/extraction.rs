// tests/extraction.rs
//! End-to-end checks of the block-graph extractors against record-map
//! fixtures and small hand-built maps.

use notion_content::{
    build_toc, canonical_block_key, extract_text, measure_record_map, normalize_indent_levels,
    resolve_page_content, sanitize, sanitize_report, PageRef, RecordMap,
};
use pretty_assertions::assert_eq;
use serde_json::json;

const PAGE_ID: &str = "5f3c2a10-0000-4000-8000-000000000001";
const COMPACT_PAGE_ID: &str = "5f3c2a10000040008000000000000001";

fn synced_page() -> RecordMap {
    RecordMap::from_json_str(include_str!("fixtures/synced_page.json"))
        .expect("fixture should parse")
}

fn map(value: serde_json::Value) -> RecordMap {
    RecordMap::from_value(value).expect("test map should parse")
}

#[test]
fn empty_record_map_yields_nothing() {
    let empty = RecordMap::default();
    let page = PageRef::new("any-page");

    assert_eq!(extract_text(&page, &empty), "");
    assert!(build_toc(&page, &empty).is_empty());
    assert!(resolve_page_content("any-page", &empty).is_empty());
}

#[test]
fn text_follows_document_order() {
    let record_map = map(json!({
        "block": {
            "p": { "value": { "id": "p", "type": "page", "content": ["x", "y"] } },
            "y": { "value": { "id": "y", "type": "text", "properties": { "title": [["World"]] } } },
            "x": { "value": { "id": "x", "type": "text", "properties": { "title": [["Hello"]] } } }
        }
    }));

    assert_eq!(extract_text(&PageRef::new("p"), &record_map), "Hello\nWorld");
}

#[test]
fn missing_transclusion_target_yields_empty_text() {
    let record_map = map(json!({
        "block": {
            "p": { "value": { "id": "p", "type": "page", "content": ["r"] } },
            "r": {
                "value": {
                    "id": "r",
                    "type": "transclusion_reference",
                    "format": { "transclusion_reference_pointer": { "id": "nowhere" } }
                }
            }
        }
    }));
    let page = PageRef::new("p");

    assert_eq!(extract_text(&page, &record_map), "");
    assert!(build_toc(&page, &record_map).is_empty());
}

#[test]
fn synced_page_text_expands_every_reference() {
    let text = extract_text(&PageRef::new(PAGE_ID), &synced_page());

    insta::assert_snapshot!(text, @r###"
    Getting started
    Install the toolchain first.
    Before you begin
    Shared setup
    Run cargo build in the project root.
    Shared setup
    Run cargo build in the project root.
    Next steps
    rustc --explain E0382
    "###);
}

#[test]
fn heading_reached_through_two_references_is_listed_once() {
    let toc = build_toc(&PageRef::new(PAGE_ID), &synced_page());

    let outline: Vec<(&str, &str, usize)> = toc
        .iter()
        .map(|entry| (entry.text.as_str(), entry.block_type.as_str(), entry.indent_level))
        .collect();
    assert_eq!(
        outline,
        vec![
            ("Getting started", "header", 0),
            ("Before you begin", "sub_sub_header", 1),
            ("Shared setup", "sub_header", 1),
            ("Next steps", "sub_header", 1),
        ]
    );
    assert_eq!(toc[2].id, "5f3c2a10-0000-4000-8000-000000000006");
}

#[test]
fn toc_serializes_with_camel_case_keys() {
    let toc = build_toc(&PageRef::new(PAGE_ID), &synced_page());
    let value = serde_json::to_value(&toc[0]).unwrap();

    assert_eq!(
        value,
        json!({
            "id": "5f3c2a10-0000-4000-8000-000000000002",
            "type": "header",
            "text": "Getting started",
            "indentLevel": 0
        })
    );
}

#[test]
fn indent_levels_never_jump_more_than_one() {
    assert_eq!(normalize_indent_levels(&[0, 2, 1]), vec![0, 1, 1]);
    assert_eq!(normalize_indent_levels(&[1, 2, 0, 2]), vec![0, 1, 0, 1]);

    let normalized = normalize_indent_levels(&[2, 0, 2, 2, 1, 0, 1, 2]);
    for pair in normalized.windows(2) {
        assert!(pair[1] <= pair[0] + 1, "jump in {:?}", normalized);
    }
}

#[test]
fn every_id_spelling_maps_to_one_key() {
    for spelling in [
        PAGE_ID,
        COMPACT_PAGE_ID,
        "5F3C2A10000040008000000000000001",
        "  5f3c2a10-0000-4000-8000-000000000001 ",
        "https://www.notion.so/Setting-up-a-Rust-workspace-5f3c2a10000040008000000000000001",
    ] {
        assert_eq!(canonical_block_key(spelling), PAGE_ID, "{}", spelling);
    }
    assert_eq!(canonical_block_key(" block-a "), "block-a");
}

#[test]
fn compact_and_hyphenated_ids_resolve_to_the_same_block() {
    let record_map = synced_page();

    assert_eq!(
        resolve_page_content(COMPACT_PAGE_ID, &record_map),
        resolve_page_content(PAGE_ID, &record_map)
    );
    assert_eq!(
        extract_text(&PageRef::new(COMPACT_PAGE_ID), &record_map),
        extract_text(&PageRef::new(PAGE_ID), &record_map)
    );
}

#[test]
fn unknown_page_id_falls_back_to_first_page_block() {
    let record_map = synced_page();

    assert_eq!(
        resolve_page_content("not-in-this-map", &record_map).len(),
        9
    );
    assert_eq!(
        extract_text(&PageRef::new("not-in-this-map"), &record_map),
        extract_text(&PageRef::new(PAGE_ID), &record_map)
    );
}

#[test]
fn supplied_content_overrides_page_lookup() {
    let page = PageRef::with_content(
        PAGE_ID,
        vec![
            "5f3c2a10-0000-4000-8000-00000000000b".to_string(),
            "5f3c2a10-0000-4000-8000-000000000002".to_string(),
        ],
    );

    assert_eq!(
        extract_text(&page, &synced_page()),
        "Next steps\nGetting started"
    );
}

#[test]
fn cycles_terminate() {
    let record_map = map(json!({
        "block": {
            "p": { "value": { "id": "p", "type": "page", "content": ["a", "loop"] } },
            "a": {
                "value": { "id": "a", "type": "text", "properties": { "title": [["A"]] }, "content": ["b"] }
            },
            "b": {
                "value": { "id": "b", "type": "text", "properties": { "title": [["B"]] }, "content": ["a"] }
            },
            "loop": {
                "value": {
                    "id": "loop",
                    "type": "transclusion_reference",
                    "format": { "transclusion_reference_pointer": { "id": "loop" } }
                }
            }
        }
    }));
    let page = PageRef::new("p");

    assert_eq!(extract_text(&page, &record_map), "A\nB");
    assert!(build_toc(&page, &record_map).is_empty());
}

#[test]
fn sanitize_keeps_only_entries_with_identity() {
    let record_map = map(json!({
        "block": {
            "a": { "value": { "id": "a", "type": "text" } },
            "b": { "value": { "type": "text" } },
            "c": {}
        },
        "collection": { "coll": { "value": { "id": "coll" } } }
    }));

    let report = sanitize_report(&record_map);
    assert_eq!(report.record_map.len(), 1);
    assert!(report.record_map.block.contains_key("a"));
    assert_eq!(report.dropped, vec!["b".to_string(), "c".to_string()]);
    assert!(report.record_map.other.contains_key("collection"));
}

#[test]
fn extraction_is_unaffected_by_sanitizing() {
    let record_map = synced_page();
    let cleaned = sanitize(&record_map);
    let page = PageRef::new(PAGE_ID);

    assert_eq!(cleaned.len(), 12);
    assert_eq!(sanitize(&cleaned), cleaned);
    assert_eq!(extract_text(&page, &cleaned), extract_text(&page, &record_map));
    assert_eq!(build_toc(&page, &cleaned), build_toc(&page, &record_map));
}

#[test]
fn extraction_is_repeatable() {
    let record_map = synced_page();
    let page = PageRef::new(PAGE_ID);

    assert_eq!(extract_text(&page, &record_map), extract_text(&page, &record_map));
    assert_eq!(build_toc(&page, &record_map), build_toc(&page, &record_map));
}

#[test]
fn synced_page_measurements() {
    let stats = measure_record_map(&PageRef::new(PAGE_ID), &synced_page());

    assert_eq!(stats.total_entries, 14);
    assert_eq!(stats.valid_blocks, 12);
    assert_eq!(stats.reachable_blocks, 14);
    assert_eq!(stats.headings, 5);
    assert_eq!(stats.transclusion_references, 2);
    assert_eq!(stats.transclusion_containers, 2);
    assert_eq!(stats.dangling_references, 1);
    assert_eq!(stats.deepest_nesting, 3);
}
