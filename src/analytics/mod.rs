// src/analytics/mod.rs
//! Content measurement and statistics for record maps.

use crate::extract::{resolve_page_content, walk, TraversalContext};
use crate::model::{
    Block, BlockGraph, BlockVisitor, ContainerBlock, HeadingBlock, OtherBlock, PageBlock, PageRef,
    RecordMap, ReferenceBlock, TextBlock,
};
use crate::types::canonical_block_key;

/// Detailed content breakdown for diagnostics and logging.
///
/// Use this for verbose-mode summaries (e.g. "412 entries, 3 dangling").
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMeasurement {
    /// Entries in the block table, valid or not.
    pub total_entries: usize,
    pub valid_blocks: usize,
    /// Blocks reachable from the page through its content lists.
    pub reachable_blocks: usize,
    pub headings: usize,
    pub transclusion_references: usize,
    pub transclusion_containers: usize,
    /// Child ids and synced-block pointers that resolve to nothing.
    pub dangling_references: usize,
    pub deepest_nesting: usize,
}

/// Counts the block kinds a walk reaches.
#[derive(Default)]
struct KindCounter {
    reached: usize,
    headings: usize,
    references: usize,
    containers: usize,
}

impl BlockVisitor for KindCounter {
    fn visit_text(&mut self, _block: &TextBlock<'_>) {
        self.reached += 1;
    }
    fn visit_heading(&mut self, _block: &HeadingBlock<'_>) {
        self.reached += 1;
        self.headings += 1;
    }
    fn visit_page(&mut self, _block: &PageBlock<'_>) {
        self.reached += 1;
    }
    fn visit_reference(&mut self, _block: &ReferenceBlock<'_>) {
        self.reached += 1;
        self.references += 1;
    }
    fn visit_container(&mut self, _block: &ContainerBlock<'_>) {
        self.reached += 1;
        self.containers += 1;
    }
    fn visit_other(&mut self, _block: &OtherBlock<'_>) {
        self.reached += 1;
    }
}

/// Measures the record map as seen from `page`.
pub fn measure_record_map(page: &PageRef, record_map: &RecordMap) -> ContentMeasurement {
    let graph = BlockGraph::new(record_map);
    let roots = match &page.content {
        Some(content) => content.clone(),
        None => resolve_page_content(&page.id, record_map),
    };

    let mut counter = KindCounter::default();
    walk(&graph, &roots, &mut counter);

    ContentMeasurement {
        total_entries: record_map.len(),
        valid_blocks: graph.len(),
        reachable_blocks: counter.reached,
        headings: counter.headings,
        transclusion_references: counter.references,
        transclusion_containers: counter.containers,
        dangling_references: dangling_references(&graph).len(),
        deepest_nesting: deepest_nesting_level(&graph, &roots),
    }
}

/// Ids referenced by some block (as a child or a synced-block pointer) that
/// the graph cannot resolve, in record-map order, without duplicates.
pub fn dangling_references(graph: &BlockGraph<'_>) -> Vec<String> {
    let mut dangling: Vec<String> = Vec::new();
    for block in graph.blocks_in_order() {
        let pointer = match block {
            Block::TransclusionReference(reference) => reference.pointer,
            _ => None,
        };
        let referenced = block.content().iter().map(String::as_str).chain(pointer);
        for id in referenced {
            if graph.get(id).is_none() && !dangling.iter().any(|known| known == id) {
                dangling.push(id.to_string());
            }
        }
    }
    dangling
}

/// Deepest nesting level below `roots`; a page whose blocks have no
/// children has depth 1, an empty page depth 0.
pub fn deepest_nesting_level(graph: &BlockGraph<'_>, roots: &[String]) -> usize {
    blocks_max_depth(graph, roots, &TraversalContext::new())
}

fn blocks_max_depth(graph: &BlockGraph<'_>, ids: &[String], ctx: &TraversalContext) -> usize {
    ids.iter()
        .filter_map(|id| graph.get(id).map(|block| (id, block)))
        .map(|(id, block)| {
            let key = canonical_block_key(id);
            if ctx.on_path(&key) || ctx.depth_limit_reached() {
                return ctx.depth();
            }
            let ctx = ctx.enter(key);
            let children = block.content();
            let below = if !children.is_empty() {
                blocks_max_depth(graph, children, &ctx)
            } else if let Block::TransclusionReference(ReferenceBlock {
                pointer: Some(pointer),
                ..
            }) = block
            {
                blocks_max_depth(graph, &[pointer.to_string()], &ctx)
            } else {
                0
            };
            below.max(ctx.depth())
        })
        .max()
        .unwrap_or(0)
}
