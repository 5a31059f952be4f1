//! Table of contents: the page's headings with smoothed indentation.

use super::page::top_level_ids;
use super::walker::walk;
use crate::model::{BlockGraph, BlockVisitor, HeadingBlock, PageRef, RecordMap};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: String,
    /// Nominal heading depth while collecting, effective depth afterwards.
    pub indent_level: usize,
}

/// Collects headings in document order, each block id at most once.
#[derive(Debug, Default)]
struct HeadingCollector {
    entries: Vec<TocEntry>,
    seen: HashSet<String>,
}

impl BlockVisitor for HeadingCollector {
    fn visit_heading(&mut self, block: &HeadingBlock<'_>) {
        if !self.seen.insert(block.common.id.to_string()) {
            return;
        }
        self.entries.push(TocEntry {
            id: block.common.id.to_string(),
            block_type: block.level.as_str().to_string(),
            text: block.common.title.plain_text(),
            indent_level: block.level.nominal_depth(),
        });
    }
}

/// Builds the normalized table of contents for `page`.
pub fn build_toc(page: &PageRef, record_map: &RecordMap) -> Vec<TocEntry> {
    let graph = BlockGraph::new(record_map);
    build_toc_from_graph(page, &graph)
}

/// Same as [`build_toc`] over an already built graph.
pub fn build_toc_from_graph(page: &PageRef, graph: &BlockGraph<'_>) -> Vec<TocEntry> {
    let ids = top_level_ids(page, graph);
    let mut collector = HeadingCollector::default();
    walk(graph, &ids, &mut collector);

    let mut entries = collector.entries;
    let nominal: Vec<usize> = entries.iter().map(|e| e.indent_level).collect();
    for (entry, effective) in entries.iter_mut().zip(normalize_indent_levels(&nominal)) {
        entry.indent_level = effective;
    }
    entries
}

/// Rewrites nominal heading depths so the outline never deepens by more
/// than one level at a time.
///
/// A stack of `(actual, effective)` pairs starts from a `(-1, -1)` sentinel.
/// A deeper heading nests one below the top of the stack and is pushed; an
/// equal one takes the top's effective level; a shallower one pops until one
/// of the first two cases applies.
pub fn normalize_indent_levels(levels: &[usize]) -> Vec<usize> {
    let mut stack: Vec<(i64, i64)> = vec![(-1, -1)];
    let mut normalized = Vec::with_capacity(levels.len());

    for &level in levels {
        let actual = level as i64;
        let effective = loop {
            let (top_actual, top_effective) = stack.last().copied().unwrap_or((-1, -1));
            if actual > top_actual {
                let effective = top_effective + 1;
                stack.push((actual, effective));
                break effective;
            } else if actual == top_actual {
                break top_effective;
            }
            stack.pop();
        };
        normalized.push(effective.max(0) as usize);
    }
    normalized
}
