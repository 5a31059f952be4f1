//! Depth-first, pre-order walk over a page's block graph.
//!
//! Resolution rules shared by every extractor:
//! - an id missing from the graph is skipped;
//! - a block is visited, then its `content` children are walked in order;
//! - a synced-block reference without children of its own walks the block
//!   its pointer names, in place, as if it were a child of the current list;
//! - a block already on the current path is not entered again.

use super::state::TraversalContext;
use crate::model::{Block, BlockGraph, BlockVisitor};
use crate::types::canonical_block_key;

/// Walks `ids` and everything reachable from them, feeding `visitor`.
pub fn walk<V: BlockVisitor>(graph: &BlockGraph<'_>, ids: &[String], visitor: &mut V) {
    walk_list(graph, ids, &TraversalContext::new(), visitor);
}

fn walk_list<V: BlockVisitor>(
    graph: &BlockGraph<'_>,
    ids: &[String],
    ctx: &TraversalContext,
    visitor: &mut V,
) {
    for id in ids {
        walk_block(graph, id, ctx, visitor);
    }
}

fn walk_block<V: BlockVisitor>(
    graph: &BlockGraph<'_>,
    id: &str,
    ctx: &TraversalContext,
    visitor: &mut V,
) {
    let Some(block) = graph.get(id) else {
        log::trace!("Skipping unresolved block {}", id);
        return;
    };

    let key = canonical_block_key(id);
    if ctx.on_path(&key) {
        log::debug!("Cycle through block {} cut at depth {}", id, ctx.depth());
        return;
    }
    if ctx.depth_limit_reached() {
        log::warn!(
            "Depth limit reached at block {}; its subtree is skipped",
            id
        );
        return;
    }
    let ctx = ctx.enter(key);

    block.accept(visitor);

    let children = block.content();
    if !children.is_empty() {
        walk_list(graph, children, &ctx, visitor);
    } else if let Block::TransclusionReference(reference) = block {
        if let Some(pointer) = reference.pointer {
            walk_block(graph, pointer, &ctx, visitor);
        }
    }
}
