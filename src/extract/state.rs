// src/extract/state.rs
//! Immutable traversal state threaded through a block-graph walk.
//!
//! Each level of the walk gets its own copy of the context. The path set is
//! a persistent set, so entering a block shares structure with the parent
//! instead of copying it.

use crate::constants::BLOCK_MAX_TRAVERSAL_DEPTH;
use im_rc::HashSet;

/// Blocks on the current recursion path plus the current depth.
///
/// Only the path is tracked, not everything visited so far: the same synced
/// block may legitimately appear under two independent branches.
#[derive(Debug, Clone, Default)]
pub struct TraversalContext {
    path: HashSet<String>,
    depth: usize,
}

impl TraversalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is already an ancestor on the current path.
    pub fn on_path(&self, key: &str) -> bool {
        self.path.contains(key)
    }

    /// Checks if the depth limit has been reached.
    pub fn depth_limit_reached(&self) -> bool {
        self.depth >= BLOCK_MAX_TRAVERSAL_DEPTH
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns a context one level deeper with `key` on the path.
    pub fn enter(&self, key: String) -> Self {
        Self {
            path: self.path.update(key),
            depth: self.depth + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entering_does_not_leak_into_siblings() {
        let root = TraversalContext::new();
        let child = root.enter("a".into());
        let grandchild = child.enter("b".into());

        assert!(grandchild.on_path("a"));
        assert!(grandchild.on_path("b"));
        assert!(child.on_path("a"));
        assert!(!child.on_path("b"));
        assert!(!root.on_path("a"));
        assert_eq!(grandchild.depth(), 2);
    }

    #[test]
    fn depth_limit_trips_at_bound() {
        let mut ctx = TraversalContext::new();
        for i in 0..BLOCK_MAX_TRAVERSAL_DEPTH {
            assert!(!ctx.depth_limit_reached());
            ctx = ctx.enter(i.to_string());
        }
        assert!(ctx.depth_limit_reached());
    }
}
