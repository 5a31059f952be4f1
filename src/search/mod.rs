//! Search over post bodies: the in-memory keyword filter and the records
//! pushed to an external full-text index.

mod filter;
mod index;

pub use filter::{find_snippets, meta_text, search_posts, SearchHit};
pub use index::{
    chunked_records, is_searchable, needs_reindex, post_record, split_chunks, truncate_utf8,
    IndexRecord, IndexedState,
};

use crate::extract::{extract_text, resolve_page_content};
use crate::model::{PageRef, Post, RecordMap};

/// Fills `post.content` with the flattened text of its page.
///
/// The page's block list is resolved from `record_map` by the post id.
pub fn attach_content(post: &mut Post, record_map: &RecordMap) {
    let page = PageRef::with_content(post.id.clone(), resolve_page_content(&post.id, record_map));
    let text = extract_text(&page, record_map);
    if text.is_empty() {
        log::warn!("Content is empty for post {}", post.id);
    }
    post.content = Some(text);
}

/// Whether a post still needs its body loaded before it can be searched.
pub fn needs_content(post: &Post) -> bool {
    post.content.as_deref().map_or(true, str::is_empty) && post.block_map.is_none()
}

/// The body text of a post: its `content` when present, else text extracted
/// from an attached record map, else empty.
pub fn post_body(post: &Post) -> String {
    if let Some(content) = post.content.as_deref().filter(|c| !c.is_empty()) {
        return content.to_string();
    }
    match &post.block_map {
        Some(record_map) => extract_text(&PageRef::new(post.id.clone()), record_map),
        None => String::new(),
    }
}
