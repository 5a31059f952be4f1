// src/lib.rs
//! notion-content library: reads Notion record maps and derives searchable
//! text, tables of contents, search hits, index records and archives.
//!
//! # Public API
//!
//! - **Core extraction**: `sanitize`, `extract_text`, `build_toc`,
//!   `normalize_indent_levels`, `resolve_page_content`
//! - **Data model**: `RecordMap`, `Block`, `BlockGraph`, `PageRef`, `Post`
//! - **Search and archive**: `search_posts`, `chunked_records`, `post_record`,
//!   `archive_posts`
//! - **Feed**: `latest_posts`, `feed_items`, `render_rss`
//! - **Record-map sources**: `RecordMapSource`, `DirectorySource`,
//!   `NotionPageClient`, `CachedSource`
//! - **Output**: `OutputPlan`, `deliver`, the text renderers

mod analytics;
mod api;
mod archive;
mod config;
mod constants;
mod error;
mod error_recovery;
mod extract;
mod feed;
mod model;
mod output;
mod pipeline;
mod sanitize;
mod search;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{
    Command, CommandInput, CommandLineInput, OutputFormat, PageJob, PipelineConfig,
    RecordMapInput, SourceSettings,
};
pub use crate::constants::{
    BLOCK_MAX_TRAVERSAL_DEPTH, LATEST_POST_COUNT, TEXT_SEGMENT_DELIMITER,
};

// --- Domain Model ---
pub use crate::model::{
    valid_timestamp, Block, BlockCommon, BlockGraph, BlockRecord, BlockValue, BlockVisitor,
    ContainerBlock, DateStamp, HeadingBlock, HeadingLevel, OtherBlock, PageBlock, PageRef, Post,
    RecordMap, ReferenceBlock, RichText, TextBlock, TextList,
};

// --- Domain Types ---
pub use crate::types::{canonical_block_key, PageId};

// --- Core Extraction ---
pub use crate::extract::{
    build_toc, build_toc_from_graph, extract_text, extract_text_from_graph,
    normalize_indent_levels, resolve_page_content, walk, TocEntry, TraversalContext,
};
pub use crate::sanitize::{sanitize, sanitize_owned, sanitize_report, SanitizeReport};

// --- Search, Index, Archive ---
pub use crate::archive::{archive_posts, UNDATED_GROUP};
pub use crate::feed::{
    feed_content, feed_items, latest_posts, render_rss, FeedItem, FeedSettings,
    CONTENT_NAMESPACE,
};
pub use crate::search::{
    attach_content, chunked_records, find_snippets, is_searchable, meta_text, needs_content,
    needs_reindex, post_body, post_record, search_posts, split_chunks, truncate_utf8,
    IndexRecord, IndexedState, SearchHit,
};

// --- Analytics ---
pub use crate::analytics::{
    dangling_references, deepest_nesting_level, measure_record_map, ContentMeasurement,
};

// --- Record-Map Sources ---
pub use crate::api::cache::{CachedSource, DiskCache};
pub use crate::api::client::{CachedNotionClient, NotionPageClient};
pub use crate::api::directory::{read_record_map, DirectorySource};
pub use crate::api::{load_post_contents, RecordMapSource};
pub use crate::error_recovery::retry_with_backoff;

// --- Output ---
pub use crate::output::{
    copy_to_clipboard, deliver, ensure_delivered, render_archive, render_search_hits,
    render_toc_outline, DeliveryTarget, OutputPlan, OutputReport,
};

// --- Pipeline Traits ---
pub use crate::pipeline::{
    build_source, load_record_map, read_posts, ContentSource, ResultComposer, ResultDelivery,
};
