// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

// ---------------------------------------------------------------------------
// Block graph traversal
// ---------------------------------------------------------------------------

/// Maximum nesting depth when walking a page's block graph.
///
/// The path-based cycle guard already stops loops through synced blocks.
/// This limit bounds stack usage on pathologically deep but acyclic chains.
pub const BLOCK_MAX_TRAVERSAL_DEPTH: usize = 100;

/// Separator placed between the texts of consecutive blocks in extracted
/// page text. Search snippets and feeds tokenize on it.
pub const TEXT_SEGMENT_DELIMITER: &str = "\n";

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Characters of context kept before a keyword hit in a search snippet.
pub const SNIPPET_CHARS_BEFORE: usize = 50;

/// Characters kept from the start of a keyword hit to the end of a snippet.
pub const SNIPPET_CHARS_AFTER: usize = 150;

/// Maximum number of snippets collected per post.
pub const MAX_SNIPPETS_PER_POST: usize = 3;

/// Characters per chunk when a post body is split into index records.
pub const INDEX_CHUNK_CHARS: usize = 2000;

/// Byte budget for the body of a single whole-post index record.
pub const INDEX_MAX_CONTENT_BYTES: usize = 5000;

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

/// Posts carried by the RSS feed unless `--count` says otherwise.
pub const LATEST_POST_COUNT: usize = 6;

// ---------------------------------------------------------------------------
// Notion private API boundaries
// ---------------------------------------------------------------------------

/// Base URL of the private API the public site itself talks to.
pub const NOTION_PRIVATE_API_BASE: &str = "https://www.notion.so/api/v3";

/// Blocks requested per `loadPageChunk` call.
pub const PAGE_CHUNK_LIMIT: usize = 100;

/// Upper bound on `loadPageChunk` round-trips for a single page.
pub const MAX_PAGE_CHUNKS: usize = 20;

/// Upper bound on `syncRecordValues` passes that fill in dangling references.
pub const MAX_SYNC_PASSES: usize = 3;

/// Attempts per request before a transient failure is reported.
pub const MAX_REQUEST_ATTEMPTS: u32 = 3;

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Caching and concurrency
// ---------------------------------------------------------------------------

/// Record maps kept in the in-memory cache.
pub const MEMORY_CACHE_CAPACITY: usize = 64;

/// Upper bound on pages loaded concurrently during bulk search and indexing.
pub const MAX_LOAD_CONCURRENCY: usize = 8;
