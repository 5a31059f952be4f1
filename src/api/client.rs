// src/api/client.rs
//! HTTP client for the record-map endpoints of Notion's private API.
//!
//! A page is fetched with `loadPageChunk`, following `cursor.stack` until
//! the server reports nothing left. Blocks that are referenced but were not
//! part of any chunk (typically synced-block sources living on other pages)
//! are then filled in with `syncRecordValues`.

use super::cache::DiskCache;
use super::RecordMapSource;
use crate::analytics::dangling_references;
use crate::constants::{
    ERROR_BODY_PREVIEW_LENGTH, MAX_PAGE_CHUNKS, MAX_REQUEST_ATTEMPTS, MAX_SYNC_PASSES,
    NOTION_PRIVATE_API_BASE, PAGE_CHUNK_LIMIT,
};
use crate::error::AppError;
use crate::error_recovery::retry_with_backoff;
use crate::model::{BlockGraph, RecordMap};
use crate::sanitize::sanitize_owned;
use crate::types::PageId;
use reqwest::{header, Client};
use serde_json::{json, Value};
use std::time::Duration;

/// Fetches record maps from Notion.
#[derive(Clone)]
pub struct NotionPageClient {
    client: Client,
    base_url: String,
}

impl NotionPageClient {
    /// Creates a client; `token_v2` unlocks pages that are not public.
    pub fn new(token_v2: Option<&str>, base_url: Option<&str>) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(token_v2)?)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or(NOTION_PRIVATE_API_BASE)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn create_headers(token_v2: Option<&str>) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = token_v2.filter(|t| !t.trim().is_empty()) {
            let cookie = format!("token_v2={}", token.trim());
            headers.insert(
                header::COOKIE,
                header::HeaderValue::from_str(&cookie).map_err(|e| {
                    AppError::MissingConfiguration(format!("Invalid token_v2 format: {}", e))
                })?,
            );
        }
        Ok(headers)
    }

    /// POSTs `body` to `endpoint` and parses the JSON answer, retrying
    /// transient failures.
    async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, AppError> {
        retry_with_backoff(
            || self.post_once(endpoint, body),
            MAX_REQUEST_ATTEMPTS,
            Duration::from_millis(500),
            Duration::from_secs(4),
        )
        .await
    }

    async fn post_once(&self, endpoint: &str, body: &Value) -> Result<Value, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AppError::NotionService {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: text.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect(),
            });
        }
        serde_json::from_str(&text).map_err(|e| {
            AppError::MalformedResponse(format!("{} returned invalid JSON: {}", endpoint, e))
        })
    }

    /// All chunks of one page, merged into one record map.
    pub async fn load_page_chunks(&self, page_id: &PageId) -> Result<RecordMap, AppError> {
        let mut record_map = RecordMap::default();
        let mut stack = Value::Array(Vec::new());

        for chunk_number in 0..MAX_PAGE_CHUNKS {
            let body = json!({
                "pageId": page_id.to_hyphenated(),
                "limit": PAGE_CHUNK_LIMIT,
                "cursor": { "stack": stack },
                "chunkNumber": chunk_number,
                "verticalColumns": false,
            });
            let response = self.post("loadPageChunk", &body).await?;

            stack = response
                .pointer("/cursor/stack")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new()));
            let chunk = RecordMap::from_value(response).map_err(|e| {
                AppError::MalformedResponse(format!("loadPageChunk record map: {}", e))
            })?;
            log::debug!(
                "Chunk {} of page {} carried {} blocks",
                chunk_number,
                page_id,
                chunk.len()
            );
            record_map.merge(chunk);

            if stack.as_array().map_or(true, Vec::is_empty) {
                return Ok(record_map);
            }
        }

        log::warn!(
            "Page {} still had chunks after {} requests; continuing with what was loaded",
            page_id,
            MAX_PAGE_CHUNKS
        );
        Ok(record_map)
    }

    /// Fetches the blocks `record_map` references but does not contain.
    ///
    /// Fetched blocks can reference further missing blocks, so this runs in
    /// passes until nothing is missing, nothing new arrives, or the pass
    /// limit is hit.
    pub async fn sync_missing_blocks(&self, record_map: &mut RecordMap) -> Result<(), AppError> {
        for pass in 1..=MAX_SYNC_PASSES {
            let missing = dangling_references(&BlockGraph::new(record_map));
            if missing.is_empty() {
                return Ok(());
            }
            log::debug!("Sync pass {}: {} missing blocks", pass, missing.len());

            let requests: Vec<Value> = missing
                .iter()
                .map(|id| json!({ "pointer": { "table": "block", "id": id }, "version": -1 }))
                .collect();
            let response = self
                .post("syncRecordValues", &json!({ "requests": requests }))
                .await?;
            let fetched = RecordMap::from_value(response).map_err(|e| {
                AppError::MalformedResponse(format!("syncRecordValues record map: {}", e))
            })?;

            let before = record_map.len();
            record_map.merge(sanitize_owned(fetched));
            if record_map.len() == before {
                log::debug!("Sync pass {} brought nothing new; stopping", pass);
                return Ok(());
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordMapSource for NotionPageClient {
    async fn load(&self, page_id: &PageId) -> Result<RecordMap, AppError> {
        let mut record_map = self.load_page_chunks(page_id).await?;
        self.sync_missing_blocks(&mut record_map).await?;
        Ok(sanitize_owned(record_map))
    }

    fn describe(&self) -> String {
        format!("Notion API at {}", self.base_url)
    }
}

/// A [`NotionPageClient`] that keeps each page's final record map on disk.
///
/// Cache hits are re-parsed and re-sanitized exactly like live responses.
pub struct CachedNotionClient {
    inner: NotionPageClient,
    cache: DiskCache,
}

impl CachedNotionClient {
    pub async fn new(inner: NotionPageClient, ttl_secs: u64) -> Result<Self, AppError> {
        let cache = DiskCache::new(ttl_secs)
            .await
            .map_err(|e| AppError::InternalError {
                message: format!("Failed to initialize disk cache: {}", e),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { inner, cache })
    }
}

#[async_trait::async_trait]
impl RecordMapSource for CachedNotionClient {
    async fn load(&self, page_id: &PageId) -> Result<RecordMap, AppError> {
        let cache_key = format!("record_map_{}", page_id.as_str());
        if let Some(cached) = self.cache.get(&cache_key).await {
            match RecordMap::from_json_str(&cached) {
                Ok(record_map) => {
                    log::debug!("Cache hit: {}", cache_key);
                    return Ok(sanitize_owned(record_map));
                }
                Err(e) => log::debug!("Discarding unreadable cache entry {}: {}", cache_key, e),
            }
        }

        log::debug!("Cache miss: {}", cache_key);
        let record_map = self.inner.load(page_id).await?;
        if let Ok(json) = serde_json::to_string(&record_map) {
            self.cache.set(&cache_key, &json).await;
        }
        Ok(record_map)
    }

    fn describe(&self) -> String {
        format!("{} (disk cached)", self.inner.describe())
    }
}
