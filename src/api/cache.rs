// src/api/cache.rs
//! Record-map caches: raw API responses on disk, sanitized maps in memory.

use super::RecordMapSource;
use crate::error::AppError;
use crate::model::RecordMap;
use crate::types::PageId;
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

// ---------------------------------------------------------------------------
// Disk cache
// ---------------------------------------------------------------------------

/// TTL-based file cache for raw response bodies.
///
/// Best-effort: read and write failures only cost a fresh fetch.
pub struct DiskCache {
    cache_dir: PathBuf,
    ttl_secs: u64,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct CacheEntry {
    data: String,
    cached_at: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl DiskCache {
    /// Opens the cache in `$XDG_CACHE_HOME/notion-content` (or
    /// `~/.cache/notion-content`) and purges expired entries.
    pub async fn new(ttl_secs: u64) -> Result<Self, std::io::Error> {
        Self::in_dir(Self::default_cache_dir(), ttl_secs).await
    }

    /// Opens the cache in an explicit directory.
    pub async fn in_dir(cache_dir: PathBuf, ttl_secs: u64) -> Result<Self, std::io::Error> {
        tokio::fs::create_dir_all(&cache_dir).await?;
        let cache = Self {
            cache_dir,
            ttl_secs,
        };
        let purged = cache.purge_expired().await;
        if purged > 0 {
            log::debug!("Purged {} expired cache entries", purged);
        }
        Ok(cache)
    }

    fn default_cache_dir() -> PathBuf {
        std::env::var("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".cache")
            })
            .join("notion-content")
    }

    /// Cached body for `key`, unless missing or older than the TTL.
    pub async fn get(&self, key: &str) -> Option<String> {
        let path = self.key_to_path(key);
        let content = tokio::fs::read_to_string(&path).await.ok()?;
        let entry: CacheEntry = serde_json::from_str(&content).ok()?;
        if self.expired(&entry) {
            let _ = tokio::fs::remove_file(&path).await;
            return None;
        }
        Some(entry.data)
    }

    pub async fn set(&self, key: &str, data: &str) {
        let entry = CacheEntry {
            data: data.to_string(),
            cached_at: now_secs(),
        };
        if let Ok(json) = serde_json::to_string(&entry) {
            if let Err(e) = tokio::fs::write(self.key_to_path(key), json).await {
                log::debug!("Cache write for {} failed: {}", key, e);
            }
        }
    }

    fn expired(&self, entry: &CacheEntry) -> bool {
        now_secs().saturating_sub(entry.cached_at) > self.ttl_secs
    }

    /// Removes expired entries, returning how many were removed.
    async fn purge_expired(&self) -> usize {
        let Ok(mut dir) = tokio::fs::read_dir(&self.cache_dir).await else {
            return 0;
        };

        let mut purged = 0;
        while let Ok(Some(entry)) = dir.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(content) = tokio::fs::read_to_string(&path).await else {
                continue;
            };
            let Ok(cached) = serde_json::from_str::<CacheEntry>(&content) else {
                continue;
            };
            if self.expired(&cached) && tokio::fs::remove_file(&path).await.is_ok() {
                purged += 1;
            }
        }
        purged
    }

    fn key_to_path(&self, key: &str) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        self.cache_dir.join(format!("{:016x}.json", hasher.finish()))
    }
}

// ---------------------------------------------------------------------------
// In-memory cache
// ---------------------------------------------------------------------------

/// Keeps the most recently loaded record maps in memory.
///
/// Entries are keyed `page_block_{id}` with the compact page id, so every
/// spelling of the same page shares one entry.
pub struct CachedSource<S> {
    inner: S,
    entries: Mutex<LruCache<String, RecordMap>>,
}

impl<S: RecordMapSource> CachedSource<S> {
    pub fn new(inner: S, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn key(page_id: &PageId) -> String {
        format!("page_block_{}", page_id.as_str())
    }

    /// Number of maps currently held.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait::async_trait]
impl<S: RecordMapSource> RecordMapSource for CachedSource<S> {
    async fn load(&self, page_id: &PageId) -> Result<RecordMap, AppError> {
        let key = Self::key(page_id);
        let cached = self.entries.lock().get(&key).cloned();
        if let Some(hit) = cached {
            log::debug!("Memory cache hit: {}", key);
            return Ok(hit);
        }

        let record_map = self.inner.load(page_id).await?;
        self.entries.lock().put(key, record_map.clone());
        Ok(record_map)
    }

    fn describe(&self) -> String {
        format!("{} (memory cached)", self.inner.describe())
    }
}
