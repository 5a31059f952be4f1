// src/api/directory.rs
//! Record maps stored as JSON files, one per page.

use super::RecordMapSource;
use crate::error::AppError;
use crate::model::RecordMap;
use crate::sanitize::sanitize_owned;
use crate::types::PageId;
use std::path::{Path, PathBuf};

/// Reads `<dir>/<hyphenated-id>.json`, falling back to `<dir>/<compact-id>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn candidates(&self, page_id: &PageId) -> [PathBuf; 2] {
        [
            self.dir.join(format!("{}.json", page_id.to_hyphenated())),
            self.dir.join(format!("{}.json", page_id.as_str())),
        ]
    }
}

/// Reads and parses one record-map file, then sanitizes it.
pub async fn read_record_map(path: &Path) -> Result<RecordMap, AppError> {
    let json = tokio::fs::read_to_string(path).await?;
    let record_map = RecordMap::from_json_str(&json).map_err(|source| AppError::JsonParseError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(sanitize_owned(record_map))
}

#[async_trait::async_trait]
impl RecordMapSource for DirectorySource {
    async fn load(&self, page_id: &PageId) -> Result<RecordMap, AppError> {
        for path in self.candidates(page_id) {
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                log::debug!("Reading record map {}", path.display());
                return read_record_map(&path).await;
            }
        }
        Err(AppError::RecordMapNotFound {
            page_id: page_id.to_string(),
            dir: self.dir.clone(),
        })
    }

    fn describe(&self) -> String {
        format!("directory {}", self.dir.display())
    }
}
