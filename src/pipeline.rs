// src/pipeline.rs
//! Pipeline stages: acquire record maps and posts, compose a result, deliver it.
//!
//! Each trait describes a single capability so stages can be tested in
//! isolation. The loading helpers are shared by the binary and the tests.

use crate::api::cache::CachedSource;
use crate::api::client::{CachedNotionClient, NotionPageClient};
use crate::api::directory::{read_record_map, DirectorySource};
use crate::api::RecordMapSource;
use crate::config::{PageJob, RecordMapInput, SourceSettings};
use crate::constants::MEMORY_CACHE_CAPACITY;
use crate::error::AppError;
use crate::model::{Post, RecordMap};
use crate::output::OutputReport;
use std::path::Path;

/// Retrieves the inputs of a run.
#[async_trait::async_trait]
pub trait ContentSource {
    async fn record_map(&self, job: &PageJob) -> Result<RecordMap, AppError>;
    async fn posts(&self, path: &Path) -> Result<Vec<Post>, AppError>;
}

/// Turns loaded inputs into the final output string.
#[async_trait::async_trait]
pub trait ResultComposer {
    async fn compose(&self) -> Result<String, AppError>;
}

/// Delivers a composed result to its destinations.
pub trait ResultDelivery {
    fn deliver(&self, rendered: String) -> Result<OutputReport, AppError>;
}

/// Builds the record-map source the settings ask for, if any.
///
/// Remote fetching takes precedence over a directory. Either one sits behind
/// an in-memory cache; remote fetches are also disk cached unless disabled.
pub async fn build_source(
    settings: &SourceSettings,
) -> Result<Option<Box<dyn RecordMapSource>>, AppError> {
    let inner: Box<dyn RecordMapSource> = if settings.remote {
        let client =
            NotionPageClient::new(settings.token_v2.as_deref(), settings.api_base.as_deref())?;
        if settings.no_cache {
            log::info!("Cache disabled; all requests go to Notion");
            Box::new(client)
        } else {
            log::info!("Disk cache enabled (TTL: {}s)", settings.cache_ttl);
            Box::new(CachedNotionClient::new(client, settings.cache_ttl).await?)
        }
    } else if let Some(dir) = &settings.record_map_dir {
        Box::new(DirectorySource::new(dir))
    } else {
        return Ok(None);
    };
    Ok(Some(Box::new(CachedSource::new(inner, MEMORY_CACHE_CAPACITY))))
}

/// Loads the record map a page job names.
pub async fn load_record_map(
    job: &PageJob,
    source: Option<&dyn RecordMapSource>,
) -> Result<RecordMap, AppError> {
    match (&job.input, source) {
        (RecordMapInput::File(path), _) => read_record_map(path).await,
        (RecordMapInput::Page(id), Some(source)) => source.load(id).await,
        (RecordMapInput::Page(id), None) => Err(AppError::MissingConfiguration(format!(
            "no record-map source configured for page {}",
            id
        ))),
    }
}

/// Reads a JSON array of post metadata.
pub async fn read_posts(path: &Path) -> Result<Vec<Post>, AppError> {
    let json = tokio::fs::read_to_string(path).await?;
    let posts: Vec<Post> = serde_json::from_str(&json).map_err(|source| AppError::JsonParseError {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Read {} posts from {}", posts.len(), path.display());
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageId;

    #[tokio::test]
    async fn no_settings_means_no_source() {
        let source = build_source(&SourceSettings::default()).await.unwrap();
        assert!(source.is_none());
    }

    #[tokio::test]
    async fn page_without_source_is_a_configuration_error() {
        let job = PageJob {
            input: RecordMapInput::Page(PageId::parse("550e8400e29b41d4a716446655440000").unwrap()),
            page_id: None,
        };
        let err = load_record_map(&job, None).await.unwrap_err();
        assert!(matches!(err, AppError::MissingConfiguration(_)));
    }

    #[tokio::test]
    async fn directory_settings_build_a_cached_directory_source() {
        let settings = SourceSettings {
            record_map_dir: Some("maps".into()),
            ..Default::default()
        };
        let source = build_source(&settings).await.unwrap().unwrap();
        assert_eq!(source.describe(), "directory maps (memory cached)");
    }
}
