// src/api/mod.rs
//! Record-map retrieval: the ability to get a page's block graph.
//!
//! Business logic depends on [`RecordMapSource`], never on where the JSON
//! comes from. Every source hands out sanitized maps.

pub mod cache;
pub mod client;
pub mod directory;

use crate::error::AppError;
use crate::model::{Post, RecordMap};
use crate::search::{attach_content, needs_content};
use crate::types::PageId;
use futures::stream::{self, StreamExt};

/// The ability to load the record map of one page.
#[async_trait::async_trait]
pub trait RecordMapSource: Send + Sync {
    async fn load(&self, page_id: &PageId) -> Result<RecordMap, AppError>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

#[async_trait::async_trait]
impl<S: RecordMapSource + ?Sized> RecordMapSource for Box<S> {
    async fn load(&self, page_id: &PageId) -> Result<RecordMap, AppError> {
        (**self).load(page_id).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Loads and flattens the body of every post that lacks one.
///
/// At most `concurrency` pages are in flight at once and output order
/// matches input order. A post whose page fails to load is kept as it was;
/// the failure is logged.
pub async fn load_post_contents<S>(source: &S, posts: Vec<Post>, concurrency: usize) -> Vec<Post>
where
    S: RecordMapSource + ?Sized,
{
    log::info!(
        "Loading post bodies from {} ({} posts, concurrency {})",
        source.describe(),
        posts.len(),
        concurrency
    );

    stream::iter(posts)
        .map(|post| load_one(source, post))
        .buffered(concurrency.max(1))
        .collect()
        .await
}

async fn load_one<S>(source: &S, mut post: Post) -> Post
where
    S: RecordMapSource + ?Sized,
{
    if !needs_content(&post) {
        return post;
    }
    let page_id = match PageId::parse(&post.id) {
        Ok(id) => id,
        Err(e) => {
            log::warn!("Skipping body of post {}: {}", post.id, e);
            return post;
        }
    };
    match source.load(&page_id).await {
        Ok(record_map) => attach_content(&mut post, &record_map),
        Err(e) => log::error!("Fetching body of post {} failed: {}", post.id, e),
    }
    post
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Serves one fixed page; everything else is an error.
    struct OnePage;

    #[async_trait::async_trait]
    impl RecordMapSource for OnePage {
        async fn load(&self, page_id: &PageId) -> Result<RecordMap, AppError> {
            if page_id.as_str() != "550e8400e29b41d4a716446655440000" {
                return Err(AppError::InvalidId(page_id.to_string()));
            }
            Ok(RecordMap::from_value(json!({
                "block": {
                    "550e8400-e29b-41d4-a716-446655440000": {
                        "value": {
                            "id": "550e8400-e29b-41d4-a716-446655440000",
                            "type": "page",
                            "content": ["t"]
                        }
                    },
                    "t": { "value": { "id": "t", "type": "text", "properties": { "title": [["Loaded"]] } } }
                }
            }))?)
        }

        fn describe(&self) -> String {
            "one page".into()
        }
    }

    fn post(id: &str) -> Post {
        Post {
            id: id.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn failures_keep_the_post_and_order_is_preserved() {
        let mut ready = post("ready");
        ready.content = Some("already here".into());
        let posts = vec![
            post("11111111111111111111111111111111"),
            ready,
            post("550e8400e29b41d4a716446655440000"),
            post("not-an-id"),
        ];

        let loaded = load_post_contents(&OnePage, posts, 2).await;
        let contents: Vec<Option<&str>> = loaded.iter().map(|p| p.content.as_deref()).collect();
        assert_eq!(
            contents,
            vec![None, Some("already here"), Some("Loaded"), None]
        );
    }
}
