//! Records for an external full-text search index.
//!
//! Only record construction lives here; uploading is someone else's job.

use super::post_body;
use crate::constants::{INDEX_CHUNK_CHARS, INDEX_MAX_CONTENT_BYTES};
use crate::model::{valid_timestamp, DateStamp, Post, TextList};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One object of the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRecord {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub title: Option<String>,
    pub category: Option<TextList>,
    pub tags: Option<TextList>,
    pub page_cover: Option<String>,
    pub page_cover_thumbnail: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub last_edited_date: Option<DateStamp>,
    pub created_time: Option<DateStamp>,
    /// Falls back to the creation time for posts without a publish date.
    pub publish_date: Option<DateStamp>,
    pub last_index_date: DateTime<Utc>,
    pub created_timestamp: i64,
    pub last_edited_timestamp: i64,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
}

impl IndexRecord {
    fn for_post(post: &Post, object_id: String, content: String, indexed_at: DateTime<Utc>) -> Self {
        Self {
            object_id,
            title: post.title.clone(),
            category: post.category.clone(),
            tags: post.tags.clone(),
            page_cover: post.page_cover.clone(),
            page_cover_thumbnail: post.page_cover_thumbnail.clone(),
            slug: post.slug.clone(),
            summary: post.summary.clone(),
            last_edited_date: post.last_edited_date.clone(),
            created_time: post.created_time.clone(),
            publish_date: post
                .publish_date
                .clone()
                .or_else(|| post.created_time.clone()),
            last_index_date: indexed_at,
            created_timestamp: valid_timestamp(post.created_time.as_ref()),
            last_edited_timestamp: valid_timestamp(post.last_edited_date.as_ref()),
            content,
            chunk_index: None,
        }
    }
}

/// The dates an already indexed object carries, as read back from the index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedState {
    #[serde(default)]
    pub last_edited_date: Option<DateStamp>,
    #[serde(default)]
    pub last_index_date: Option<DateStamp>,
}

/// Published, password-free posts and pages are searchable; drafts,
/// invisible posts and everything else are not.
pub fn is_searchable(post: &Post) -> bool {
    !post.has_password() && post.is_published() && (post.is_type("Post") || post.is_type("Page"))
}

/// Whether the index copy of `post` is stale.
///
/// Missing records, and records lacking either date, always need a refresh.
/// Otherwise the post must have been edited after it was last indexed.
pub fn needs_reindex(post: &Post, existing: Option<&IndexedState>) -> bool {
    let Some(existing) = existing else {
        return true;
    };
    let (Some(_), Some(indexed)) = (&existing.last_edited_date, &existing.last_index_date) else {
        return true;
    };
    match (
        post.last_edited_date.as_ref().and_then(DateStamp::to_datetime),
        indexed.to_datetime(),
    ) {
        (Some(edited), Some(indexed)) => edited > indexed,
        _ => false,
    }
}

/// One record per post holding its whole body, truncated to the byte budget.
pub fn post_record(post: &Post, indexed_at: DateTime<Utc>) -> IndexRecord {
    let body = post_body(post);
    let content = truncate_utf8(&body, INDEX_MAX_CONTENT_BYTES).to_string();
    IndexRecord::for_post(post, post.id.clone(), content, indexed_at)
}

/// Records for a full index rebuild: every body is split into chunks of
/// `chunk_chars` characters, one record per chunk.
///
/// Posts without a slug or not published are skipped, as are empty bodies.
pub fn chunked_records(
    posts: &[Post],
    chunk_chars: usize,
    indexed_at: DateTime<Utc>,
) -> Vec<IndexRecord> {
    let chunk_chars = if chunk_chars == 0 {
        INDEX_CHUNK_CHARS
    } else {
        chunk_chars
    };

    let mut records = Vec::new();
    for post in posts {
        if !post.has_slug() || !post.is_published() {
            continue;
        }
        let body = post_body(post);
        for (index, chunk) in split_chunks(&body, chunk_chars).into_iter().enumerate() {
            let mut record = IndexRecord::for_post(
                post,
                format!("{}-{}", post.id, index),
                chunk.to_string(),
                indexed_at,
            );
            record.chunk_index = Some(index);
            records.push(record);
        }
    }
    log::debug!("Built {} index chunks from {} posts", records.len(), posts.len());
    records
}

/// Splits `text` into consecutive pieces of at most `chunk_chars` characters.
pub fn split_chunks(text: &str, chunk_chars: usize) -> Vec<&str> {
    if text.is_empty() || chunk_chars == 0 {
        return Vec::new();
    }
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (offset, _) in text.char_indices() {
        if count == chunk_chars {
            chunks.push(&text[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }
    chunks.push(&text[start..]);
    chunks
}

/// Longest prefix of `text` that fits in `max_bytes` of UTF-8.
pub fn truncate_utf8(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = 0;
    for (offset, c) in text.char_indices() {
        if offset + c.len_utf8() > max_bytes {
            break;
        }
        end = offset + c.len_utf8();
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn published(id: &str, content: &str) -> Post {
        Post {
            id: id.into(),
            slug: Some(format!("slug-{}", id)),
            status: Some("Published".into()),
            post_type: Some("Post".into()),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn chunks_split_on_characters() {
        assert_eq!(split_chunks("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(split_chunks("", 3), Vec::<&str>::new());
        assert_eq!(split_chunks("日本語です", 2), vec!["日本", "語で", "す"]);
    }

    #[test]
    fn truncation_never_splits_a_character() {
        assert_eq!(truncate_utf8("hello", 10), "hello");
        assert_eq!(truncate_utf8("héllo", 2), "h");
        assert_eq!(truncate_utf8("日本語", 7), "日本");
        assert_eq!(truncate_utf8("日本語", 2), "");
    }

    #[test]
    fn chunk_ids_and_skips() {
        let mut draft = published("d", "draft body");
        draft.status = Some("Draft".into());
        let mut no_slug = published("n", "no slug");
        no_slug.slug = None;
        let long = published("p", &"x".repeat(4500));

        let records = chunked_records(&[draft, no_slug, long], INDEX_CHUNK_CHARS, at());
        let ids: Vec<_> = records.iter().map(|r| r.object_id.as_str()).collect();
        assert_eq!(ids, vec!["p-0", "p-1", "p-2"]);
        assert_eq!(records[2].content.len(), 500);
        assert_eq!(records[2].chunk_index, Some(2));
    }

    #[test]
    fn whole_record_is_truncated_and_stamped() {
        let mut post = published("p", &"é".repeat(3000));
        post.created_time = Some(DateStamp::Text("2024-01-01".into()));
        post.last_edited_date = Some(DateStamp::Text("garbage".into()));

        let record = post_record(&post, at());
        assert_eq!(record.object_id, "p");
        assert_eq!(record.content.len(), 5000);
        assert_eq!(record.created_timestamp, 1_704_067_200_000);
        assert_eq!(record.last_edited_timestamp, 0);
        assert_eq!(record.publish_date, post.created_time);
        assert_eq!(record.chunk_index, None);
    }

    #[test]
    fn searchability() {
        let post = published("p", "");
        assert!(is_searchable(&post));

        let mut locked = post.clone();
        locked.password = Some("secret".into());
        assert!(!is_searchable(&locked));

        let mut menu = post.clone();
        menu.post_type = Some("Menu".into());
        assert!(!is_searchable(&menu));
    }

    #[test]
    fn reindex_decisions() {
        let mut post = published("p", "");
        post.last_edited_date = Some(DateStamp::Text("2024-03-01T00:00:00Z".into()));

        let fresh = IndexedState {
            last_edited_date: Some(DateStamp::Text("2024-02-01T00:00:00Z".into())),
            last_index_date: Some(DateStamp::Text("2024-04-01T00:00:00Z".into())),
        };
        let stale = IndexedState {
            last_index_date: Some(DateStamp::Text("2024-02-15T00:00:00Z".into())),
            ..fresh.clone()
        };
        let partial = IndexedState {
            last_edited_date: None,
            ..fresh.clone()
        };

        assert!(needs_reindex(&post, None));
        assert!(!needs_reindex(&post, Some(&fresh)));
        assert!(needs_reindex(&post, Some(&stale)));
        assert!(needs_reindex(&post, Some(&partial)));
    }
}
