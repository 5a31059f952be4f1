use super::record_map::RecordMap;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Post metadata as the blog's site-data layer hands it out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Option<TextList>,
    #[serde(default)]
    pub category: Option<TextList>,
    #[serde(rename = "type", default)]
    pub post_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub page_cover: Option<String>,
    #[serde(default)]
    pub page_cover_thumbnail: Option<String>,
    #[serde(default)]
    pub publish_date: Option<DateStamp>,
    #[serde(default)]
    pub last_edited_date: Option<DateStamp>,
    #[serde(default)]
    pub created_time: Option<DateStamp>,
    /// Flattened body text. Anything other than a string (the upstream
    /// layer sometimes parks the child id list here) reads as absent.
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: Option<String>,
    /// Record map attached by the site-data layer; dropped on output.
    #[serde(default, skip_serializing)]
    pub block_map: Option<RecordMap>,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.status.as_deref() == Some("Published")
    }

    pub fn has_password(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn has_slug(&self) -> bool {
        self.slug.as_deref().is_some_and(|s| !s.is_empty())
    }

    pub fn is_type(&self, post_type: &str) -> bool {
        self.post_type.as_deref() == Some(post_type)
    }
}

/// A field that is either one string or a list of strings (tags, category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextList {
    One(String),
    Many(Vec<String>),
}

impl TextList {
    pub fn joined(&self, separator: &str) -> String {
        match self {
            TextList::One(text) => text.clone(),
            TextList::Many(items) => items.join(separator),
        }
    }
}

/// A date as it appears in post metadata: epoch millis or a date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateStamp {
    Millis(i64),
    Text(String),
}

impl DateStamp {
    /// Interprets the stamp as a UTC instant.
    ///
    /// Strings are tried as RFC 3339, then `YYYY-MM-DD HH:MM:SS` (with or
    /// without a `T`), then `YYYY-MM-DD`, then as a number of millis.
    /// Zone-less strings are read as UTC.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            DateStamp::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            DateStamp::Text(text) => parse_date_text(text.trim()),
        }
    }
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    text.parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}

/// Epoch millis of an optional date; missing or unparseable dates give 0.
pub fn valid_timestamp(date: Option<&DateStamp>) -> i64 {
    date.and_then(DateStamp::to_datetime)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_site_data_shape() {
        let post: Post = serde_json::from_value(json!({
            "id": "abc",
            "slug": "hello",
            "title": "Hello",
            "tags": ["rust", "notion"],
            "category": "Tech",
            "type": "Post",
            "status": "Published",
            "password": "",
            "publishDate": 1704067200000i64,
            "lastEditedDate": "2024-01-02T03:04:05.000Z",
            "content": ["child-1", "child-2"],
            "ext": {}
        }))
        .unwrap();

        assert!(post.is_published());
        assert!(post.is_type("Post"));
        assert!(!post.has_password());
        assert_eq!(post.content, None);
        assert_eq!(post.tags.unwrap().joined(" "), "rust notion");
        assert_eq!(post.category.unwrap().joined(" "), "Tech");
    }

    #[test]
    fn timestamps_accept_the_usual_shapes() {
        let millis = DateStamp::Millis(1_704_067_200_000);
        let rfc = DateStamp::Text("2024-01-01T00:00:00Z".into());
        let plain_date = DateStamp::Text("2024-01-01".into());
        let spaced = DateStamp::Text("2024-01-01 00:00:00".into());
        let numeric = DateStamp::Text("1704067200000".into());

        for stamp in [&millis, &rfc, &plain_date, &spaced, &numeric] {
            assert_eq!(valid_timestamp(Some(stamp)), 1_704_067_200_000, "{:?}", stamp);
        }
    }

    #[test]
    fn invalid_dates_give_zero() {
        assert_eq!(valid_timestamp(None), 0);
        assert_eq!(valid_timestamp(Some(&DateStamp::Text("".into()))), 0);
        assert_eq!(valid_timestamp(Some(&DateStamp::Text("not a date".into()))), 0);
    }

    #[test]
    fn block_map_is_not_serialized() {
        let post = Post {
            id: "abc".into(),
            block_map: Some(RecordMap::default()),
            ..Default::default()
        };
        let value = serde_json::to_value(&post).unwrap();
        assert!(value.get("blockMap").is_none());
        assert_eq!(value["id"], "abc");
    }
}
