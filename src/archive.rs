//! Archive view: published posts grouped by publication month.

use crate::model::{valid_timestamp, Post};
use indexmap::IndexMap;

/// Group key for posts without a usable publish date.
pub const UNDATED_GROUP: &str = "unknown";

/// Groups published `Post`s by `yyyy-MM`, newest month first.
///
/// Posts are ordered by publish date, newest first, before grouping, so each
/// group is itself in descending order and groups appear in the order of
/// their newest post. Undated posts sort last and share one group.
pub fn archive_posts(posts: &[Post]) -> IndexMap<String, Vec<Post>> {
    let mut published: Vec<&Post> = posts
        .iter()
        .filter(|post| post.is_type("Post") && post.is_published())
        .collect();
    published.sort_by_key(|post| std::cmp::Reverse(valid_timestamp(post.publish_date.as_ref())));

    let mut groups: IndexMap<String, Vec<Post>> = IndexMap::new();
    for post in published {
        let key = post
            .publish_date
            .as_ref()
            .and_then(|date| date.to_datetime())
            .map(|date| date.format("%Y-%m").to_string())
            .unwrap_or_else(|| UNDATED_GROUP.to_string());
        let mut post = post.clone();
        post.block_map = None;
        groups.entry(key).or_default().push(post);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DateStamp;
    use pretty_assertions::assert_eq;

    fn post(id: &str, date: Option<&str>) -> Post {
        Post {
            id: id.into(),
            post_type: Some("Post".into()),
            status: Some("Published".into()),
            publish_date: date.map(|d| DateStamp::Text(d.into())),
            ..Default::default()
        }
    }

    #[test]
    fn groups_by_month_newest_first() {
        let mut page = post("page", Some("2024-03-01"));
        page.post_type = Some("Page".into());
        let posts = vec![
            post("jan", Some("2024-01-10")),
            post("undated", None),
            post("mar-early", Some("2024-03-02")),
            page,
            post("mar-late", Some("2024-03-20")),
        ];

        let groups = archive_posts(&posts);
        let shape: Vec<(String, Vec<String>)> = groups
            .iter()
            .map(|(month, posts)| (month.clone(), posts.iter().map(|p| p.id.clone()).collect()))
            .collect();

        assert_eq!(
            shape,
            vec![
                ("2024-03".to_string(), vec!["mar-late".to_string(), "mar-early".to_string()]),
                ("2024-01".to_string(), vec!["jan".to_string()]),
                (UNDATED_GROUP.to_string(), vec!["undated".to_string()]),
            ]
        );
    }
}
