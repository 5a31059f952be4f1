use crate::constants::{MAX_SNIPPETS_PER_POST, SNIPPET_CHARS_AFTER, SNIPPET_CHARS_BEFORE};
use crate::model::Post;
use rayon::prelude::*;
use serde::Serialize;

/// A post matching a keyword, with up to three body snippets around the hits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub post: Post,
    pub results: Vec<String>,
}

/// Title, summary, tags and category run together the way the site's
/// search page builds them.
pub fn meta_text(post: &Post) -> String {
    let mut text = String::new();
    text.push_str(post.title.as_deref().unwrap_or_default());
    text.push_str(post.summary.as_deref().unwrap_or_default());
    if let Some(tags) = &post.tags {
        text.push_str(&tags.joined(" "));
    }
    if let Some(category) = &post.category {
        text.push_str(&category.joined(" "));
    }
    text
}

/// Filters `posts` down to those mentioning `keyword` anywhere in their
/// metadata or body, case-insensitively. Input order is kept.
///
/// Matching folds case the same way [`find_snippets`] does, so a body hit
/// always yields at least one snippet.
pub fn search_posts(posts: &[Post], keyword: &str) -> Vec<SearchHit> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Vec::new();
    }
    let needle: Vec<char> = keyword.chars().map(fold).collect();

    posts
        .par_iter()
        .filter_map(|post| {
            let body = post.content.as_deref().unwrap_or_default();
            let haystack: Vec<char> = format!("{} {}", meta_text(post), body)
                .chars()
                .map(fold)
                .collect();
            find_from(&haystack, &needle, 0)?;
            Some(SearchHit {
                post: post.clone(),
                results: find_snippets(body, keyword),
            })
        })
        .collect()
}

/// Snippets of `body` around the first occurrences of `keyword`.
///
/// Each snippet spans from 50 characters before a hit to 150 characters
/// after its start, clamped to the body. Searching resumes right after the
/// previous hit, so overlapping occurrences are not reported twice.
pub fn find_snippets(body: &str, keyword: &str) -> Vec<String> {
    let chars: Vec<char> = body.chars().collect();
    let folded: Vec<char> = chars.iter().map(|&c| fold(c)).collect();
    let needle: Vec<char> = keyword.chars().map(fold).collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut snippets = Vec::new();
    let mut from = 0;
    while snippets.len() < MAX_SNIPPETS_PER_POST {
        let Some(index) = find_from(&folded, &needle, from) else {
            break;
        };
        let start = index.saturating_sub(SNIPPET_CHARS_BEFORE);
        let end = (index + SNIPPET_CHARS_AFTER).min(chars.len());
        snippets.push(chars[start..end].iter().collect());
        from = index + needle.len();
    }
    snippets
}

/// Lowercases one char without changing the char count, so indices into
/// the folded text stay valid for the original.
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if from >= haystack.len() || needle.len() > haystack.len() - from {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}
