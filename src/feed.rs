// src/feed.rs
//! RSS 2.0 feed of the latest published posts.

use crate::error::AppError;
use crate::model::{valid_timestamp, Post};
use crate::search::post_body;
use anyhow::Context;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use std::io::{self, Write};

/// Namespace of the `content:encoded` item element.
pub const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";

const GENERATOR: &str = concat!("notion-content ", env!("CARGO_PKG_VERSION"));

/// Channel-level facts about the site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSettings {
    pub title: String,
    pub description: String,
    /// Site root, such as `https://blog.example.com`.
    pub link: String,
    pub sub_path: Option<String>,
    pub language: Option<String>,
    pub author: Option<String>,
}

impl FeedSettings {
    fn site_root(&self) -> &str {
        self.link.trim_end_matches('/')
    }

    /// The channel `<link>`: the site root joined with the sub path, if any.
    pub fn channel_link(&self) -> String {
        match self.sub_path.as_deref().map(|p| p.trim_matches('/')) {
            Some(sub_path) if !sub_path.is_empty() => format!("{}/{}", self.site_root(), sub_path),
            _ => self.site_root().to_string(),
        }
    }

    fn copyright(&self, generated_at: DateTime<Utc>) -> String {
        let year = generated_at.format("%Y");
        match self.author.as_deref().filter(|a| !a.is_empty()) {
            Some(author) => format!("All rights reserved {}, {}", year, author),
            None => format!("All rights reserved {}", year),
        }
    }
}

/// One `<item>` of the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub title: Option<String>,
    pub link: String,
    pub description: Option<String>,
    pub content: String,
    pub date: Option<DateTime<Utc>>,
}

/// The `count` most recently edited published `Post`s, newest first.
///
/// A post without a last-edited date is ordered by its publish date; posts
/// with neither sort last, keeping their input order.
pub fn latest_posts(posts: &[Post], count: usize) -> Vec<Post> {
    let mut published: Vec<&Post> = posts
        .iter()
        .filter(|post| post.is_type("Post") && post.is_published())
        .collect();
    published.sort_by_key(|post| {
        std::cmp::Reverse(valid_timestamp(
            post.last_edited_date.as_ref().or(post.publish_date.as_ref()),
        ))
    });
    published.into_iter().take(count).cloned().collect()
}

/// Body carried by a feed item. Password-protected posts only expose their
/// summary.
pub fn feed_content(post: &Post) -> String {
    if post.has_password() {
        return post.summary.clone().unwrap_or_default();
    }
    post_body(post)
}

/// Feed items for `posts`, in the given order, linking under `site_link`.
pub fn feed_items(posts: &[Post], site_link: &str) -> Vec<FeedItem> {
    let root = site_link.trim_end_matches('/');
    posts
        .iter()
        .map(|post| FeedItem {
            title: post.title.clone(),
            link: format!("{}/{}", root, post.slug.as_deref().unwrap_or_default()),
            description: post.summary.clone(),
            content: feed_content(post),
            date: post.publish_date.as_ref().and_then(|date| date.to_datetime()),
        })
        .collect()
}

/// Renders the RSS 2.0 document for `items`.
pub fn render_rss(
    settings: &FeedSettings,
    items: &[FeedItem],
    generated_at: DateTime<Utc>,
) -> Result<String, AppError> {
    log::debug!("Rendering RSS channel with {} items", items.len());
    Ok(write_document(settings, items, generated_at)?)
}

fn write_document(
    settings: &FeedSettings,
    items: &[FeedItem],
    generated_at: DateTime<Utc>,
) -> anyhow::Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .context("writing XML declaration")?;
    writer
        .create_element("rss")
        .with_attribute(("version", "2.0"))
        .with_attribute(("xmlns:content", CONTENT_NAMESPACE))
        .write_inner_content(|writer| write_channel(writer, settings, items, generated_at))
        .with_context(|| format!("writing RSS channel for {}", settings.channel_link()))?;
    String::from_utf8(writer.into_inner()).context("RSS document is not UTF-8")
}

fn write_channel<W: Write>(
    writer: &mut Writer<W>,
    settings: &FeedSettings,
    items: &[FeedItem],
    generated_at: DateTime<Utc>,
) -> io::Result<()> {
    writer.create_element("channel").write_inner_content(|writer| {
        text_element(writer, "title", &settings.title)?;
        text_element(writer, "link", &settings.channel_link())?;
        text_element(writer, "description", &settings.description)?;
        if let Some(language) = settings.language.as_deref().filter(|l| !l.is_empty()) {
            text_element(writer, "language", language)?;
        }
        text_element(writer, "copyright", &settings.copyright(generated_at))?;
        text_element(writer, "lastBuildDate", &generated_at.to_rfc2822())?;
        text_element(writer, "generator", GENERATOR)?;
        for item in items {
            write_item(writer, item)?;
        }
        Ok(())
    })?;
    Ok(())
}

fn write_item<W: Write>(writer: &mut Writer<W>, item: &FeedItem) -> io::Result<()> {
    writer.create_element("item").write_inner_content(|writer| {
        text_element(writer, "title", item.title.as_deref().unwrap_or_default())?;
        text_element(writer, "link", &item.link)?;
        text_element(writer, "guid", &item.link)?;
        if let Some(description) = &item.description {
            text_element(writer, "description", description)?;
        }
        text_element(writer, "content:encoded", &item.content)?;
        if let Some(date) = item.date {
            text_element(writer, "pubDate", &date.to_rfc2822())?;
        }
        Ok(())
    })?;
    Ok(())
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}
