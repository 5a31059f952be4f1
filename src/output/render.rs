// src/output/render.rs
//! Plain-text renderings of results, driven by built-in Handlebars templates.
//!
//! JSON output goes through serde directly; these templates only shape the
//! human-readable forms.

use crate::error::AppError;
use crate::extract::TocEntry;
use crate::model::Post;
use crate::search::SearchHit;
use handlebars::{handlebars_helper, no_escape, Handlebars};
use indexmap::IndexMap;
use serde_json::json;

const TOC_TEMPLATE: &str = "toc";
const SEARCH_TEMPLATE: &str = "search";
const ARCHIVE_TEMPLATE: &str = "archive";

const TOC_SOURCE: &str = "{{#each entries}}{{indent indentLevel}}- {{text}}\n{{/each}}";
const SEARCH_SOURCE: &str = "{{#each hits}}{{#unless @first}}\n{{/unless}}## {{title}}{{#if slug}} (/{{slug}}){{/if}}\n{{#each results}}> {{this}}\n{{/each}}{{/each}}";
const ARCHIVE_SOURCE: &str = "{{#each groups}}{{#unless @first}}\n{{/unless}}## {{month}}\n{{#each posts}}- {{title}}{{#if slug}} (/{{slug}}){{/if}}\n{{/each}}{{/each}}";

handlebars_helper!(indent: |level: u64| "  ".repeat(level as usize));

fn template_engine() -> Result<Handlebars<'static>, AppError> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(no_escape);
    handlebars.register_helper("indent", Box::new(indent));
    for (name, source) in [
        (TOC_TEMPLATE, TOC_SOURCE),
        (SEARCH_TEMPLATE, SEARCH_SOURCE),
        (ARCHIVE_TEMPLATE, ARCHIVE_SOURCE),
    ] {
        handlebars
            .register_template_string(name, source)
            .map_err(|e| AppError::TemplateRenderError {
                name: name.to_string(),
                message: e.to_string(),
            })?;
    }
    Ok(handlebars)
}

fn render(name: &str, data: &serde_json::Value) -> Result<String, AppError> {
    template_engine()?
        .render(name, data)
        .map_err(|e| AppError::TemplateRenderError {
            name: name.to_string(),
            message: e.to_string(),
        })
}

fn display_title(post: &Post) -> String {
    post.title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| post.id.clone())
}

/// Markdown bullet outline, two spaces per indent level.
pub fn render_toc_outline(entries: &[TocEntry]) -> Result<String, AppError> {
    render(TOC_TEMPLATE, &json!({ "entries": entries }))
}

/// One section per hit, snippets quoted on a single line each.
pub fn render_search_hits(hits: &[SearchHit]) -> Result<String, AppError> {
    let hits: Vec<_> = hits
        .iter()
        .map(|hit| {
            json!({
                "title": display_title(&hit.post),
                "slug": hit.post.slug,
                "results": hit
                    .results
                    .iter()
                    .map(|snippet| snippet.replace('\n', " "))
                    .collect::<Vec<_>>(),
            })
        })
        .collect();
    render(SEARCH_TEMPLATE, &json!({ "hits": hits }))
}

/// One section per month.
pub fn render_archive(groups: &IndexMap<String, Vec<Post>>) -> Result<String, AppError> {
    let groups: Vec<_> = groups
        .iter()
        .map(|(month, posts)| {
            json!({
                "month": month,
                "posts": posts
                    .iter()
                    .map(|post| json!({ "title": display_title(post), "slug": post.slug }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect();
    render(ARCHIVE_TEMPLATE, &json!({ "groups": groups }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(text: &str, indent_level: usize) -> TocEntry {
        TocEntry {
            id: text.to_lowercase(),
            block_type: "header".into(),
            text: text.into(),
            indent_level,
        }
    }

    #[test]
    fn outline_indents_by_level() {
        let outline = render_toc_outline(&[
            entry("Intro", 0),
            entry("Setup & Install", 1),
            entry("Linux", 2),
            entry("Usage", 0),
        ])
        .unwrap();
        assert_eq!(
            outline,
            "- Intro\n  - Setup & Install\n    - Linux\n- Usage\n"
        );
    }

    #[test]
    fn search_hits_flatten_snippets() {
        let hit = SearchHit {
            post: Post {
                id: "p1".into(),
                title: Some("Rust notes".into()),
                slug: Some("rust-notes".into()),
                ..Default::default()
            },
            results: vec!["line one\nline two".into()],
        };
        let untitled = SearchHit {
            post: Post {
                id: "p2".into(),
                ..Default::default()
            },
            results: vec![],
        };
        assert_eq!(
            render_search_hits(&[hit, untitled]).unwrap(),
            "## Rust notes (/rust-notes)\n> line one line two\n\n## p2\n"
        );
    }

    #[test]
    fn archive_sections() {
        let mut groups = IndexMap::new();
        groups.insert(
            "2024-03".to_string(),
            vec![Post {
                id: "a".into(),
                title: Some("March post".into()),
                slug: Some("march".into()),
                ..Default::default()
            }],
        );
        groups.insert("unknown".to_string(), Vec::new());
        assert_eq!(
            render_archive(&groups).unwrap(),
            "## 2024-03\n- March post (/march)\n\n## unknown\n"
        );
    }
}
