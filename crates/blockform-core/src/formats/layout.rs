// SPDX-License-Identifier: AGPL-3.0-or-later
//! Page scaffolds around a rendered fragment: full document, article, and the
//! collection list of article cards

use crate::ast::DocumentMeta;
use crate::formats::html::HeadingEntry;
use crate::rich_text::escape_html;
use crate::traits::RenderConfig;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const DATE_LABEL: &str = "%B %-d, %Y";

/// Anchor id for a heading: lowercase, punctuation dropped, whitespace and
/// hyphen runs collapsed to one hyphen, no leading or trailing hyphen
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
    }
    slug
}

/// `YYYY-MM-DD` or RFC 3339
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Long-form label (`March 1, 2024`); unparseable input comes back verbatim
pub fn format_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.date().format(DATE_LABEL).to_string(),
        None => raw.to_string(),
    }
}

fn time_element(raw: &str) -> String {
    format!(
        "<time datetime=\"{}\">{}</time>",
        escape_html(raw),
        escape_html(&format_date(raw))
    )
}

/// Complete HTML page with a sidebar linking to each top-level heading
pub fn document_page(fragment: &str, headings: &[HeadingEntry], meta: &DocumentMeta) -> String {
    let title = meta.title.as_deref().unwrap_or("Document");
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"UTF-8\">\n");
    page.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    page.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    page.push_str("</head>\n<body>\n<nav class=\"sidebar\">\n");
    for heading in headings {
        page.push_str(&format!(
            "<a href=\"#{}\" class=\"nav-h{}\">{}</a>\n",
            escape_html(&heading.id),
            heading.level,
            escape_html(&heading.text)
        ));
    }
    page.push_str("</nav>\n<main>\n");
    page.push_str(fragment);
    page.push_str("</main>\n</body>\n</html>\n");
    page
}

/// `<article>` with an optional back link and a header built from metadata
pub fn article(fragment: &str, meta: &DocumentMeta, config: &RenderConfig) -> String {
    let mut html = String::from("<article>\n");

    if let Some(back) = &config.back_link {
        html.push_str(&format!(
            "<a class=\"back-link\" href=\"{}\">{}</a>\n",
            escape_html(&back.href),
            escape_html(&back.label)
        ));
    }

    if meta.title.is_some() || meta.date.is_some() || !meta.authors.is_empty() {
        html.push_str("<header>\n");
        if let Some(title) = &meta.title {
            html.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));
        }
        let mut byline = Vec::new();
        if let Some(date) = &meta.date {
            byline.push(time_element(date));
        }
        if !meta.authors.is_empty() {
            let authors: Vec<String> = meta.authors.iter().map(|a| escape_html(a)).collect();
            byline.push(format!("<span>By {}</span>", authors.join(", ")));
        }
        if !byline.is_empty() {
            html.push_str(&format!("<div class=\"byline\">{}</div>\n", byline.join(" • ")));
        }
        html.push_str("</header>\n");
    }

    html.push_str("<main>\n");
    html.push_str(fragment);
    html.push_str("</main>\n</article>\n");
    html
}

/// One card of a collection list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionEntry {
    pub title: Option<String>,
    pub slug: Option<String>,
    /// ISO-8601 date or timestamp
    pub date: Option<String>,
    #[serde(alias = "author", deserialize_with = "crate::ast::one_or_many")]
    pub authors: Vec<String>,
    pub summary: Option<String>,
    #[serde(deserialize_with = "crate::ast::one_or_many")]
    pub tags: Vec<String>,
}

impl CollectionEntry {
    fn timestamp(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_timestamp)
    }
}

/// Newest first; undated entries last; ties broken by title
fn newest_first(a: &CollectionEntry, b: &CollectionEntry) -> Ordering {
    b.timestamp()
        .cmp(&a.timestamp())
        .then_with(|| a.title.cmp(&b.title))
}

/// `<section>` of article cards linking to `collection_base_path + slug`.
///
/// Entries without a title or slug are left out; no entries renders nothing.
pub fn render_collection(entries: &[CollectionEntry], config: &RenderConfig) -> String {
    let mut visible: Vec<&CollectionEntry> = entries
        .iter()
        .filter(|e| e.title.as_deref().is_some_and(|t| !t.trim().is_empty()))
        .filter(|e| e.slug.as_deref().is_some_and(|s| !s.trim().is_empty()))
        .collect();
    if visible.is_empty() {
        return String::new();
    }
    visible.sort_by(|a, b| newest_first(a, b));

    let mut html = String::from("<section class=\"collection-section\">\n");
    for entry in visible {
        let title = entry.title.as_deref().unwrap_or_default();
        let slug = entry.slug.as_deref().unwrap_or_default();
        let href = format!("{}{}", config.collection_base_path, slug.trim());

        html.push_str("<article>\n");
        html.push_str(&format!("<a href=\"{}\">\n", escape_html(&href)));
        if let Some(date) = &entry.date {
            html.push_str(&time_element(date));
            html.push('\n');
        }
        html.push_str(&format!("<h3>{}</h3>\n", escape_html(title)));
        if let Some(summary) = entry.summary.as_deref().filter(|s| !s.is_empty()) {
            html.push_str(&format!("<p class=\"summary\">{}</p>\n", escape_html(summary)));
        }
        if !entry.authors.is_empty() {
            html.push_str(&format!("<p>{}</p>\n", escape_html(&entry.authors.join(", "))));
        }
        html.push_str("</a>\n</article>\n");
    }
    html.push_str("</section>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::BackLink;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Getting Started!"), "getting-started");
        assert_eq!(slugify("  --Hello,   World--  "), "hello-world");
        assert_eq!(slugify("snake_case & more"), "snake_case-more");
        assert_eq!(slugify("?!"), "");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-01"), "March 1, 2024");
        assert_eq!(format_date("2023-12-25T10:30:00Z"), "December 25, 2023");
        assert_eq!(format_date("next tuesday"), "next tuesday");
    }

    #[test]
    fn test_document_page_nav() {
        let headings = vec![HeadingEntry {
            level: 1,
            id: "intro".into(),
            text: "Intro".into(),
        }];
        let page = document_page("<h1 id=\"intro\">Intro</h1>\n", &headings, &DocumentMeta::default());
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Document</title>"));
        assert!(page.contains("<a href=\"#intro\" class=\"nav-h1\">Intro</a>"));
        assert!(page.contains("<main>\n<h1 id=\"intro\">Intro</h1>\n</main>"));
    }

    #[test]
    fn test_article_header() {
        let meta = DocumentMeta {
            title: Some("Tips & Tricks".into()),
            authors: vec!["Ada".into(), "Grace".into()],
            date: Some("2024-03-01".into()),
            tags: Vec::new(),
        };
        let config = RenderConfig {
            back_link: Some(BackLink {
                label: "Blog".into(),
                href: "/collection/blog".into(),
            }),
            ..RenderConfig::default()
        };
        assert_eq!(
            article("<p>x</p>\n", &meta, &config),
            "<article>\n<a class=\"back-link\" href=\"/collection/blog\">Blog</a>\n<header>\n<h1>Tips &amp; Tricks</h1>\n<div class=\"byline\"><time datetime=\"2024-03-01\">March 1, 2024</time> • <span>By Ada, Grace</span></div>\n</header>\n<main>\n<p>x</p>\n</main>\n</article>\n"
        );
    }

    #[test]
    fn test_article_without_meta_has_no_header() {
        let html = article("", &DocumentMeta::default(), &RenderConfig::default());
        assert_eq!(html, "<article>\n<main>\n</main>\n</article>\n");
    }

    #[test]
    fn test_collection_order_and_filtering() {
        let entries: Vec<CollectionEntry> = serde_json::from_value(serde_json::json!([
            { "title": "Old", "slug": "old", "date": "2023-01-01" },
            { "title": "Untitled draft", "date": "2025-01-01" },
            { "title": "B", "slug": "b", "date": "2024-05-05", "author": "Ada" },
            { "title": "A", "slug": "a", "date": "2024-05-05T00:00:00Z" },
            { "title": "Someday", "slug": "someday" },
        ]))
        .unwrap();
        let html = render_collection(&entries, &RenderConfig::default());

        let order: Vec<&str> = ["/blog-post/a", "/blog-post/b", "/blog-post/old", "/blog-post/someday"]
            .into_iter()
            .filter(|href| html.contains(href))
            .collect();
        assert_eq!(order.len(), 4);
        let positions: Vec<usize> = order.iter().filter_map(|href| html.find(href)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!html.contains("Untitled draft"));
        assert!(html.contains("<p>Ada</p>"));
        assert!(html.starts_with("<section class=\"collection-section\">"));
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(render_collection(&[], &RenderConfig::default()), "");
    }
}
