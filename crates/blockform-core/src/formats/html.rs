// SPDX-License-Identifier: AGPL-3.0-or-later
//! Block tree to HTML
//!
//! Sibling list items are grouped into `<ul>`/`<ol>` before per-block
//! rendering. Callouts nested in callouts are flattened into the outer
//! container. Column lists become a one-row table whose column widths always
//! sum to exactly 100%.

use crate::ast::{Block, BlockKind, Column, Document, ListKind, MediaSource};
use crate::formats::layout;
use crate::rich_text::{self, escape_html, RichTextRun};
use crate::traits::{Layout, RenderConfig, Renderer, Result};
use crate::wire;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{trace, warn};

/// Column widths are computed in hundredths of a percent
pub const FULL_WIDTH: u32 = 10_000;

/// HTML renderer
pub struct HtmlHandler;

impl HtmlHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HtmlHandler {
    fn render(&self, doc: &Document, config: &RenderConfig) -> Result<String> {
        Ok(render_document(doc, config).html)
    }
}

/// A heading that received an anchor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingEntry {
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// Rendered HTML plus bookkeeping callers may ignore
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderOutput {
    pub html: String,
    pub blocks_rendered: usize,
    /// Archived, unsupported, empty, or cut by the depth cap
    pub blocks_skipped: usize,
    /// Top-level headings in document order
    pub headings: Vec<HeadingEntry>,
}

/// Render a document in the configured layout
pub fn render_document(doc: &Document, config: &RenderConfig) -> RenderOutput {
    let mut output = render_fragment(&doc.blocks, config);
    output.html = match config.layout {
        Layout::Fragment => output.html,
        Layout::Document => layout::document_page(&output.html, &output.headings, &doc.meta),
        Layout::Article => layout::article(&output.html, &doc.meta, config),
    };
    output
}

/// Render wire JSON: nested or flat parent-pointer blocks, optionally wrapped
/// with a `metadata` object. Anything unrecognisable renders as empty.
pub fn render_value(value: Value, config: &RenderConfig) -> RenderOutput {
    let doc = wire::document_from_value(value, config.max_depth);
    render_document(&doc, config)
}

/// Render blocks to a bare fragment
pub fn render_fragment(blocks: &[Block], config: &RenderConfig) -> RenderOutput {
    let mut ctx = RenderContext::new(config);
    let mut html = String::new();
    render_blocks(&mut ctx, &mut html, blocks, 0);
    RenderOutput {
        html,
        blocks_rendered: ctx.rendered,
        blocks_skipped: ctx.skipped,
        headings: ctx.headings,
    }
}

struct RenderContext<'a> {
    config: &'a RenderConfig,
    slugs: SlugRegistry,
    in_callout: bool,
    rendered: usize,
    skipped: usize,
    headings: Vec<HeadingEntry>,
}

impl<'a> RenderContext<'a> {
    fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            slugs: SlugRegistry::default(),
            in_callout: false,
            rendered: 0,
            skipped: 0,
            headings: Vec::new(),
        }
    }

    fn rich(&self, runs: &[RichTextRun]) -> String {
        rich_text::render_html_styled(runs, self.config.color_styles)
    }
}

/// Hands out heading anchors, suffixing repeats with `-2`, `-3`, ...
#[derive(Debug, Default)]
pub struct SlugRegistry {
    seen: HashMap<String, usize>,
}

impl SlugRegistry {
    pub fn assign(&mut self, text: &str) -> String {
        let mut base = layout::slugify(text);
        if base.is_empty() {
            base = "section".to_string();
        }
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{base}-{count}")
        }
    }
}

/// Siblings after list grouping
#[derive(Debug, PartialEq)]
pub enum Sibling<'a> {
    List(ListKind, Vec<&'a Block>),
    Single(&'a Block),
}

/// Collapse runs of same-kind list items; archived blocks are dropped
pub fn group_siblings(blocks: &[Block]) -> Vec<Sibling<'_>> {
    let mut groups = Vec::new();
    for block in blocks.iter().filter(|b| !b.archived) {
        let Some(kind) = block.list_kind() else {
            groups.push(Sibling::Single(block));
            continue;
        };
        if let Some(Sibling::List(open, items)) = groups.last_mut() {
            if *open == kind {
                items.push(block);
                continue;
            }
        }
        groups.push(Sibling::List(kind, vec![block]));
    }
    groups
}

fn render_blocks(ctx: &mut RenderContext, out: &mut String, blocks: &[Block], depth: usize) {
    if blocks.is_empty() {
        return;
    }
    if depth >= ctx.config.max_depth {
        warn!(depth, dropped = blocks.len(), "nesting depth cap reached, dropping subtree");
        ctx.skipped += blocks.iter().map(Block::block_count).sum::<usize>();
        return;
    }
    ctx.skipped += blocks.iter().filter(|b| b.archived).count();

    for sibling in group_siblings(blocks) {
        match sibling {
            Sibling::List(kind, items) => render_list(ctx, out, kind, &items, depth),
            Sibling::Single(block) => render_block(ctx, out, block, depth),
        }
    }
}

fn render_list(ctx: &mut RenderContext, out: &mut String, kind: ListKind, items: &[&Block], depth: usize) {
    let tag = kind.tag();
    out.push_str(&format!("<{tag}>\n"));
    for item in items {
        out.push_str("<li>");
        if let Some(runs) = item.rich_text() {
            out.push_str(&ctx.rich(runs));
        }
        if !item.children.is_empty() {
            out.push('\n');
            render_blocks(ctx, out, &item.children, depth + 1);
        }
        out.push_str("</li>\n");
        ctx.rendered += 1;
    }
    out.push_str(&format!("</{tag}>\n"));
}

fn render_block(ctx: &mut RenderContext, out: &mut String, block: &Block, depth: usize) {
    match &block.kind {
        BlockKind::Heading { level, rich_text, .. } => {
            let level = (*level).clamp(1, 3);
            let text = rich_text::plain_text(rich_text);
            let id = ctx.slugs.assign(&text);
            out.push_str(&format!(
                "<h{level} id=\"{}\">{}</h{level}>\n",
                escape_html(&id),
                ctx.rich(rich_text)
            ));
            if depth == 0 && !ctx.in_callout {
                ctx.headings.push(HeadingEntry {
                    level,
                    id,
                    text,
                });
            }
        }

        BlockKind::Paragraph { rich_text, .. } => {
            let html = ctx.rich(rich_text);
            if html.trim().is_empty() {
                ctx.skipped += 1;
                render_blocks(ctx, out, &block.children, depth + 1);
                return;
            }
            out.push_str(&format!("<p>{html}</p>\n"));
        }

        BlockKind::Quote { rich_text, .. } => {
            out.push_str(&format!("<blockquote>{}", ctx.rich(rich_text)));
            if !block.children.is_empty() {
                out.push('\n');
                render_blocks(ctx, out, &block.children, depth + 1);
            }
            out.push_str("</blockquote>\n");
            ctx.rendered += 1;
            return;
        }

        BlockKind::ToDo { rich_text, checked } => {
            let checked = if *checked { " checked" } else { "" };
            out.push_str(&format!(
                "<div class=\"to-do\"><input type=\"checkbox\" disabled{checked}> {}",
                ctx.rich(rich_text)
            ));
            if !block.children.is_empty() {
                out.push('\n');
                render_blocks(ctx, out, &block.children, depth + 1);
            }
            out.push_str("</div>\n");
            ctx.rendered += 1;
            return;
        }

        BlockKind::Toggle { rich_text } => {
            out.push_str(&format!("<details><summary>{}</summary>\n", ctx.rich(rich_text)));
            render_blocks(ctx, out, &block.children, depth + 1);
            out.push_str("</details>\n");
            ctx.rendered += 1;
            return;
        }

        BlockKind::Callout { rich_text, icon, color } => {
            render_callout(ctx, out, block, rich_text, icon.as_deref(), color.as_str(), depth);
            return;
        }

        BlockKind::Code { rich_text, language } => {
            let body = escape_html(&rich_text::plain_text(rich_text));
            match language {
                Some(lang) => out.push_str(&format!(
                    "<pre><code class=\"language-{}\">{body}</code></pre>\n",
                    escape_html(lang)
                )),
                None => out.push_str(&format!("<pre><code>{body}</code></pre>\n")),
            }
        }

        BlockKind::Image { source, caption } => match source {
            Some(MediaSource::Placeholder(hint)) => {
                out.push_str(&format!("<p class=\"image-placeholder\">{}</p>\n", escape_html(hint)));
            }
            Some(source) => {
                let url = source.url().unwrap_or_default();
                let alt = escape_html(&rich_text::plain_text(caption));
                out.push_str(&format!("<figure><img src=\"{}\" alt=\"{alt}\">", escape_html(url)));
                if !caption.is_empty() {
                    out.push_str(&format!("<figcaption>{}</figcaption>", ctx.rich(caption)));
                }
                out.push_str("</figure>\n");
            }
            None => {
                trace!("skipping image without a source");
                ctx.skipped += 1;
                return;
            }
        },

        BlockKind::Video { source } => match source {
            Some(MediaSource::Placeholder(hint)) => {
                out.push_str(&format!("<p class=\"video-placeholder\">{}</p>\n", escape_html(hint)));
            }
            Some(source) => {
                out.push_str(&format!(
                    "<figure><video controls src=\"{}\"></video></figure>\n",
                    escape_html(source.url().unwrap_or_default())
                ));
            }
            None => {
                trace!("skipping video without a source");
                ctx.skipped += 1;
                return;
            }
        },

        BlockKind::Divider => out.push_str("<hr>\n"),

        BlockKind::Table {
            column_count,
            has_header_row,
            rows,
        } => render_table(ctx, out, *column_count, *has_header_row, rows),

        BlockKind::ColumnList { columns } => {
            if columns.is_empty() {
                ctx.skipped += 1;
                return;
            }
            render_columns(ctx, out, columns, depth);
        }

        BlockKind::Unsupported { block_type } => {
            trace!(%block_type, "skipping unsupported block");
            ctx.skipped += 1;
            return;
        }

        BlockKind::BulletedListItem { .. } | BlockKind::NumberedListItem { .. } => {
            // Always reached through group_siblings
            render_list(ctx, out, block.list_kind().unwrap_or(ListKind::Bulleted), &[block], depth);
            return;
        }
    }

    ctx.rendered += 1;
    render_blocks(ctx, out, &block.children, depth + 1);
}

/// Nested callouts (and their content) flatten into the outermost container
fn render_callout(
    ctx: &mut RenderContext,
    out: &mut String,
    block: &Block,
    rich_text: &[RichTextRun],
    icon: Option<&str>,
    color: &str,
    depth: usize,
) {
    let text = ctx.rich(rich_text);
    let lead = match icon {
        Some(icon) if !icon.is_empty() => {
            let icon = escape_html(icon);
            if text.is_empty() {
                icon
            } else {
                format!("{icon} {text}")
            }
        }
        _ => text,
    };
    ctx.rendered += 1;

    if ctx.in_callout {
        if !lead.trim().is_empty() {
            out.push_str(&format!("<p>{lead}</p>\n"));
        }
        render_blocks(ctx, out, &block.children, depth + 1);
        return;
    }

    let class = if color == "default" {
        "callout".to_string()
    } else {
        format!("callout callout-{color}")
    };
    out.push_str(&format!("<div class=\"{class}\">{lead}"));
    if !block.children.is_empty() {
        out.push('\n');
        ctx.in_callout = true;
        render_blocks(ctx, out, &block.children, depth + 1);
        ctx.in_callout = false;
    }
    out.push_str("</div>\n");
}

fn render_table(
    ctx: &mut RenderContext,
    out: &mut String,
    column_count: usize,
    has_header_row: bool,
    rows: &[Vec<Vec<RichTextRun>>],
) {
    // Padding never goes past the widest row actually present
    let widest = rows.iter().map(Vec::len).max().unwrap_or(0);
    let column_count = column_count.min(widest);
    out.push_str("<table>\n");
    for (i, row) in rows.iter().enumerate() {
        let tag = if has_header_row && i == 0 { "th" } else { "td" };
        out.push_str("<tr>");
        let width = column_count.max(row.len());
        for c in 0..width {
            let cell = row.get(c).map(|runs| ctx.rich(runs)).unwrap_or_default();
            out.push_str(&format!("<{tag}>{cell}</{tag}>"));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

fn render_columns(ctx: &mut RenderContext, out: &mut String, columns: &[Column], depth: usize) {
    let ratios: Vec<Option<f64>> = columns.iter().map(|c| c.width_ratio).collect();
    let widths = column_widths(&ratios);

    out.push_str("<table class=\"column-list\">\n<colgroup>");
    for width in &widths {
        out.push_str(&format!("<col style=\"width: {};\">", format_percent(*width)));
    }
    out.push_str("</colgroup>\n<tr>");
    for column in columns {
        let mut cell = String::new();
        render_blocks(ctx, &mut cell, &column.children, depth + 1);
        if cell.trim().is_empty() {
            out.push_str("<td>&nbsp;</td>");
        } else {
            out.push_str(&format!("<td>\n{cell}</td>"));
        }
    }
    out.push_str("</tr>\n</table>\n");
}

/// Widths in hundredths of a percent, summing to exactly [`FULL_WIDTH`].
///
/// Missing, zero, negative or non-finite ratios count as 1. Each column gets
/// the floor of its share and the last absorbs the rounding remainder.
pub fn column_widths(ratios: &[Option<f64>]) -> Vec<u32> {
    let weights: Vec<f64> = ratios
        .iter()
        .map(|r| match r {
            Some(r) if r.is_finite() && *r > 0.0 => *r,
            _ => 1.0,
        })
        .collect();
    if weights.is_empty() {
        return Vec::new();
    }
    let total: f64 = weights.iter().sum();
    if !total.is_finite() {
        return column_widths(&vec![None; weights.len()]);
    }

    let mut widths: Vec<u32> = weights
        .iter()
        .map(|w| ((w / total) * f64::from(FULL_WIDTH)).floor() as u32)
        .collect();
    let assigned: u32 = widths.iter().take(widths.len() - 1).sum();
    if let Some(last) = widths.last_mut() {
        *last = FULL_WIDTH.saturating_sub(assigned);
    }
    widths
}

/// `2500` -> `25%`, `3333` -> `33.33%`
pub fn format_percent(hundredths: u32) -> String {
    let whole = hundredths / 100;
    match hundredths % 100 {
        0 => format!("{whole}%"),
        frac if frac % 10 == 0 => format!("{whole}.{}%", frac / 10),
        frac => format!("{whole}.{frac:02}%"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BlockType, DocumentMeta};
    use crate::rich_text::Color;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Vec<RichTextRun> {
        vec![RichTextRun::plain(s)]
    }

    fn fragment(blocks: &[Block]) -> String {
        render_fragment(blocks, &RenderConfig::default()).html
    }

    fn column(ratio: Option<f64>, children: Vec<Block>) -> Column {
        Column {
            width_ratio: ratio,
            children,
        }
    }

    #[test]
    fn test_list_grouping() {
        let blocks = vec![
            Block::bulleted(text("a")),
            Block::bulleted(text("b")),
            Block::numbered(text("one")),
            Block::paragraph(text("break")),
            Block::bulleted(text("c")),
        ];
        assert_eq!(
            fragment(&blocks),
            "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n<ol>\n<li>one</li>\n</ol>\n<p>break</p>\n<ul>\n<li>c</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_nested_list_inside_item() {
        let blocks = vec![Block::bulleted(text("parent")).with_children(vec![Block::numbered(text("child"))])];
        assert_eq!(
            fragment(&blocks),
            "<ul>\n<li>parent\n<ol>\n<li>child</li>\n</ol>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_empty_paragraph_suppressed() {
        let blocks = vec![Block::paragraph(text("   ")), Block::paragraph(Vec::new())];
        let output = render_fragment(&blocks, &RenderConfig::default());
        assert_eq!(output.html, "");
        assert_eq!(output.blocks_skipped, 2);
    }

    #[test]
    fn test_heading_ids_deduplicated() {
        let blocks = vec![
            Block::heading(1, text("Getting Started!")),
            Block::heading(2, text("Getting started")),
        ];
        let output = render_fragment(&blocks, &RenderConfig::default());
        assert_eq!(
            output.html,
            "<h1 id=\"getting-started\">Getting Started!</h1>\n<h2 id=\"getting-started-2\">Getting started</h2>\n"
        );
        assert_eq!(output.headings.len(), 2);
        assert_eq!(output.headings[1].id, "getting-started-2");
    }

    #[test]
    fn test_heading_level_out_of_range_is_clamped() {
        let blocks = vec![
            Block::new(BlockKind::Heading {
                level: 7,
                rich_text: text("x"),
                color: Color::Default,
            }),
            Block::new(BlockKind::Heading {
                level: 0,
                rich_text: text("y"),
                color: Color::Default,
            }),
        ];
        let output = render_fragment(&blocks, &RenderConfig::default());
        assert_eq!(output.html, "<h3 id=\"x\">x</h3>\n<h1 id=\"y\">y</h1>\n");
        assert_eq!(output.headings[0].level, 3);
    }

    #[test]
    fn test_code_uses_plain_text() {
        let block = Block::new(BlockKind::Code {
            rich_text: vec![RichTextRun::plain("if a < b {").bold()],
            language: Some("rust".into()),
        });
        assert_eq!(
            fragment(&[block]),
            "<pre><code class=\"language-rust\">if a &lt; b {</code></pre>\n"
        );
    }

    #[test]
    fn test_callout_flattens_nested_callouts() {
        let inner = Block::new(BlockKind::Callout {
            rich_text: text("inner"),
            icon: Some("⚠️".into()),
            color: Color::Default,
        })
        .with_children(vec![Block::paragraph(text("deep"))]);
        let outer = Block::new(BlockKind::Callout {
            rich_text: text("outer"),
            icon: Some("💡".into()),
            color: Color::BlueBackground,
        })
        .with_children(vec![inner]);

        let html = fragment(&[outer]);
        assert_eq!(
            html,
            "<div class=\"callout callout-blue_background\">💡 outer\n<p>⚠️ inner</p>\n<p>deep</p>\n</div>\n"
        );
        assert_eq!(html.matches("<div").count(), 1);
    }

    #[test]
    fn test_image_and_placeholder() {
        let image = Block::new(BlockKind::Image {
            source: Some(MediaSource::External("https://x.test/a.png?w=1&h=2".into())),
            caption: text("A \"cat\""),
        });
        let placeholder = Block::new(BlockKind::Image {
            source: Some(MediaSource::Placeholder("hero shot".into())),
            caption: Vec::new(),
        });
        assert_eq!(
            fragment(&[image, placeholder]),
            "<figure><img src=\"https://x.test/a.png?w=1&amp;h=2\" alt=\"A &quot;cat&quot;\"><figcaption>A &quot;cat&quot;</figcaption></figure>\n<p class=\"image-placeholder\">hero shot</p>\n"
        );
    }

    #[test]
    fn test_table_header_row() {
        let table = Block::new(BlockKind::Table {
            column_count: 2,
            has_header_row: true,
            rows: vec![vec![text("Name"), text("Age")], vec![text("Ada")]],
        });
        assert_eq!(
            fragment(&[table]),
            "<table>\n<tr><th>Name</th><th>Age</th></tr>\n<tr><td>Ada</td><td></td></tr>\n</table>\n"
        );
    }

    #[test]
    fn test_table_declared_width_does_not_inflate_output() {
        let table = Block::new(BlockKind::Table {
            column_count: 2_000_000,
            has_header_row: false,
            rows: vec![vec![text("only")]],
        });
        assert_eq!(fragment(&[table]), "<table>\n<tr><td>only</td></tr>\n</table>\n");

        let input = serde_json::json!([{
            "type": "table",
            "table": { "table_width": 2_000_000u64 },
            "children": [{ "type": "table_row", "table_row": { "cells": [[{ "plain_text": "only" }]] } }],
        }]);
        let html = render_value(input, &RenderConfig::default()).html;
        assert_eq!(html.matches("<td>").count(), 1);
    }

    #[test]
    fn test_column_list_layout() {
        let list = Block::new(BlockKind::ColumnList {
            columns: vec![
                column(Some(1.0), vec![Block::paragraph(text("left"))]),
                column(None, Vec::new()),
                column(Some(2.0), vec![Block::divider()]),
            ],
        });
        assert_eq!(
            fragment(&[list]),
            "<table class=\"column-list\">\n<colgroup><col style=\"width: 25%;\"><col style=\"width: 25%;\"><col style=\"width: 50%;\"></colgroup>\n<tr><td>\n<p>left</p>\n</td><td>&nbsp;</td><td>\n<hr>\n</td></tr>\n</table>\n"
        );
    }

    #[test]
    fn test_column_widths_thirds() {
        assert_eq!(column_widths(&[None, None, None]), vec![3333, 3333, 3334]);
        assert_eq!(column_widths(&[Some(-1.0), Some(f64::NAN)]), vec![5000, 5000]);
        assert!(column_widths(&[]).is_empty());
        assert_eq!(format_percent(3333), "33.33%");
        assert_eq!(format_percent(1250), "12.5%");
        assert_eq!(format_percent(10_000), "100%");
    }

    #[test]
    fn test_toggle_todo_video() {
        let toggle = Block::new(BlockKind::Toggle { rich_text: text("More") })
            .with_children(vec![Block::paragraph(text("hidden"))]);
        let todo = Block::to_do(text("ship"), true);
        let video = Block::new(BlockKind::Video {
            source: Some(MediaSource::File("/v.mp4".into())),
        });
        assert_eq!(
            fragment(&[toggle, todo, video]),
            "<details><summary>More</summary>\n<p>hidden</p>\n</details>\n<div class=\"to-do\"><input type=\"checkbox\" disabled checked> ship</div>\n<figure><video controls src=\"/v.mp4\"></video></figure>\n"
        );
    }

    #[test]
    fn test_unsupported_and_archived_skipped() {
        let mut archived = Block::paragraph(text("gone"));
        archived.archived = true;
        let blocks = vec![
            Block::new(BlockKind::Unsupported {
                block_type: BlockType::Bookmark,
            }),
            archived,
            Block::paragraph(text("kept")),
        ];
        let output = render_fragment(&blocks, &RenderConfig::default());
        assert_eq!(output.html, "<p>kept</p>\n");
        assert_eq!(output.blocks_rendered, 1);
        assert_eq!(output.blocks_skipped, 2);
    }

    #[test]
    fn test_depth_cap_cuts_subtree() {
        let mut block = Block::paragraph(text("leaf"));
        for _ in 0..5 {
            block = Block::new(BlockKind::Toggle { rich_text: text("t") }).with_children(vec![block]);
        }
        let config = RenderConfig {
            max_depth: 2,
            ..RenderConfig::default()
        };
        let output = render_fragment(&[block], &config);
        assert_eq!(output.html.matches("<details>").count(), 2);
        assert!(!output.html.contains("leaf"));
        assert_eq!(output.blocks_skipped, 4);
    }

    #[test]
    fn test_render_value_flat_input() {
        let input = serde_json::json!([
            { "id": "l", "type": "bulleted_list_item", "bulleted_list_item": { "rich_text": [{ "plain_text": "top" }] } },
            { "id": "c", "parent_id": "l", "type": "paragraph", "paragraph": { "rich_text": [{ "plain_text": "nested" }] } },
        ]);
        let output = render_value(input, &RenderConfig::default());
        assert_eq!(output.html, "<ul>\n<li>top\n<p>nested</p>\n</li>\n</ul>\n");
    }

    #[test]
    fn test_render_value_garbage_is_empty() {
        let output = render_value(serde_json::json!(12), &RenderConfig::default());
        assert_eq!(output.html, "");
    }

    #[test]
    fn test_renderer_trait_article_layout() {
        let doc = Document::new(vec![Block::paragraph(text("body"))]).with_meta(DocumentMeta {
            title: Some("Post".into()),
            ..DocumentMeta::default()
        });
        let html = HtmlHandler::new()
            .render(&doc, &RenderConfig::default().with_layout(Layout::Article))
            .unwrap();
        assert!(html.starts_with("<article>"));
        assert!(html.contains("<p>body</p>"));
    }
}
