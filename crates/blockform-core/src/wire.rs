// SPDX-License-Identifier: AGPL-3.0-or-later
//! JSON wire format for blocks
//!
//! Blocks travel as `{"object":"block","type":T,T:{...},"children":[...]}`.
//! Older producers spell the rich-text array `text` or `richText` and put run
//! content in `plain_text`; those aliases are folded into the typed model here,
//! once, so nothing downstream has to look for them.

use crate::ast::{Block, BlockKind, BlockType, Column, Document, DocumentMeta, MediaSource};
use crate::rich_text::{Annotations, Color, RichTextRun};
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::{trace, warn};

const RICH_TEXT_KEYS: [&str; 3] = ["rich_text", "text", "richText"];

/// The two accepted block-list shapes
#[derive(Debug, Clone, PartialEq)]
pub enum BlockInput {
    /// Native tree: children nested under each block
    Nested(Vec<Value>),
    /// Flat list where each block points at its parent by id
    Flat(Vec<Value>),
}

impl BlockInput {
    /// Unwrap the accepted wrappers and decide which shape the blocks use
    pub fn detect(value: Value) -> Self {
        let items = block_array(value);
        if items.iter().any(|item| parent_pointer(item).is_some()) {
            Self::Flat(items)
        } else {
            Self::Nested(items)
        }
    }

    /// Resolve to the canonical typed tree
    pub fn into_blocks(self, max_depth: usize) -> Vec<Block> {
        let nested = match self {
            Self::Nested(items) => items,
            Self::Flat(items) => nest_flat(items, max_depth),
        };
        nested
            .iter()
            .filter_map(|v| block_from_value(v, 0, max_depth))
            .collect()
    }
}

/// Wire blocks to typed blocks, accepting any supported wrapper shape
pub fn blocks_from_value(value: Value, max_depth: usize) -> Vec<Block> {
    BlockInput::detect(value).into_blocks(max_depth)
}

/// Build a document from `{"metadata": {...}, "blocks"|"children": [...]}` or any
/// bare block shape
pub fn document_from_value(value: Value, max_depth: usize) -> Document {
    let meta = match value.get("metadata") {
        Some(raw) => serde_json::from_value::<DocumentMeta>(raw.clone()).unwrap_or_else(|e| {
            trace!(error = %e, "ignoring malformed metadata");
            DocumentMeta::default()
        }),
        None => DocumentMeta::default(),
    };
    Document {
        meta,
        blocks: blocks_from_value(value, max_depth),
    }
}

/// Locate the block array inside a bare array, single block, or wrapper object
pub fn block_array(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => {
            if obj.get("type").is_some_and(Value::is_string) {
                return vec![Value::Object(obj)];
            }
            for key in ["children", "blocks", "content", "results"] {
                if let Some(Value::Array(items)) = obj.remove(key) {
                    return items;
                }
            }
            match obj.remove("data") {
                Some(Value::Object(mut data)) => match data.remove("children") {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

fn parent_pointer(item: &Value) -> Option<&str> {
    item.get("parent_id")
        .and_then(Value::as_str)
        .or_else(|| item.get("parentId").and_then(Value::as_str))
        .or_else(|| {
            item.get("parent")
                .and_then(|p| p.get("block_id"))
                .and_then(Value::as_str)
        })
}

fn block_id(item: &Value) -> Option<&str> {
    item.get("id").and_then(Value::as_str)
}

/// Rebuild nesting from parent pointers.
///
/// Roots are blocks whose parent is absent from the list. Sibling order follows
/// the input order. Blocks caught in a parent cycle have no root and are dropped.
pub fn nest_flat(items: Vec<Value>, max_depth: usize) -> Vec<Value> {
    let ids: HashSet<&str> = items.iter().filter_map(block_id).collect();

    let mut children_of: HashMap<String, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();
    for (i, item) in items.iter().enumerate() {
        match parent_pointer(item) {
            Some(parent) if ids.contains(parent) && block_id(item) != Some(parent) => {
                children_of.entry(parent.to_string()).or_default().push(i);
            }
            _ => roots.push(i),
        }
    }

    let total = items.len();
    let mut slots: Vec<Option<Value>> = items.into_iter().map(Some).collect();
    let nested: Vec<Value> = roots
        .into_iter()
        .filter_map(|i| attach(i, &mut slots, &children_of, 0, max_depth))
        .collect();

    let orphaned = slots.iter().filter(|s| s.is_some()).count();
    if orphaned > 0 {
        trace!(orphaned, total, "dropped blocks unreachable from any root");
    }
    nested
}

fn attach(
    index: usize,
    slots: &mut [Option<Value>],
    children_of: &HashMap<String, Vec<usize>>,
    depth: usize,
    max_depth: usize,
) -> Option<Value> {
    let mut item = slots.get_mut(index)?.take()?;
    let Some(kids) = block_id(&item).and_then(|id| children_of.get(id)) else {
        return Some(item);
    };
    if depth >= max_depth {
        warn!(depth, "flat block list exceeds maximum nesting depth");
        return Some(item);
    }

    let nested: Vec<Value> = kids
        .iter()
        .filter_map(|&k| attach(k, slots, children_of, depth + 1, max_depth))
        .collect();

    if !nested.is_empty() {
        if let Value::Object(obj) = &mut item {
            match obj.get_mut("children") {
                Some(Value::Array(existing)) => existing.extend(nested),
                _ => {
                    obj.insert("children".to_string(), Value::Array(nested));
                }
            }
        }
    }
    Some(item)
}

fn is_archived(obj: &Map<String, Value>) -> bool {
    ["archived", "in_trash", "is_archived"]
        .iter()
        .any(|key| obj.get(*key).and_then(Value::as_bool).unwrap_or(false))
}

/// Children live either beside the payload or, in creation requests, inside it
fn child_values<'a>(obj: &'a Map<String, Value>, payload: &'a Value) -> &'a [Value] {
    obj.get("children")
        .and_then(Value::as_array)
        .or_else(|| payload.get("children").and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Convert one wire block (and its subtree) to the typed model.
///
/// Returns `None` for non-objects, archived blocks, and unknown types.
pub fn block_from_value(value: &Value, depth: usize, max_depth: usize) -> Option<Block> {
    let obj = value.as_object()?;
    let type_name = obj.get("type").and_then(Value::as_str)?;
    if is_archived(obj) {
        trace!(block_type = type_name, "skipping archived block");
        return None;
    }

    let Some(block_type) = type_name
        .parse::<BlockType>()
        .ok()
        .or_else(|| BlockType::legacy_heading(type_name))
    else {
        trace!(block_type = type_name, "skipping unknown block type");
        return None;
    };

    let payload = obj.get(type_name).unwrap_or(&Value::Null);
    let child_items = child_values(obj, payload);

    let convert_children = |items: &[Value]| -> Vec<Block> {
        if depth >= max_depth {
            if !items.is_empty() {
                warn!(depth, "block nesting exceeds maximum depth, dropping children");
            }
            return Vec::new();
        }
        items
            .iter()
            .filter_map(|v| block_from_value(v, depth + 1, max_depth))
            .collect()
    };

    let mut children = Vec::new();
    let kind = match block_type {
        BlockType::Heading1 | BlockType::Heading2 | BlockType::Heading3 => {
            children = convert_children(child_items);
            BlockKind::Heading {
                level: block_type.heading_level().unwrap_or(3),
                rich_text: payload_rich_text(payload),
                color: payload_color(payload),
            }
        }
        BlockType::Paragraph => {
            children = convert_children(child_items);
            BlockKind::Paragraph {
                rich_text: payload_rich_text(payload),
                color: payload_color(payload),
            }
        }
        BlockType::BulletedListItem => {
            children = convert_children(child_items);
            BlockKind::BulletedListItem {
                rich_text: payload_rich_text(payload),
                color: payload_color(payload),
            }
        }
        BlockType::NumberedListItem => {
            children = convert_children(child_items);
            BlockKind::NumberedListItem {
                rich_text: payload_rich_text(payload),
                color: payload_color(payload),
            }
        }
        BlockType::ToDo => {
            children = convert_children(child_items);
            BlockKind::ToDo {
                rich_text: payload_rich_text(payload),
                checked: payload.get("checked").and_then(Value::as_bool).unwrap_or(false),
            }
        }
        BlockType::Toggle => {
            children = convert_children(child_items);
            BlockKind::Toggle {
                rich_text: payload_rich_text(payload),
            }
        }
        BlockType::Quote => {
            children = convert_children(child_items);
            BlockKind::Quote {
                rich_text: payload_rich_text(payload),
                color: payload_color(payload),
            }
        }
        BlockType::Callout => {
            children = convert_children(child_items);
            BlockKind::Callout {
                rich_text: payload_rich_text(payload),
                icon: payload
                    .get("icon")
                    .and_then(|i| i.get("emoji"))
                    .and_then(Value::as_str)
                    .map(String::from),
                color: payload_color(payload),
            }
        }
        BlockType::Code => BlockKind::Code {
            rich_text: payload_rich_text(payload),
            language: payload
                .get("language")
                .and_then(Value::as_str)
                .filter(|l| !l.is_empty())
                .map(String::from),
        },
        BlockType::Image => BlockKind::Image {
            source: media_source(payload),
            caption: payload
                .get("caption")
                .and_then(Value::as_array)
                .map(|runs| runs_from_values(runs))
                .unwrap_or_default(),
        },
        BlockType::Video => BlockKind::Video {
            source: media_source(payload),
        },
        BlockType::Divider => BlockKind::Divider,
        BlockType::Table => {
            let rows: Vec<Vec<Vec<RichTextRun>>> = child_items
                .iter()
                .filter(|row| row.get("type").and_then(Value::as_str) == Some("table_row"))
                .map(table_row_cells)
                .collect();
            let widest = rows.iter().map(Vec::len).max().unwrap_or(0);
            BlockKind::Table {
                column_count: payload
                    .get("table_width")
                    .and_then(Value::as_u64)
                    .map(|w| usize::try_from(w).unwrap_or(usize::MAX).min(widest))
                    .unwrap_or(widest),
                has_header_row: payload
                    .get("has_column_header")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                rows,
            }
        }
        BlockType::ColumnList => BlockKind::ColumnList {
            columns: child_items
                .iter()
                .filter_map(|item| column_from_value(item, depth, max_depth))
                .collect(),
        },
        other => {
            trace!(block_type = %other, "no render model for block type");
            BlockKind::Unsupported { block_type: other }
        }
    };

    Some(Block {
        id: obj.get("id").and_then(Value::as_str).map(String::from),
        kind,
        children,
        archived: false,
    })
}

fn column_from_value(item: &Value, depth: usize, max_depth: usize) -> Option<Column> {
    if depth >= max_depth {
        warn!(depth, "column nesting exceeds maximum depth");
        return None;
    }
    let obj = item.as_object()?;
    if is_archived(obj) {
        return None;
    }
    if obj.get("type").and_then(Value::as_str) != Some("column") {
        // A stray non-column child still gets its own cell
        return block_from_value(item, depth + 1, max_depth).map(|block| Column {
            width_ratio: None,
            children: vec![block],
        });
    }
    let payload = obj.get("column").unwrap_or(&Value::Null);
    Some(Column {
        width_ratio: payload.get("width_ratio").and_then(Value::as_f64),
        children: child_values(obj, payload)
            .iter()
            .filter_map(|v| block_from_value(v, depth + 2, max_depth))
            .collect(),
    })
}

fn table_row_cells(row: &Value) -> Vec<Vec<RichTextRun>> {
    row.get("table_row")
        .and_then(|r| r.get("cells"))
        .and_then(Value::as_array)
        .map(|cells| {
            cells
                .iter()
                .map(|cell| cell.as_array().map(|runs| runs_from_values(runs)).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default()
}

fn media_source(payload: &Value) -> Option<MediaSource> {
    let url_of = |key: &str| {
        payload
            .get(key)
            .and_then(|v| v.get("url"))
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
            .map(String::from)
    };
    if let Some(url) = url_of("external") {
        return Some(MediaSource::External(url));
    }
    if let Some(url) = url_of("file") {
        return Some(MediaSource::File(url));
    }
    if let Some(url) = payload.get("url").and_then(Value::as_str).filter(|u| !u.is_empty()) {
        return Some(MediaSource::External(url.to_string()));
    }
    payload
        .get("placeholder")
        .and_then(Value::as_str)
        .map(|hint| MediaSource::Placeholder(hint.to_string()))
}

fn payload_color(payload: &Value) -> Color {
    payload
        .get("color")
        .and_then(Value::as_str)
        .and_then(|c| c.parse().ok())
        .unwrap_or_default()
}

/// Rich text of a payload under any of its historical field names
pub fn payload_rich_text(payload: &Value) -> Vec<RichTextRun> {
    RICH_TEXT_KEYS
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_array))
        .map(|runs| runs_from_values(runs))
        .unwrap_or_default()
}

pub fn runs_from_values(values: &[Value]) -> Vec<RichTextRun> {
    values.iter().filter_map(run_from_value).collect()
}

/// Convert one wire run. Bare strings become unformatted runs.
pub fn run_from_value(value: &Value) -> Option<RichTextRun> {
    if let Some(s) = value.as_str() {
        return Some(RichTextRun::plain(s));
    }
    let obj = value.as_object()?;
    let text = obj.get("text");

    let content = text
        .and_then(|t| t.get("content"))
        .and_then(Value::as_str)
        .or_else(|| obj.get("plain_text").and_then(Value::as_str))
        .or_else(|| obj.get("content").and_then(Value::as_str))
        .or_else(|| {
            obj.get("equation")
                .and_then(|e| e.get("expression"))
                .and_then(Value::as_str)
        })
        .unwrap_or_default()
        .to_string();

    let link = text
        .and_then(|t| t.get("link"))
        .and_then(|l| l.get("url"))
        .and_then(Value::as_str)
        .or_else(|| obj.get("href").and_then(Value::as_str))
        .filter(|u| !u.is_empty())
        .map(String::from);

    let annotations = obj
        .get("annotations")
        .map(annotations_from_value)
        .unwrap_or_default();

    Some(RichTextRun {
        content,
        annotations,
        link,
    })
}

fn annotations_from_value(value: &Value) -> Annotations {
    let flag = |key: &str| value.get(key).and_then(Value::as_bool).unwrap_or(false);
    Annotations {
        bold: flag("bold"),
        italic: flag("italic"),
        underline: flag("underline"),
        strikethrough: flag("strikethrough"),
        code: flag("code"),
        color: value
            .get("color")
            .and_then(Value::as_str)
            .and_then(|c| c.parse().ok())
            .unwrap_or_default(),
    }
}

/// Typed blocks to a wire array
pub fn blocks_to_value(blocks: &[Block]) -> Value {
    Value::Array(blocks.iter().map(block_to_value).collect())
}

/// One typed block (and its subtree) to wire form
pub fn block_to_value(block: &Block) -> Value {
    let block_type = block.block_type();
    let mut children: Vec<Value> = block.children.iter().map(block_to_value).collect();

    let payload = match &block.kind {
        BlockKind::Heading { rich_text, color, .. }
        | BlockKind::Paragraph { rich_text, color }
        | BlockKind::BulletedListItem { rich_text, color }
        | BlockKind::NumberedListItem { rich_text, color }
        | BlockKind::Quote { rich_text, color } => json!({
            "rich_text": runs_to_value(rich_text),
            "color": color.as_str(),
        }),
        BlockKind::ToDo { rich_text, checked } => json!({
            "rich_text": runs_to_value(rich_text),
            "checked": checked,
        }),
        BlockKind::Toggle { rich_text } => json!({ "rich_text": runs_to_value(rich_text) }),
        BlockKind::Callout { rich_text, icon, color } => {
            let mut payload = json!({
                "rich_text": runs_to_value(rich_text),
                "color": color.as_str(),
            });
            if let Some(emoji) = icon {
                payload["icon"] = json!({ "type": "emoji", "emoji": emoji });
            }
            payload
        }
        BlockKind::Code { rich_text, language } => json!({
            "rich_text": runs_to_value(rich_text),
            "language": language.as_deref().unwrap_or("plain_text"),
        }),
        BlockKind::Image { source, caption } => {
            let mut payload = media_to_value(source.as_ref());
            if !caption.is_empty() {
                payload["caption"] = runs_to_value(caption);
            }
            payload
        }
        BlockKind::Video { source } => media_to_value(source.as_ref()),
        BlockKind::Divider | BlockKind::Unsupported { .. } => json!({}),
        BlockKind::Table {
            column_count,
            has_header_row,
            rows,
        } => {
            children = rows
                .iter()
                .map(|cells| {
                    json!({
                        "object": "block",
                        "type": "table_row",
                        "table_row": {
                            "cells": cells.iter().map(|c| runs_to_value(c)).collect::<Vec<_>>(),
                        },
                    })
                })
                .collect();
            json!({
                "table_width": column_count,
                "has_column_header": has_header_row,
                "has_row_header": false,
            })
        }
        BlockKind::ColumnList { columns } => {
            children = columns.iter().map(column_to_value).collect();
            json!({})
        }
    };

    let mut obj = Map::new();
    obj.insert("object".to_string(), json!("block"));
    if let Some(id) = &block.id {
        obj.insert("id".to_string(), json!(id));
    }
    obj.insert("type".to_string(), json!(block_type.as_str()));
    obj.insert(block_type.as_str().to_string(), payload);
    if !children.is_empty() {
        obj.insert("children".to_string(), Value::Array(children));
    }
    Value::Object(obj)
}

fn column_to_value(column: &Column) -> Value {
    let mut payload = Map::new();
    if let Some(ratio) = column.width_ratio {
        payload.insert("width_ratio".to_string(), json!(ratio));
    }
    json!({
        "object": "block",
        "type": "column",
        "column": Value::Object(payload),
        "children": column.children.iter().map(block_to_value).collect::<Vec<_>>(),
    })
}

fn media_to_value(source: Option<&MediaSource>) -> Value {
    match source {
        Some(MediaSource::External(url)) => json!({ "type": "external", "external": { "url": url } }),
        Some(MediaSource::File(url)) => json!({ "type": "file", "file": { "url": url } }),
        Some(MediaSource::Placeholder(hint)) => json!({ "type": "external", "placeholder": hint }),
        None => json!({ "type": "external" }),
    }
}

pub fn runs_to_value(runs: &[RichTextRun]) -> Value {
    Value::Array(runs.iter().map(run_to_value).collect())
}

fn run_to_value(run: &RichTextRun) -> Value {
    let mut text = json!({ "content": run.content });
    if let Some(url) = &run.link {
        text["link"] = json!({ "url": url });
    }
    let a = &run.annotations;
    json!({
        "type": "text",
        "text": text,
        "annotations": {
            "bold": a.bold,
            "italic": a.italic,
            "strikethrough": a.strikethrough,
            "underline": a.underline,
            "code": a.code,
            "color": a.color.as_str(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DEFAULT_MAX_DEPTH;
    use crate::rich_text::plain_text;
    use pretty_assertions::assert_eq;

    fn para(id: &str, parent: Option<&str>, text: &str) -> Value {
        let mut v = json!({
            "id": id,
            "type": "paragraph",
            "paragraph": { "rich_text": [{ "type": "text", "text": { "content": text } }] },
        });
        if let Some(p) = parent {
            v["parent_id"] = json!(p);
        }
        v
    }

    #[test]
    fn test_unwraps_wrappers() {
        let block = para("a", None, "x");
        assert_eq!(block_array(json!([block.clone()])).len(), 1);
        assert_eq!(block_array(json!({ "children": [block.clone()] })).len(), 1);
        assert_eq!(block_array(json!({ "data": { "children": [block.clone()] } })).len(), 1);
        assert_eq!(block_array(block).len(), 1);
        assert!(block_array(json!(42)).is_empty());
        assert!(block_array(json!({ "nothing": true })).is_empty());
    }

    #[test]
    fn test_legacy_text_alias() {
        let v = json!({
            "type": "heading_2",
            "heading_2": { "text": [{ "plain_text": "Old", "href": "/old" }] },
        });
        let block = block_from_value(&v, 0, DEFAULT_MAX_DEPTH).unwrap();
        let runs = block.rich_text().unwrap();
        assert_eq!(plain_text(runs), "Old");
        assert_eq!(runs[0].link.as_deref(), Some("/old"));
    }

    #[test]
    fn test_flat_list_is_nested() {
        let input = json!([
            para("root", None, "root"),
            { "id": "cl", "type": "column_list", "column_list": {} },
            { "id": "c1", "parent_id": "cl", "type": "column", "column": { "width_ratio": 2.0 } },
            { "id": "c2", "parentId": "cl", "type": "column", "column": {} },
            para("p1", Some("c1"), "left"),
            para("p2", Some("c2"), "right"),
        ]);
        assert!(matches!(BlockInput::detect(input.clone()), BlockInput::Flat(_)));

        let blocks = blocks_from_value(input, DEFAULT_MAX_DEPTH);
        assert_eq!(blocks.len(), 2);
        match &blocks[1].kind {
            BlockKind::ColumnList { columns } => {
                assert_eq!(columns.len(), 2);
                assert_eq!(columns[0].width_ratio, Some(2.0));
                assert_eq!(columns[0].children[0].plain_text(), "left");
                assert_eq!(columns[1].children[0].plain_text(), "right");
            }
            other => panic!("expected column list, got {other:?}"),
        }
    }

    #[test]
    fn test_parent_cycle_is_dropped() {
        let input = vec![
            para("a", Some("b"), "a"),
            para("b", Some("a"), "b"),
            para("c", None, "c"),
        ];
        let nested = nest_flat(input, DEFAULT_MAX_DEPTH);
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0]["id"], "c");
    }

    #[test]
    fn test_archived_blocks_are_skipped() {
        let mut archived = para("a", None, "gone");
        archived["archived"] = json!(true);
        let mut trashed = para("b", None, "gone too");
        trashed["in_trash"] = json!(true);
        let blocks = blocks_from_value(json!([archived, trashed, para("c", None, "kept")]), 8);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].plain_text(), "kept");
    }

    #[test]
    fn test_unknown_type_is_skipped() {
        let blocks = blocks_from_value(json!([{ "type": "hologram", "hologram": {} }]), 8);
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_table_rows() {
        let v = json!({
            "type": "table",
            "table": { "table_width": 2, "has_column_header": true },
            "children": [
                { "type": "table_row", "table_row": { "cells": [[{ "plain_text": "A" }], [{ "plain_text": "B" }]] } },
                { "type": "table_row", "table_row": { "cells": [[{ "plain_text": "1" }], []] } },
            ],
        });
        let block = block_from_value(&v, 0, DEFAULT_MAX_DEPTH).unwrap();
        match block.kind {
            BlockKind::Table { column_count, has_header_row, rows } => {
                assert_eq!(column_count, 2);
                assert!(has_header_row);
                assert_eq!(rows.len(), 2);
                assert!(rows[1][1].is_empty());
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_table_width_bounded_by_rows() {
        let v = json!({
            "type": "table",
            "table": { "table_width": 2_000_000u64 },
            "children": [
                { "type": "table_row", "table_row": { "cells": [[{ "plain_text": "only" }]] } },
            ],
        });
        let block = block_from_value(&v, 0, DEFAULT_MAX_DEPTH).unwrap();
        assert!(matches!(block.kind, BlockKind::Table { column_count: 1, .. }));
    }

    #[test]
    fn test_depth_cap_drops_deep_children() {
        let mut v = para("leaf", None, "leaf");
        for i in 0..10 {
            v = json!({
                "id": format!("t{i}"),
                "type": "toggle",
                "toggle": { "rich_text": [] },
                "children": [v],
            });
        }
        let block = block_from_value(&v, 0, 3).unwrap();
        assert_eq!(block.block_count(), 4);
    }

    #[test]
    fn test_typed_to_wire_and_back() {
        let blocks = vec![
            Block::heading(1, vec![RichTextRun::plain("Title")]),
            Block::bulleted(vec![RichTextRun::plain("item").bold().link("/x")]),
            Block::code("print(1)\n", Some("python".into())),
            Block::divider(),
        ];
        let wire = blocks_to_value(&blocks);
        assert_eq!(wire[0]["type"], "heading_1");
        assert_eq!(wire[2]["code"]["language"], "python");
        assert_eq!(wire[3]["divider"], json!({}));
        let back = blocks_from_value(wire, DEFAULT_MAX_DEPTH);
        assert_eq!(back, blocks);
    }
}
