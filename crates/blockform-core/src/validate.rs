// SPDX-License-Identifier: AGPL-3.0-or-later
//! Block schema validator and fixer
//!
//! Walks wire-format blocks pre-order and produces a repaired copy. Defects that
//! can be normalised in place are recorded as fixes; blocks that cannot be
//! trusted (no type, unknown type, too deep) are dropped and recorded as errors.
//! Running the validator over its own output records nothing.

use crate::ast::{BlockType, DEFAULT_MAX_DEPTH};
use crate::rich_text::Color;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

/// Code block languages accepted as-is
pub const CODE_LANGUAGES: [&str; 24] = [
    "javascript",
    "typescript",
    "python",
    "java",
    "c",
    "cpp",
    "csharp",
    "php",
    "ruby",
    "go",
    "rust",
    "kotlin",
    "swift",
    "html",
    "css",
    "sql",
    "shell",
    "powershell",
    "dockerfile",
    "yaml",
    "json",
    "xml",
    "markdown",
    "plain_text",
];

const RUN_TYPES: [&str; 3] = ["text", "mention", "equation"];
const ICON_TYPES: [&str; 3] = ["emoji", "external", "file"];
const ANNOTATION_FLAGS: [&str; 5] = ["bold", "italic", "strikethrough", "underline", "code"];
const CONTEXT_LIMIT: usize = 200;

/// One recorded error or fix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,
    /// Truncated JSON of the node the issue was found on
    pub context: String,
}

/// Outcome of a validation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// True when no errors were recorded; fixes alone never invalidate
    pub is_valid: bool,
    pub errors: Vec<Issue>,
    pub fixes: Vec<Issue>,
    /// Repaired input, in the same outer shape it arrived in
    pub fixed_data: Value,
}

/// Validate and repair any accepted input shape with default settings
pub fn validate(input: &Value) -> ValidationReport {
    Validator::new().run(input)
}

#[derive(Debug, Clone)]
pub struct Validator {
    max_depth: usize,
    errors: Vec<Issue>,
    fixes: Vec<Issue>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            errors: Vec::new(),
            fixes: Vec::new(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Run one pass. Accepts a block array, a single block, or a wrapper
    /// holding `children` or `data.children`.
    pub fn run(mut self, input: &Value) -> ValidationReport {
        let fixed_data = match input {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .filter(|item| !item.is_null())
                    .filter_map(|item| self.process_item(item))
                    .collect(),
            ),
            Value::Object(_) => self.process_item(input).unwrap_or(Value::Null),
            other => {
                self.error("Input must be a block, an array of blocks, or a wrapper object", other);
                Value::Null
            }
        };

        ValidationReport {
            is_valid: self.errors.is_empty(),
            errors: self.errors,
            fixes: self.fixes,
            fixed_data,
        }
    }

    fn error(&mut self, message: impl Into<String>, context: &Value) {
        let message = message.into();
        warn!(%message, "validation error");
        self.errors.push(Issue {
            message,
            context: context_snippet(context),
        });
    }

    fn fix(&mut self, message: impl Into<String>, context: &Value) {
        let message = message.into();
        debug!(%message, "validation fix");
        self.fixes.push(Issue {
            message,
            context: context_snippet(context),
        });
    }

    /// A wrapper has no `type`; everything else is treated as a block
    fn process_item(&mut self, item: &Value) -> Option<Value> {
        let Some(obj) = item.as_object() else {
            self.error("Invalid item: not an object", item);
            return None;
        };
        if obj.contains_key("type") {
            return self.fix_block(item, 0);
        }

        if let Some(Value::Object(data)) = obj.get("data") {
            if let Some(children) = data.get("children") {
                let children = self.process_children(children, 0);
                let mut data = data.clone();
                data.insert("children".to_string(), Value::Array(children));
                let mut wrapper = obj.clone();
                wrapper.insert("data".to_string(), Value::Object(data));
                return Some(Value::Object(wrapper));
            }
        }
        if let Some(children) = obj.get("children") {
            let children = self.process_children(children, 0);
            let mut wrapper = obj.clone();
            wrapper.insert("children".to_string(), Value::Array(children));
            return Some(Value::Object(wrapper));
        }

        self.fix_block(item, 0)
    }

    fn process_children(&mut self, children: &Value, depth: usize) -> Vec<Value> {
        match children {
            Value::Array(items) => self.process_blocks(items, depth),
            other => {
                self.error("Children must be an array", other);
                Vec::new()
            }
        }
    }

    fn process_blocks(&mut self, items: &[Value], depth: usize) -> Vec<Value> {
        items
            .iter()
            .filter_map(|child| self.fix_block(child, depth))
            .collect()
    }

    fn fix_block(&mut self, value: &Value, depth: usize) -> Option<Value> {
        let Some(obj) = value.as_object() else {
            self.error("Block is not a valid object", value);
            return None;
        };
        if depth >= self.max_depth {
            self.error(
                format!("Block nesting exceeds maximum depth of {}", self.max_depth),
                value,
            );
            return None;
        }
        let Some(type_name) = obj.get("type").and_then(Value::as_str) else {
            self.error("Block missing type property", value);
            return None;
        };

        let mut block = obj.clone();
        let block_type = match type_name.parse::<BlockType>() {
            Ok(block_type) => block_type,
            Err(_) => match BlockType::legacy_heading(type_name) {
                Some(heading) => {
                    if let Some(payload) = block.remove(type_name) {
                        block.insert(heading.as_str().to_string(), payload);
                    }
                    block.insert("type".to_string(), json!(heading.as_str()));
                    self.fix(format!("Converted {type_name} to {heading}"), value);
                    heading
                }
                None => {
                    self.error(format!("Invalid block type: {type_name}"), value);
                    return None;
                }
            },
        };

        if is_empty_block(&block, block_type) {
            self.fix("Removed empty block", value);
            return None;
        }

        self.repair_payload(&mut block, block_type, value, depth);

        match block.remove("children") {
            Some(Value::Array(children)) => {
                let children = self.process_blocks(&children, depth + 1);
                block.insert("children".to_string(), Value::Array(children));
            }
            Some(_) => self.fix("Removed non-array children", value),
            None => {}
        }

        // Nothing left once repair stripped the junk
        if is_empty_block(&block, block_type) {
            self.fix("Removed empty block", value);
            return None;
        }

        Some(Value::Object(block))
    }

    fn repair_payload(
        &mut self,
        block: &mut Map<String, Value>,
        block_type: BlockType,
        ctx: &Value,
        depth: usize,
    ) {
        let key = block_type.as_str();
        match block.get(key) {
            Some(Value::Object(_)) => {}
            Some(_) => {
                self.fix(format!("Replaced non-object {key} property"), ctx);
                block.insert(key.to_string(), json!({}));
            }
            None => {
                self.fix(format!("Added missing {key} property"), ctx);
                block.insert(key.to_string(), json!({}));
            }
        }

        if matches!(block_type, BlockType::ColumnList | BlockType::Column) {
            let has_children = block.contains_key("children")
                || block.get(key).is_some_and(|p| p.get("children").is_some());
            if !has_children {
                self.fix(format!("Added missing children to {key}"), ctx);
                block.insert("children".to_string(), json!([]));
            }
        }

        let Some(Value::Object(payload)) = block.get_mut(key) else {
            return;
        };

        if block_type.is_rich_text_bearing() {
            self.repair_rich_text(payload, key, ctx);
            self.repair_block_color(payload, key, ctx);
        }

        match block_type {
            BlockType::ToDo => match payload.get("checked") {
                Some(Value::Bool(_)) => {}
                Some(other) => {
                    let checked = truthy(other);
                    payload.insert("checked".to_string(), json!(checked));
                    self.fix("Coerced checked property of to_do block to boolean", ctx);
                }
                None => {
                    payload.insert("checked".to_string(), json!(false));
                    self.fix("Added missing checked property to to_do block", ctx);
                }
            },
            BlockType::Code => {
                let known = match payload.get("language") {
                    None => true,
                    Some(lang) => lang.as_str().is_some_and(|l| CODE_LANGUAGES.contains(&l)),
                };
                if !known {
                    payload.insert("language".to_string(), json!("plain_text"));
                    self.fix("Fixed invalid language in code block", ctx);
                }
            }
            BlockType::Callout => {
                let valid_icon = match payload.get("icon") {
                    None => true,
                    Some(icon) => icon
                        .get("type")
                        .and_then(Value::as_str)
                        .is_some_and(|t| ICON_TYPES.contains(&t)),
                };
                if !valid_icon {
                    payload.insert("icon".to_string(), json!({ "type": "emoji", "emoji": "💡" }));
                    self.fix("Replaced invalid callout icon", ctx);
                }
            }
            BlockType::Image => match payload.get("type").and_then(Value::as_str) {
                Some("external" | "file") => {}
                Some(_) => {
                    payload.insert("type".to_string(), json!("external"));
                    self.fix("Fixed invalid image type", ctx);
                }
                None => {
                    payload.insert("type".to_string(), json!("external"));
                    self.fix("Added missing type to image block", ctx);
                }
            },
            BlockType::Divider => {
                if !payload.is_empty() {
                    payload.clear();
                    self.fix("Cleared divider payload", ctx);
                }
            }
            _ => {}
        }

        // Creation requests nest children inside the payload
        match payload.remove("children") {
            Some(Value::Array(children)) => {
                let children = self.process_blocks(&children, depth + 1);
                payload.insert("children".to_string(), Value::Array(children));
            }
            Some(_) => self.fix(format!("Removed non-array children from {key}"), ctx),
            None => {}
        }
    }

    fn repair_rich_text(&mut self, payload: &mut Map<String, Value>, label: &str, ctx: &Value) {
        if !payload.contains_key("rich_text") {
            for alias in ["text", "richText"] {
                if let Some(runs) = payload.remove(alias) {
                    payload.insert("rich_text".to_string(), runs);
                    self.fix(format!("Renamed legacy {alias} array to rich_text in {label}"), ctx);
                    break;
                }
            }
        }

        let runs = match payload.remove("rich_text") {
            Some(Value::Array(runs)) => runs,
            Some(_) => {
                self.fix(format!("Converted rich_text to array in {label}"), ctx);
                Vec::new()
            }
            None => {
                self.fix(format!("Added missing rich_text array to {label}"), ctx);
                Vec::new()
            }
        };

        let mut repaired: Vec<Value> = runs
            .into_iter()
            .filter_map(|run| self.repair_run(run, ctx))
            .collect();
        if repaired.is_empty() {
            repaired.push(json!({ "type": "text", "text": { "content": "" } }));
            self.fix(format!("Added default empty rich_text item to {label}"), ctx);
        }
        payload.insert("rich_text".to_string(), Value::Array(repaired));
    }

    fn repair_run(&mut self, run: Value, ctx: &Value) -> Option<Value> {
        let Value::Object(mut run) = run else {
            self.fix("Removed rich text item that is not an object", ctx);
            return None;
        };

        match run.get("type").and_then(Value::as_str) {
            Some(t) if RUN_TYPES.contains(&t) => {}
            Some(_) => {
                run.insert("type".to_string(), json!("text"));
                self.fix("Fixed invalid rich text type", ctx);
            }
            None => {
                run.insert("type".to_string(), json!("text"));
                self.fix("Added missing type to rich text item", ctx);
            }
        }

        if run.get("type").and_then(Value::as_str) == Some("text") {
            let fallback = run
                .get("plain_text")
                .or_else(|| run.get("content"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            match run.get_mut("text") {
                Some(Value::Object(text)) => {
                    if !text.get("content").is_some_and(Value::is_string) {
                        text.insert("content".to_string(), json!(fallback));
                        self.fix("Added missing content to text property", ctx);
                    }
                }
                _ => {
                    run.insert("text".to_string(), json!({ "content": fallback }));
                    self.fix("Added missing text property to rich text item", ctx);
                }
            }
        }

        let malformed = match run.get_mut("annotations") {
            Some(Value::Object(annotations)) => {
                self.repair_annotations(annotations, ctx);
                false
            }
            Some(_) => true,
            None => false,
        };
        if malformed {
            run.remove("annotations");
            self.fix("Removed annotations that are not an object", ctx);
        }

        Some(Value::Object(run))
    }

    fn repair_annotations(&mut self, annotations: &mut Map<String, Value>, ctx: &Value) {
        let unknown: Vec<String> = annotations
            .keys()
            .filter(|k| k.as_str() != "color" && !ANNOTATION_FLAGS.contains(&k.as_str()))
            .cloned()
            .collect();
        for key in unknown {
            annotations.remove(&key);
            self.fix(format!("Removed unknown annotation {key}"), ctx);
        }

        for flag in ANNOTATION_FLAGS {
            if let Some(value) = annotations.get(flag) {
                if !value.is_boolean() {
                    let coerced = truthy(value);
                    annotations.insert(flag.to_string(), json!(coerced));
                    self.fix(format!("Coerced annotation {flag} to boolean"), ctx);
                }
            }
        }

        if annotations.get("color").is_some_and(|c| !is_valid_color(c)) {
            annotations.remove("color");
            self.fix("Removed invalid annotation color", ctx);
        }
    }

    fn repair_block_color(&mut self, payload: &mut Map<String, Value>, label: &str, ctx: &Value) {
        if payload.get("color").is_some_and(|c| !is_valid_color(c)) {
            payload.remove("color");
            self.fix(format!("Removed invalid color from {label}"), ctx);
        }
    }
}

/// Keys that identify or describe a block without being content
const BOOKKEEPING_KEYS: [&str; 14] = [
    "object",
    "type",
    "id",
    "parent",
    "parent_id",
    "parentId",
    "has_children",
    "archived",
    "in_trash",
    "is_archived",
    "created_time",
    "last_edited_time",
    "created_by",
    "last_edited_by",
];

/// Bookkeeping keys aside, a block is empty when it has no content at all, or
/// when its only content is an empty payload object that the type does not
/// allow. An empty `children` array is not content.
fn is_empty_block(block: &Map<String, Value>, block_type: BlockType) -> bool {
    let content_keys = block
        .iter()
        .filter(|(k, _)| !BOOKKEEPING_KEYS.contains(&k.as_str()))
        .filter(|(k, v)| {
            k.as_str() != "children" || v.as_array().map_or(true, |items| !items.is_empty())
        })
        .count();
    if content_keys == 0 {
        return true;
    }
    let payload_is_empty = block
        .get(block_type.as_str())
        .and_then(Value::as_object)
        .is_some_and(Map::is_empty);
    payload_is_empty && content_keys == 1 && !block_type.allows_empty_payload()
}

fn is_valid_color(value: &Value) -> bool {
    value.as_str().is_some_and(|c| c.parse::<Color>().is_ok())
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Truncated JSON of the node itself; nested children are left out so deep
/// trees are not reserialised at every level
fn context_snippet(value: &Value) -> String {
    let head = match value {
        Value::Object(obj) => Value::Object(
            obj.iter()
                .filter(|(key, _)| key.as_str() != "children")
                .map(|(key, v)| (key.clone(), without_children(v)))
                .collect(),
        ),
        Value::Array(items) => json!(format!("[{} items]", items.len())),
        other => other.clone(),
    };
    serde_json::to_string_pretty(&head)
        .unwrap_or_default()
        .chars()
        .take(CONTEXT_LIMIT)
        .collect()
}

fn without_children(value: &Value) -> Value {
    match value {
        Value::Object(obj) if obj.contains_key("children") => Value::Object(
            obj.iter()
                .filter(|(key, _)| key.as_str() != "children")
                .map(|(key, v)| (key.clone(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_run(content: &str) -> Value {
        json!({ "type": "text", "text": { "content": content } })
    }

    #[test]
    fn test_heading_downgrade_keeps_rich_text() {
        let input = json!({ "type": "heading_5", "heading_5": { "rich_text": [text_run("Deep")] } });
        let report = validate(&input);
        assert!(report.is_valid);
        assert_eq!(report.fixes.len(), 1);
        assert_eq!(report.fixed_data["type"], "heading_3");
        assert_eq!(report.fixed_data["heading_3"]["rich_text"], json!([text_run("Deep")]));
        assert!(report.fixed_data.get("heading_5").is_none());
    }

    #[test]
    fn test_unknown_type_dropped_and_missing_rich_text_fixed() {
        let input = json!([
            { "type": "hologram", "hologram": {} },
            { "type": "paragraph", "paragraph": { "color": "default" } },
        ]);
        let report = validate(&input);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert!(!report.fixes.is_empty());
        let fixed = report.fixed_data.as_array().unwrap();
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed[0]["paragraph"]["rich_text"], json!([text_run("")]));
    }

    #[test]
    fn test_missing_type_is_an_error() {
        let report = validate(&json!([{ "paragraph": { "rich_text": [] } }]));
        assert_eq!(report.errors[0].message, "Block missing type property");
        assert_eq!(report.fixed_data, json!([]));
    }

    #[test]
    fn test_empty_blocks_removed() {
        let input = json!([
            { "type": "paragraph" },
            { "object": "block", "type": "quote", "quote": {} },
            { "type": "divider", "divider": {} },
        ]);
        let report = validate(&input);
        assert!(report.is_valid);
        assert_eq!(report.fixes.len(), 2);
        assert_eq!(report.fixed_data, json!([{ "type": "divider", "divider": {} }]));
    }

    #[test]
    fn test_divider_payload_cleared() {
        let report = validate(&json!({ "type": "divider", "divider": { "junk": 1 } }));
        assert_eq!(report.fixed_data, json!({ "type": "divider", "divider": {} }));
        assert_eq!(report.fixes.len(), 1);
    }

    #[test]
    fn test_invalid_colors_stripped() {
        let input = json!({
            "type": "paragraph",
            "paragraph": {
                "color": "teal",
                "rich_text": [{
                    "type": "text",
                    "text": { "content": "x" },
                    "annotations": { "bold": 1, "color": "default_background" },
                }],
            },
        });
        let report = validate(&input);
        let payload = &report.fixed_data["paragraph"];
        assert!(payload.get("color").is_none());
        assert_eq!(payload["rich_text"][0]["annotations"], json!({ "bold": true }));
        assert_eq!(report.fixes.len(), 3);
    }

    #[test]
    fn test_code_language_reset() {
        let input = json!({ "type": "code", "code": { "rich_text": [text_run("x")], "language": "brainfuck" } });
        let report = validate(&input);
        assert_eq!(report.fixed_data["code"]["language"], "plain_text");
    }

    #[test]
    fn test_legacy_text_alias_renamed() {
        let input = json!({ "type": "quote", "quote": { "text": [text_run("old")] } });
        let report = validate(&input);
        assert_eq!(report.fixed_data["quote"]["rich_text"], json!([text_run("old")]));
        assert!(report.fixed_data["quote"].get("text").is_none());
    }

    #[test]
    fn test_callout_icon_and_image_type() {
        let input = json!([
            { "type": "callout", "callout": { "rich_text": [text_run("Note")], "icon": { "type": "sticker" } } },
            { "type": "image", "image": { "external": { "url": "https://x/y.png" } } },
        ]);
        let report = validate(&input);
        assert_eq!(report.fixed_data[0]["callout"]["icon"], json!({ "type": "emoji", "emoji": "💡" }));
        assert_eq!(report.fixed_data[1]["image"]["type"], "external");
    }

    #[test]
    fn test_wrappers_are_preserved() {
        let block = json!({ "type": "paragraph", "paragraph": { "rich_text": [text_run("a")] } });
        let report = validate(&json!({ "data": { "children": [block.clone()] }, "page": "p" }));
        assert!(report.is_valid);
        assert_eq!(report.fixed_data["data"]["children"], json!([block.clone()]));
        assert_eq!(report.fixed_data["page"], "p");

        let report = validate(&json!({ "children": [block.clone()] }));
        assert_eq!(report.fixed_data["children"], json!([block]));
    }

    #[test]
    fn test_column_list_children_recursed() {
        let input = json!({
            "type": "column_list",
            "column_list": {},
            "children": [
                {
                    "type": "column",
                    "column": {},
                    "children": [
                        { "type": "bogus" },
                        { "type": "paragraph", "paragraph": { "rich_text": [text_run("kept")] } },
                    ],
                },
                { "type": "column", "column": {} },
            ],
        });
        let report = validate(&input);
        assert_eq!(report.errors.len(), 1);
        let columns = report.fixed_data["children"].as_array().unwrap();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0]["children"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_identity_keys_do_not_make_a_block_non_empty() {
        let input = json!([
            { "object": "block", "id": "x", "type": "quote", "quote": {} },
            { "id": "y", "parent_id": "x", "has_children": false, "type": "paragraph", "paragraph": {}, "children": [] },
        ]);
        let report = validate(&input);
        assert!(report.is_valid);
        assert_eq!(report.fixed_data, json!([]));
        assert!(report.fixes.iter().all(|f| f.message == "Removed empty block"));
        assert_eq!(report.fixes.len(), 2);
    }

    #[test]
    fn test_column_whose_content_was_dropped_is_removed() {
        let report = validate(&json!({
            "type": "column_list",
            "column_list": {},
            "children": [{ "type": "column", "column": {}, "children": [{ "type": "bogus" }] }],
        }));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.fixed_data, Value::Null);
    }

    #[test]
    fn test_depth_cap() {
        let mut block = json!({ "type": "toggle", "toggle": { "rich_text": [text_run("leaf")] } });
        for _ in 0..5 {
            block = json!({ "type": "toggle", "toggle": { "rich_text": [text_run("t")] }, "children": [block] });
        }
        let report = Validator::new().with_max_depth(3).run(&block);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].message.contains("maximum depth"));
    }

    #[test]
    fn test_non_block_input() {
        let report = validate(&json!("hello"));
        assert!(!report.is_valid);
        assert_eq!(report.fixed_data, Value::Null);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = validate(&json!([]));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["isValid"], true);
        assert_eq!(value["fixedData"], json!([]));
    }

    #[test]
    fn test_code_block_color_stripped() {
        let input = json!({ "type": "code", "code": { "rich_text": [text_run("x")], "language": "rust", "color": "teal" } });
        let report = validate(&input);
        assert!(report.fixed_data["code"].get("color").is_none());
        assert_eq!(report.fixes.len(), 1);
        assert_eq!(report.fixes[0].message, "Removed invalid color from code");
    }

    #[test]
    fn test_context_leaves_out_children() {
        let report = validate(&json!({
            "type": "hologram",
            "children": [{ "type": "paragraph", "paragraph": { "rich_text": [text_run("nested")] } }],
        }));
        let context = &report.errors[0].context;
        assert!(context.contains("hologram"));
        assert!(!context.contains("nested"));
    }

    #[test]
    fn test_context_is_truncated() {
        let long = "x".repeat(1000);
        let report = validate(&json!([{ "type": "nope", "nope": { "junk": long } }]));
        assert_eq!(report.errors[0].context.chars().count(), CONTEXT_LIMIT);
    }
}
