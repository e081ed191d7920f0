// SPDX-License-Identifier: AGPL-3.0-or-later
//! Markdown-ish text to blocks
//!
//! Line oriented: each line is classified on its own, except inside fenced code
//! where lines are captured verbatim. List items come out one block per line;
//! grouping them into lists is the renderer's job.

use crate::ast::{Block, Document, DocumentMeta};
use crate::rich_text::RichTextRun;
use crate::traits::{ParseConfig, Parser, Result};

const FENCE: &str = "```";
const DEFAULT_CODE_LANGUAGE: &str = "plain_text";

/// Markdown-ish text parser
pub struct MarkdownHandler;

impl MarkdownHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkdownHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for MarkdownHandler {
    fn parse(&self, input: &str, config: &ParseConfig) -> Result<Document> {
        let (meta, body) = split_front_matter(input, config);
        Ok(Document {
            meta,
            blocks: parse_blocks(body),
        })
    }
}

/// Parse text into top-level blocks. Never fails: unclassifiable lines become
/// paragraphs.
pub fn parse_blocks(input: &str) -> Vec<Block> {
    let mut state = LineState::default();
    let mut blocks: Vec<Block> = input.lines().filter_map(|line| state.feed(line)).collect();
    blocks.extend(state.finish());
    blocks
}

/// Fenced-code capture state threaded through the lines of one input
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineState {
    in_code_block: bool,
    code_buffer: String,
    code_language: String,
}

impl LineState {
    pub fn in_code_block(&self) -> bool {
        self.in_code_block
    }

    /// Consume one line, returning the block it completes, if any
    pub fn feed(&mut self, line: &str) -> Option<Block> {
        let trimmed = line.trim();

        if let Some(info) = trimmed.strip_prefix(FENCE) {
            if self.in_code_block {
                return Some(self.close_fence());
            }
            self.in_code_block = true;
            self.code_language = info.trim().to_string();
            return None;
        }

        if self.in_code_block {
            self.code_buffer.push_str(line);
            self.code_buffer.push('\n');
            return None;
        }

        classify_line(trimmed)
    }

    /// Flush an unterminated fence that captured anything
    pub fn finish(&mut self) -> Option<Block> {
        (self.in_code_block && !self.code_buffer.is_empty()).then(|| self.close_fence())
    }

    fn close_fence(&mut self) -> Block {
        let body = std::mem::take(&mut self.code_buffer);
        let language = std::mem::take(&mut self.code_language);
        self.in_code_block = false;
        let language = if language.is_empty() {
            DEFAULT_CODE_LANGUAGE.to_string()
        } else {
            language
        };
        Block::code(body, Some(language))
    }
}

fn classify_line(line: &str) -> Option<Block> {
    if line.is_empty() {
        return None;
    }

    if let Some((level, text)) = heading(line) {
        return Some(Block::heading(level.min(3), parse_inline(text)));
    }

    for (marker, checked) in [
        ("- [ ] ", false),
        ("- [x] ", true),
        ("- [X] ", true),
        ("* [ ] ", false),
        ("* [x] ", true),
    ] {
        if let Some(text) = line.strip_prefix(marker) {
            return Some(Block::to_do(parse_inline(text.trim()), checked));
        }
    }

    if let Some(text) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some(Block::bulleted(parse_inline(text.trim())));
    }

    if let Some(text) = numbered_item(line) {
        return Some(Block::numbered(parse_inline(text)));
    }

    if let Some(text) = line.strip_prefix('>').map(str::trim) {
        if !text.is_empty() {
            return Some(Block::quote(parse_inline(text)));
        }
    }

    if is_divider(line) {
        return Some(Block::divider());
    }

    if line.starts_with('|') {
        return Some(table_line(line));
    }

    Some(Block::paragraph(parse_inline(line)))
}

/// `#`..`######` followed by a space
fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let text = line[hashes..].strip_prefix(' ')?;
    Some((hashes as u8, text.trim()))
}

fn numbered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ").map(str::trim)
}

fn is_divider(line: &str) -> bool {
    matches!(line, "---" | "***" | "___")
}

/// Table rows degrade to a paragraph of their non-empty cells; a row with no
/// cell text keeps the raw line
fn table_line(line: &str) -> Block {
    let cells: Vec<&str> = line
        .split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect();
    if cells.is_empty() {
        return Block::paragraph(vec![RichTextRun::plain(line)]);
    }
    Block::paragraph(parse_inline(&cells.join(" | ")))
}

/// Split a line into runs for `**bold**`, `*italic*`, `` `code` ``,
/// `_underline_` and `[text](url)`.
///
/// Spans do not nest and the leftmost opening delimiter wins. Delimiters
/// without a partner stay literal.
pub fn parse_inline(text: &str) -> Vec<RichTextRun> {
    let mut runs = Vec::new();
    let mut plain = String::new();
    let mut rest = text;
    let mut prev: Option<char> = None;

    while let Some(c) = rest.chars().next() {
        if let Some((run, consumed)) = match_span(rest, prev) {
            if !plain.is_empty() {
                runs.push(RichTextRun::plain(std::mem::take(&mut plain)));
            }
            prev = rest[..consumed].chars().next_back();
            runs.push(run);
            rest = &rest[consumed..];
            continue;
        }
        plain.push(c);
        prev = Some(c);
        rest = &rest[c.len_utf8()..];
    }

    if !plain.is_empty() {
        runs.push(RichTextRun::plain(plain));
    }
    runs
}

fn match_span(rest: &str, prev: Option<char>) -> Option<(RichTextRun, usize)> {
    if let Some(after) = rest.strip_prefix("**") {
        let end = after.find("**")?;
        let inner = &after[..end];
        return (!inner.is_empty()).then(|| (RichTextRun::plain(inner).bold(), end + 4));
    }
    if let Some(after) = rest.strip_prefix('*') {
        let (inner, consumed) = delimited(after, '*')?;
        return Some((RichTextRun::plain(inner).italic(), consumed));
    }
    if let Some(after) = rest.strip_prefix('`') {
        let end = after.find('`')?;
        let inner = &after[..end];
        return (!inner.is_empty()).then(|| (RichTextRun::plain(inner).code(), end + 2));
    }
    if let Some(after) = rest.strip_prefix('_') {
        if prev.is_some_and(char::is_alphanumeric) {
            return None;
        }
        let (inner, consumed) = delimited(after, '_')?;
        if rest[consumed..].chars().next().is_some_and(char::is_alphanumeric) {
            return None;
        }
        return Some((RichTextRun::plain(inner).underline(), consumed));
    }
    if let Some(after) = rest.strip_prefix('[') {
        let close = after.find("](")?;
        let label = &after[..close];
        let target = &after[close + 2..];
        let end = target.find(')')?;
        let url = target[..end].trim();
        if label.is_empty() || url.is_empty() {
            return None;
        }
        return Some((RichTextRun::plain(label).link(url), 1 + close + 2 + end + 1));
    }
    None
}

/// Inner text up to the next `delim`, which must hug non-space text on both
/// sides. Returns the text and the total bytes consumed including delimiters.
fn delimited(after: &str, delim: char) -> Option<(&str, usize)> {
    let end = after.find(delim)?;
    let inner = &after[..end];
    let hugged = inner
        .chars()
        .next()
        .zip(inner.chars().next_back())
        .is_some_and(|(first, last)| !first.is_whitespace() && !last.is_whitespace());
    hugged.then_some((inner, end + 2 * delim.len_utf8()))
}

/// Split off `key: value` front matter when the config enables it and the
/// input opens with the delimiter. Unclosed front matter is left as body.
fn split_front_matter<'a>(input: &'a str, config: &ParseConfig) -> (DocumentMeta, &'a str) {
    let Some(delimiter) = config.front_matter_delimiter.as_deref() else {
        return (DocumentMeta::default(), input);
    };

    let mut lines = input.split_inclusive('\n');
    let mut offset = match lines.next() {
        Some(first) if first.trim() == delimiter => first.len(),
        _ => return (DocumentMeta::default(), input),
    };

    let mut meta = DocumentMeta::default();
    for line in lines {
        offset += line.len();
        if line.trim() == delimiter {
            return (meta, &input[offset..]);
        }
        if let Some((key, value)) = line.split_once(':') {
            apply_meta(&mut meta, key.trim(), unquote(value.trim()));
        }
    }
    (DocumentMeta::default(), input)
}

fn apply_meta(meta: &mut DocumentMeta, key: &str, value: &str) {
    let list = || -> Vec<String> {
        value
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(',')
            .map(|item| unquote(item.trim()).to_string())
            .filter(|item| !item.is_empty())
            .collect()
    };
    match key.to_ascii_lowercase().as_str() {
        "title" => meta.title = Some(value.to_string()),
        "date" => meta.date = Some(value.to_string()),
        "author" | "authors" => meta.authors = list(),
        "tags" => meta.tags = list(),
        _ => {}
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}
