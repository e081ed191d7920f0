// SPDX-License-Identifier: AGPL-3.0-or-later
//! Block-tree document model
//!
//! A document is a sequence of typed blocks. Text-bearing blocks own a list of
//! rich-text runs; containers (list items, toggles, callouts, columns) nest
//! further blocks. The same tree is the parser's output and the renderer's input.

use crate::rich_text::{self, Color, RichTextRun};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use unicode_segmentation::UnicodeSegmentation;

/// Nesting depth at which validation and rendering stop descending
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Closed set of block type names accepted by the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Paragraph,
    #[serde(rename = "heading_1")]
    Heading1,
    #[serde(rename = "heading_2")]
    Heading2,
    #[serde(rename = "heading_3")]
    Heading3,
    BulletedListItem,
    NumberedListItem,
    ToDo,
    Toggle,
    Code,
    Quote,
    Callout,
    Image,
    Video,
    File,
    Bookmark,
    Equation,
    Divider,
    TableOfContents,
    Breadcrumb,
    ColumnList,
    Column,
    LinkPreview,
    SyncedBlock,
    Template,
    LinkToPage,
    Table,
    TableRow,
    Embed,
    Pdf,
    Audio,
}

impl BlockType {
    pub const ALL: [Self; 30] = [
        Self::Paragraph,
        Self::Heading1,
        Self::Heading2,
        Self::Heading3,
        Self::BulletedListItem,
        Self::NumberedListItem,
        Self::ToDo,
        Self::Toggle,
        Self::Code,
        Self::Quote,
        Self::Callout,
        Self::Image,
        Self::Video,
        Self::File,
        Self::Bookmark,
        Self::Equation,
        Self::Divider,
        Self::TableOfContents,
        Self::Breadcrumb,
        Self::ColumnList,
        Self::Column,
        Self::LinkPreview,
        Self::SyncedBlock,
        Self::Template,
        Self::LinkToPage,
        Self::Table,
        Self::TableRow,
        Self::Embed,
        Self::Pdf,
        Self::Audio,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading1 => "heading_1",
            Self::Heading2 => "heading_2",
            Self::Heading3 => "heading_3",
            Self::BulletedListItem => "bulleted_list_item",
            Self::NumberedListItem => "numbered_list_item",
            Self::ToDo => "to_do",
            Self::Toggle => "toggle",
            Self::Code => "code",
            Self::Quote => "quote",
            Self::Callout => "callout",
            Self::Image => "image",
            Self::Video => "video",
            Self::File => "file",
            Self::Bookmark => "bookmark",
            Self::Equation => "equation",
            Self::Divider => "divider",
            Self::TableOfContents => "table_of_contents",
            Self::Breadcrumb => "breadcrumb",
            Self::ColumnList => "column_list",
            Self::Column => "column",
            Self::LinkPreview => "link_preview",
            Self::SyncedBlock => "synced_block",
            Self::Template => "template",
            Self::LinkToPage => "link_to_page",
            Self::Table => "table",
            Self::TableRow => "table_row",
            Self::Embed => "embed",
            Self::Pdf => "pdf",
            Self::Audio => "audio",
        }
    }

    /// `heading_4`..`heading_6` are accepted from older producers and map to `heading_3`
    pub fn legacy_heading(name: &str) -> Option<Self> {
        matches!(name, "heading_4" | "heading_5" | "heading_6").then_some(Self::Heading3)
    }

    /// Types whose payload carries a `rich_text` array
    pub const fn is_rich_text_bearing(&self) -> bool {
        matches!(
            self,
            Self::Paragraph
                | Self::Heading1
                | Self::Heading2
                | Self::Heading3
                | Self::BulletedListItem
                | Self::NumberedListItem
                | Self::ToDo
                | Self::Toggle
                | Self::Quote
                | Self::Callout
                | Self::Code
        )
    }

    /// Types whose payload is legitimately `{}`
    pub const fn allows_empty_payload(&self) -> bool {
        matches!(
            self,
            Self::Divider | Self::Breadcrumb | Self::TableOfContents
        )
    }

    pub const fn heading_level(&self) -> Option<u8> {
        match self {
            Self::Heading1 => Some(1),
            Self::Heading2 => Some(2),
            Self::Heading3 => Some(3),
            _ => None,
        }
    }
}

impl FromStr for BlockType {
    type Err = UnknownBlockType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownBlockType(s.to_string()))
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown block type: {0}")]
pub struct UnknownBlockType(pub String);

/// Document metadata supplied alongside the blocks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMeta {
    pub title: Option<String>,
    #[serde(alias = "author", deserialize_with = "one_or_many")]
    pub authors: Vec<String>,
    /// ISO-8601 date or timestamp
    pub date: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub tags: Vec<String>,
}

impl DocumentMeta {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.authors.is_empty() && self.date.is_none() && self.tags.is_empty()
    }
}

pub(crate) fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Nothing(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Nothing(()) => Vec::new(),
    })
}

/// Out-of-range heading levels are pulled into 1-3
fn clamped_heading_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(u8::deserialize(deserializer)?.clamp(1, 3))
}

/// The root document node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "DocumentMeta::is_empty")]
    pub meta: DocumentMeta,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            meta: DocumentMeta::default(),
            blocks,
        }
    }

    pub fn with_meta(mut self, meta: DocumentMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Count words in the document
    pub fn word_count(&self) -> usize {
        self.blocks.iter().map(|b| b.word_count()).sum()
    }

    /// Count characters in the document
    pub fn char_count(&self) -> usize {
        self.blocks.iter().map(|b| b.char_count()).sum()
    }

    /// Count blocks at every nesting level
    pub fn block_count(&self) -> usize {
        self.blocks.iter().map(|b| b.block_count()).sum()
    }
}

/// A node of the block tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Stable identity, only meaningful for flat parent-pointer input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
    /// Archived or trashed in the source system
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub archived: bool,
}

/// Block payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    /// Heading with level 1-3
    Heading {
        #[serde(deserialize_with = "clamped_heading_level")]
        level: u8,
        rich_text: Vec<RichTextRun>,
        #[serde(default)]
        color: Color,
    },

    Paragraph {
        rich_text: Vec<RichTextRun>,
        #[serde(default)]
        color: Color,
    },

    BulletedListItem {
        rich_text: Vec<RichTextRun>,
        #[serde(default)]
        color: Color,
    },

    NumberedListItem {
        rich_text: Vec<RichTextRun>,
        #[serde(default)]
        color: Color,
    },

    /// Checkbox item
    ToDo {
        rich_text: Vec<RichTextRun>,
        #[serde(default)]
        checked: bool,
    },

    /// Disclosure: the text is the summary, children are the body
    Toggle {
        rich_text: Vec<RichTextRun>,
    },

    Quote {
        rich_text: Vec<RichTextRun>,
        #[serde(default)]
        color: Color,
    },

    /// Highlighted box with an emoji icon
    Callout {
        rich_text: Vec<RichTextRun>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        #[serde(default)]
        color: Color,
    },

    Code {
        rich_text: Vec<RichTextRun>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },

    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<MediaSource>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        caption: Vec<RichTextRun>,
    },

    Video {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<MediaSource>,
    },

    Divider,

    Table {
        column_count: usize,
        #[serde(default)]
        has_header_row: bool,
        rows: Vec<Vec<Vec<RichTextRun>>>,
    },

    /// Side-by-side layout of weighted columns
    ColumnList {
        columns: Vec<Column>,
    },

    /// Valid schema type with no renderable model
    Unsupported {
        block_type: BlockType,
    },
}

/// One column of a column list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Relative weight; missing or non-positive ratios count as 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_ratio: Option<f64>,
    #[serde(default)]
    pub children: Vec<Block>,
}

/// Where an image or video comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MediaSource {
    External(String),
    File(String),
    /// No real URL, only a hint of what should go there
    Placeholder(String),
}

impl MediaSource {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::External(url) | Self::File(url) => Some(url),
            Self::Placeholder(_) => None,
        }
    }
}

/// The two list flavours grouped by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Bulleted,
    Numbered,
}

impl ListKind {
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Bulleted => "ul",
            Self::Numbered => "ol",
        }
    }
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: None,
            kind,
            children: Vec::new(),
            archived: false,
        }
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn heading(level: u8, rich_text: Vec<RichTextRun>) -> Self {
        Self::new(BlockKind::Heading {
            level: level.clamp(1, 3),
            rich_text,
            color: Color::Default,
        })
    }

    pub fn paragraph(rich_text: Vec<RichTextRun>) -> Self {
        Self::new(BlockKind::Paragraph {
            rich_text,
            color: Color::Default,
        })
    }

    pub fn bulleted(rich_text: Vec<RichTextRun>) -> Self {
        Self::new(BlockKind::BulletedListItem {
            rich_text,
            color: Color::Default,
        })
    }

    pub fn numbered(rich_text: Vec<RichTextRun>) -> Self {
        Self::new(BlockKind::NumberedListItem {
            rich_text,
            color: Color::Default,
        })
    }

    pub fn to_do(rich_text: Vec<RichTextRun>, checked: bool) -> Self {
        Self::new(BlockKind::ToDo { rich_text, checked })
    }

    pub fn quote(rich_text: Vec<RichTextRun>) -> Self {
        Self::new(BlockKind::Quote {
            rich_text,
            color: Color::Default,
        })
    }

    pub fn code(body: impl Into<String>, language: Option<String>) -> Self {
        Self::new(BlockKind::Code {
            rich_text: vec![RichTextRun::plain(body)],
            language,
        })
    }

    pub fn divider() -> Self {
        Self::new(BlockKind::Divider)
    }

    /// Schema type of this block
    pub fn block_type(&self) -> BlockType {
        match &self.kind {
            BlockKind::Heading { level, .. } => match level {
                1 => BlockType::Heading1,
                2 => BlockType::Heading2,
                _ => BlockType::Heading3,
            },
            BlockKind::Paragraph { .. } => BlockType::Paragraph,
            BlockKind::BulletedListItem { .. } => BlockType::BulletedListItem,
            BlockKind::NumberedListItem { .. } => BlockType::NumberedListItem,
            BlockKind::ToDo { .. } => BlockType::ToDo,
            BlockKind::Toggle { .. } => BlockType::Toggle,
            BlockKind::Quote { .. } => BlockType::Quote,
            BlockKind::Callout { .. } => BlockType::Callout,
            BlockKind::Code { .. } => BlockType::Code,
            BlockKind::Image { .. } => BlockType::Image,
            BlockKind::Video { .. } => BlockType::Video,
            BlockKind::Divider => BlockType::Divider,
            BlockKind::Table { .. } => BlockType::Table,
            BlockKind::ColumnList { .. } => BlockType::ColumnList,
            BlockKind::Unsupported { block_type } => *block_type,
        }
    }

    /// Rich text of text-bearing blocks
    pub fn rich_text(&self) -> Option<&[RichTextRun]> {
        match &self.kind {
            BlockKind::Heading { rich_text, .. }
            | BlockKind::Paragraph { rich_text, .. }
            | BlockKind::BulletedListItem { rich_text, .. }
            | BlockKind::NumberedListItem { rich_text, .. }
            | BlockKind::ToDo { rich_text, .. }
            | BlockKind::Toggle { rich_text }
            | BlockKind::Quote { rich_text, .. }
            | BlockKind::Callout { rich_text, .. }
            | BlockKind::Code { rich_text, .. } => Some(rich_text),
            _ => None,
        }
    }

    /// Unformatted text of this block alone (children excluded)
    pub fn plain_text(&self) -> String {
        self.rich_text().map(rich_text::plain_text).unwrap_or_default()
    }

    pub fn list_kind(&self) -> Option<ListKind> {
        match self.kind {
            BlockKind::BulletedListItem { .. } => Some(ListKind::Bulleted),
            BlockKind::NumberedListItem { .. } => Some(ListKind::Numbered),
            _ => None,
        }
    }

    fn nested(&self) -> impl Iterator<Item = &Block> {
        let columns: &[Column] = match &self.kind {
            BlockKind::ColumnList { columns } => columns,
            _ => &[],
        };
        self.children
            .iter()
            .chain(columns.iter().flat_map(|c| c.children.iter()))
    }

    /// Count words in this block and its descendants
    pub fn word_count(&self) -> usize {
        let own = match &self.kind {
            BlockKind::Table { rows, .. } => rows
                .iter()
                .flatten()
                .map(|cell| rich_text::plain_text(cell).unicode_words().count())
                .sum(),
            BlockKind::Image { caption, .. } => {
                rich_text::plain_text(caption).unicode_words().count()
            }
            _ => self.plain_text().unicode_words().count(),
        };
        own + self.nested().map(|b| b.word_count()).sum::<usize>()
    }

    /// Count characters in this block and its descendants
    pub fn char_count(&self) -> usize {
        self.plain_text().chars().count() + self.nested().map(|b| b.char_count()).sum::<usize>()
    }

    /// This block plus all descendants
    pub fn block_count(&self) -> usize {
        1 + self.nested().map(|b| b.block_count()).sum::<usize>()
    }
}
