// SPDX-License-Identifier: AGPL-3.0-or-later
//! Blockform Core - block-tree documents from text to HTML
//!
//! This crate provides:
//! - A rich-text run model and a typed block tree shared by every stage
//! - A JSON wire format for blocks, including flat parent-pointer lists
//! - A markdown-ish text parser producing blocks
//! - A schema validator that repairs what it can and reports the rest
//! - An HTML renderer with fragment, document, article and collection layouts

pub mod ast;
pub mod formats;
pub mod rich_text;
pub mod traits;
pub mod validate;
pub mod wire;

pub use ast::{Block, BlockKind, BlockType, Column, Document, DocumentMeta, ListKind, MediaSource};
pub use formats::{HtmlHandler, MarkdownHandler, RenderOutput};
pub use rich_text::{Annotations, Color, RichTextRun};
pub use traits::{ConversionError, Layout, ParseConfig, Parser, RenderConfig, Renderer, Result};
pub use validate::{validate, ValidationReport, Validator};
