// SPDX-License-Identifier: AGPL-3.0-or-later
//! Parser and Renderer traits, their configuration, and the crate error type

use crate::ast::{Document, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Error type for the I/O and decoding edges around parsing and rendering.
///
/// The parser, validator and renderer themselves never fail; these variants
/// only come from reading input, writing output, or decoding JSON text.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// Configuration for parsing
#[derive(Debug, Clone, Default)]
pub struct ParseConfig {
    /// Front matter delimiter (e.g. `---`); `None` disables front matter so a
    /// leading `---` stays a divider
    pub front_matter_delimiter: Option<String>,
}

impl ParseConfig {
    pub fn with_front_matter(delimiter: impl Into<String>) -> Self {
        Self {
            front_matter_delimiter: Some(delimiter.into()),
        }
    }
}

/// Output shape produced by the HTML renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Bare HTML fragment
    #[default]
    Fragment,
    /// Full HTML page with a heading navigation sidebar
    Document,
    /// `<article>` with a metadata header
    Article,
}

/// Link rendered above an article header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackLink {
    pub label: String,
    pub href: String,
}

/// Configuration for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub layout: Layout,
    /// Emit inline colour styles for coloured rich-text runs
    pub color_styles: bool,
    /// Nesting depth beyond which children are dropped
    pub max_depth: usize,
    pub back_link: Option<BackLink>,
    /// Href prefix for collection entries
    pub collection_base_path: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Fragment,
            color_styles: false,
            max_depth: DEFAULT_MAX_DEPTH,
            back_link: None,
            collection_base_path: "/blog-post/".to_string(),
        }
    }
}

impl RenderConfig {
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}

/// Parser trait: convert source text to a block tree
pub trait Parser: Send + Sync {
    /// Parse a string into a Document
    fn parse(&self, input: &str, config: &ParseConfig) -> Result<Document>;
}

/// Renderer trait: convert a block tree to output text
pub trait Renderer: Send + Sync {
    /// Render a Document to a string
    fn render(&self, doc: &Document, config: &RenderConfig) -> Result<String>;
}

/// Extension trait for streaming operations (not dyn-compatible)
pub trait ParserExt: Parser {
    /// Parse from a reader
    fn parse_reader<R: Read>(&self, reader: R, config: &ParseConfig) -> Result<Document> {
        let mut input = String::new();
        let mut reader = reader;
        reader.read_to_string(&mut input)?;
        self.parse(&input, config)
    }
}

/// Extension trait for streaming operations (not dyn-compatible)
pub trait RendererExt: Renderer {
    /// Render to a writer
    fn render_writer<W: Write>(
        &self,
        doc: &Document,
        writer: &mut W,
        config: &RenderConfig,
    ) -> Result<()> {
        let output = self.render(doc, config)?;
        writer.write_all(output.as_bytes())?;
        Ok(())
    }
}

// Blanket implementations
impl<T: Parser> ParserExt for T {}
impl<T: Renderer> RendererExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_config_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.layout, Layout::Fragment);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.collection_base_path, "/blog-post/");
    }

    #[test]
    fn test_render_config_partial_deserialize() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"layout":"article","color_styles":true}"#).unwrap();
        assert_eq!(config.layout, Layout::Article);
        assert!(config.color_styles);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }
}
