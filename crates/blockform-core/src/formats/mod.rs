// SPDX-License-Identifier: AGPL-3.0-or-later
//! Text parsing and HTML rendering for block trees

pub mod html;
pub mod layout;
pub mod markdown;

pub use html::{column_widths, render_document, render_fragment, render_value, HtmlHandler, RenderOutput};
pub use layout::{render_collection, slugify, CollectionEntry};
pub use markdown::{parse_blocks, parse_inline, MarkdownHandler};
