// SPDX-License-Identifier: AGPL-3.0-or-later
//! Rich-text runs: styled spans of inline text shared by every text-bearing block

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text and background colours accepted by the block schema
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[default]
    Default,
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
    GrayBackground,
    BrownBackground,
    OrangeBackground,
    YellowBackground,
    GreenBackground,
    BlueBackground,
    PurpleBackground,
    PinkBackground,
    RedBackground,
}

impl Color {
    /// Every colour in schema order
    pub const ALL: [Self; 19] = [
        Self::Default,
        Self::Gray,
        Self::Brown,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Blue,
        Self::Purple,
        Self::Pink,
        Self::Red,
        Self::GrayBackground,
        Self::BrownBackground,
        Self::OrangeBackground,
        Self::YellowBackground,
        Self::GreenBackground,
        Self::BlueBackground,
        Self::PurpleBackground,
        Self::PinkBackground,
        Self::RedBackground,
    ];

    /// Wire name of the colour
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Gray => "gray",
            Self::Brown => "brown",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Red => "red",
            Self::GrayBackground => "gray_background",
            Self::BrownBackground => "brown_background",
            Self::OrangeBackground => "orange_background",
            Self::YellowBackground => "yellow_background",
            Self::GreenBackground => "green_background",
            Self::BlueBackground => "blue_background",
            Self::PurpleBackground => "purple_background",
            Self::PinkBackground => "pink_background",
            Self::RedBackground => "red_background",
        }
    }

    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// Inline CSS used when colour styling is enabled
    pub const fn css(&self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Gray => Some("color: gray"),
            Self::Brown => Some("color: #8B4513"),
            Self::Orange => Some("color: #FF8C00"),
            Self::Yellow => Some("color: #DAA520"),
            Self::Green => Some("color: #228B22"),
            Self::Blue => Some("color: #0000CD"),
            Self::Purple => Some("color: #800080"),
            Self::Pink => Some("color: #FF69B4"),
            Self::Red => Some("color: #DC143C"),
            Self::GrayBackground => Some("background-color: #f1f1f1"),
            Self::BrownBackground => Some("background-color: #f4f1e8"),
            Self::OrangeBackground => Some("background-color: #fff4e6"),
            Self::YellowBackground => Some("background-color: #fffbf0"),
            Self::GreenBackground => Some("background-color: #f0f9f0"),
            Self::BlueBackground => Some("background-color: #f0f8ff"),
            Self::PurpleBackground => Some("background-color: #f8f0ff"),
            Self::PinkBackground => Some("background-color: #fff0f8"),
            Self::RedBackground => Some("background-color: #fff0f0"),
        }
    }
}

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color: {0}")]
pub struct UnknownColor(pub String);

/// Inline formatting flags of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub color: Color,
}

impl Annotations {
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// A span of literal text plus its formatting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextRun {
    pub content: String,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl RichTextRun {
    /// Unformatted run
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            annotations: Annotations::default(),
            link: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.annotations.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.annotations.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.annotations.underline = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.annotations.strikethrough = true;
        self
    }

    pub fn code(mut self) -> Self {
        self.annotations.code = true;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.annotations.color = color;
        self
    }

    pub fn link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }
}

/// Concatenate the literal content of every run, ignoring formatting
pub fn plain_text(runs: &[RichTextRun]) -> String {
    runs.iter().map(|r| r.content.as_str()).collect()
}

/// Render runs to HTML.
///
/// Wrapping is fixed: `<strong>` outermost, then `<em>`, `<code>`, `<u>`, `<s>`,
/// and the anchor around all of it. Runs with empty content produce nothing.
pub fn render_html(runs: &[RichTextRun]) -> String {
    render_html_styled(runs, false)
}

/// Same as [`render_html`], optionally emitting a colour `<span>` inside the anchor
pub fn render_html_styled(runs: &[RichTextRun], color_styles: bool) -> String {
    let mut out = String::new();
    for run in runs {
        render_run(&mut out, run, color_styles);
    }
    out
}

fn render_run(out: &mut String, run: &RichTextRun, color_styles: bool) {
    if run.content.is_empty() {
        return;
    }

    let a = &run.annotations;
    let mut text = escape_html(&run.content);

    if a.strikethrough {
        text = format!("<s>{text}</s>");
    }
    if a.underline {
        text = format!("<u>{text}</u>");
    }
    if a.code {
        text = format!("<code>{text}</code>");
    }
    if a.italic {
        text = format!("<em>{text}</em>");
    }
    if a.bold {
        text = format!("<strong>{text}</strong>");
    }
    if color_styles {
        if let Some(style) = a.color.css() {
            text = format!("<span style=\"{style}\">{text}</span>");
        }
    }
    if let Some(url) = &run.link {
        text = format!("<a href=\"{}\">{text}</a>", escape_html(url));
    }

    out.push_str(&text);
}

/// Escape text for use in HTML element content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
