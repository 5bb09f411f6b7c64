//! Rich-text spans.

use serde_json::{json, Value};

/// A run of text with independent style flags and an optional link target.
///
/// Concatenating a block's spans yields the visible text of that block.
/// Styling never overlaps within a span; spans are order-preserving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichTextSpan {
    /// The visible text of this run.
    pub text: String,
    /// Bold flag.
    pub bold: bool,
    /// Italic flag.
    pub italic: bool,
    /// Strikethrough flag.
    pub strikethrough: bool,
    /// Inline-code flag.
    pub code: bool,
    /// Optional hyperlink target.
    pub href: Option<String>,
}

impl RichTextSpan {
    /// Creates an unstyled span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Renders this span as Markdown.
    ///
    /// Style markers nest in a fixed order regardless of combination:
    /// backticks first, then bold, then italic, then strikethrough, and a
    /// link wrapper last when a target is present.
    pub fn to_markdown(&self) -> String {
        let mut s = self.text.clone();
        if self.code {
            s = format!("`{s}`");
        }
        if self.bold {
            s = format!("**{s}**");
        }
        if self.italic {
            s = format!("_{s}_");
        }
        if self.strikethrough {
            s = format!("~~{s}~~");
        }
        if let Some(href) = &self.href {
            s = format!("[{s}]({href})");
        }
        s
    }

    /// Parses a span from a remote rich-text object.
    ///
    /// Missing or malformed fields degrade to their defaults; this never
    /// fails.
    pub fn from_value(value: &Value) -> Self {
        let annotations = value.get("annotations");
        let flag = |name: &str| {
            annotations
                .and_then(|a| a.get(name))
                .and_then(Value::as_bool)
                .unwrap_or(false)
        };
        Self {
            text: value
                .get("plain_text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            bold: flag("bold"),
            italic: flag("italic"),
            strikethrough: flag("strikethrough"),
            code: flag("code"),
            href: value
                .get("href")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// Serializes this span into the remote rich-text shape.
    pub fn to_value(&self) -> Value {
        let mut text = json!({ "content": self.text });
        if let Some(href) = &self.href {
            text["link"] = json!({ "url": href });
        }
        let mut out = json!({ "type": "text", "text": text });
        if self.bold || self.italic || self.strikethrough || self.code {
            out["annotations"] = json!({
                "bold": self.bold,
                "italic": self.italic,
                "strikethrough": self.strikethrough,
                "code": self.code,
            });
        }
        out
    }
}

/// Renders a span sequence as Markdown by concatenation.
pub(crate) fn spans_to_markdown(spans: &[RichTextSpan]) -> String {
    spans.iter().map(RichTextSpan::to_markdown).collect()
}

/// Concatenates the raw text of a span sequence, ignoring styling.
pub(crate) fn spans_plain_text(spans: &[RichTextSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}
