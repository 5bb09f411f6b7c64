//! Block tree data model.

use crate::richtext::RichTextSpan;
use serde_json::Value;

/// One unit of remote content.
///
/// Blocks form an ordered forest under a page. A page exclusively owns its
/// top-level block sequence; a block exclusively owns its children once
/// they have been fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    /// Remote block id. Empty for locally-authored blocks that have not
    /// been written to the remote yet.
    pub id: String,
    /// Whether the remote reports children that must be fetched separately.
    pub has_children: bool,
    /// The type-specific payload.
    pub kind: BlockKind,
    /// Fetched children, in remote order.
    pub children: Vec<Block>,
}

impl Block {
    /// Creates a local block with no id and no children.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

/// Type-specific block payload.
///
/// One case per supported remote block type, plus an opaque fallback that
/// carries the raw tag and payload of anything unrecognized so converters
/// can stay total as the remote schema grows.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// Paragraph.
    Paragraph {
        /// Text spans.
        rich_text: Vec<RichTextSpan>,
    },
    /// Level-1 heading.
    Heading1 {
        /// Text spans.
        rich_text: Vec<RichTextSpan>,
    },
    /// Level-2 heading.
    Heading2 {
        /// Text spans.
        rich_text: Vec<RichTextSpan>,
    },
    /// Level-3 heading.
    Heading3 {
        /// Text spans.
        rich_text: Vec<RichTextSpan>,
    },
    /// Bulleted list item.
    BulletedListItem {
        /// Text spans.
        rich_text: Vec<RichTextSpan>,
    },
    /// Numbered list item.
    NumberedListItem {
        /// Text spans.
        rich_text: Vec<RichTextSpan>,
    },
    /// Checklist item.
    ToDo {
        /// Text spans.
        rich_text: Vec<RichTextSpan>,
        /// Checkbox state.
        checked: bool,
    },
    /// Block quote.
    Quote {
        /// Text spans.
        rich_text: Vec<RichTextSpan>,
    },
    /// Fenced code block.
    Code {
        /// Text spans; the literal body is their concatenated raw text.
        rich_text: Vec<RichTextSpan>,
        /// Language tag.
        language: String,
    },
    /// Horizontal divider.
    Divider,
    /// Collapsible toggle.
    Toggle {
        /// Summary text spans.
        rich_text: Vec<RichTextSpan>,
    },
    /// Callout.
    Callout {
        /// Text spans.
        rich_text: Vec<RichTextSpan>,
    },
    /// Image reference.
    Image {
        /// First available external or hosted URL, empty when absent.
        url: String,
    },
    /// Video reference.
    Video {
        /// First available external or hosted URL, empty when absent.
        url: String,
    },
    /// Audio reference.
    Audio {
        /// First available external or hosted URL, empty when absent.
        url: String,
    },
    /// Generic file reference.
    File {
        /// First available external or hosted URL, empty when absent.
        url: String,
    },
    /// PDF reference.
    Pdf {
        /// First available external or hosted URL, empty when absent.
        url: String,
    },
    /// Bookmark.
    Bookmark {
        /// Bookmarked URL.
        url: String,
    },
    /// Embedded content.
    Embed {
        /// Embedded URL.
        url: String,
    },
    /// Display equation.
    Equation {
        /// Raw expression.
        expression: String,
    },
    /// Table of contents marker.
    TableOfContents,
    /// Breadcrumb marker. Has no Markdown equivalent.
    Breadcrumb,
    /// Synced block; renders as its children.
    SyncedBlock,
    /// Column layout container; children are columns.
    ColumnList,
    /// A single column inside a column list.
    Column,
    /// Table container; children are table rows.
    Table {
        /// Whether the first row is a header row.
        has_column_header: bool,
        /// Whether the first column is a header column.
        has_row_header: bool,
    },
    /// One table row.
    TableRow {
        /// Cells, each a span sequence.
        cells: Vec<Vec<RichTextSpan>>,
    },
    /// Anything this version does not understand, kept opaque.
    Unsupported {
        /// The remote type tag.
        type_tag: String,
        /// The raw type-specific payload.
        payload: Value,
    },
}

impl Default for BlockKind {
    fn default() -> Self {
        BlockKind::Paragraph {
            rich_text: Vec::new(),
        }
    }
}

impl BlockKind {
    /// Returns the remote type tag for this kind.
    pub fn type_tag(&self) -> &str {
        match self {
            BlockKind::Paragraph { .. } => "paragraph",
            BlockKind::Heading1 { .. } => "heading_1",
            BlockKind::Heading2 { .. } => "heading_2",
            BlockKind::Heading3 { .. } => "heading_3",
            BlockKind::BulletedListItem { .. } => "bulleted_list_item",
            BlockKind::NumberedListItem { .. } => "numbered_list_item",
            BlockKind::ToDo { .. } => "to_do",
            BlockKind::Quote { .. } => "quote",
            BlockKind::Code { .. } => "code",
            BlockKind::Divider => "divider",
            BlockKind::Toggle { .. } => "toggle",
            BlockKind::Callout { .. } => "callout",
            BlockKind::Image { .. } => "image",
            BlockKind::Video { .. } => "video",
            BlockKind::Audio { .. } => "audio",
            BlockKind::File { .. } => "file",
            BlockKind::Pdf { .. } => "pdf",
            BlockKind::Bookmark { .. } => "bookmark",
            BlockKind::Embed { .. } => "embed",
            BlockKind::Equation { .. } => "equation",
            BlockKind::TableOfContents => "table_of_contents",
            BlockKind::Breadcrumb => "breadcrumb",
            BlockKind::SyncedBlock => "synced_block",
            BlockKind::ColumnList => "column_list",
            BlockKind::Column => "column",
            BlockKind::Table { .. } => "table",
            BlockKind::TableRow { .. } => "table_row",
            BlockKind::Unsupported { type_tag, .. } => type_tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags_match_remote_vocabulary() {
        assert_eq!(BlockKind::Divider.type_tag(), "divider");
        assert_eq!(
            BlockKind::ToDo {
                rich_text: vec![],
                checked: true
            }
            .type_tag(),
            "to_do"
        );
        assert_eq!(
            BlockKind::Unsupported {
                type_tag: "whiteboard".into(),
                payload: Value::Null
            }
            .type_tag(),
            "whiteboard"
        );
    }
}
