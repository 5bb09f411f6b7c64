//! Wire (de)serialization for blocks.
//!
//! The remote encodes a block as `{"object":"block","type":T,T:{...}}`:
//! the tag value doubles as the payload key, which serde's enum tagging
//! cannot express, so the mapping is written out against
//! [`serde_json::Value`].

use crate::block::{Block, BlockKind};
use crate::richtext::RichTextSpan;
use serde_json::{json, Map, Value};

impl Block {
    /// Parses a block from its remote JSON form.
    ///
    /// Total: anything unrecognized, including a missing type tag, becomes
    /// [`BlockKind::Unsupported`].
    pub fn from_value(value: &Value) -> Self {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let has_children = value
            .get("has_children")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let type_tag = value.get("type").and_then(Value::as_str).unwrap_or("");
        let payload = value.get(type_tag).cloned().unwrap_or(Value::Null);
        let kind = kind_from_payload(type_tag, &payload);
        Self {
            id,
            has_children,
            kind,
            children: Vec::new(),
        }
    }

    /// Serializes a block into its remote JSON form.
    ///
    /// Locally-fetched children, when present, are embedded under the
    /// payload's `children` key (the shape the append endpoint accepts).
    pub fn to_value(&self) -> Value {
        let tag = self.kind.type_tag().to_string();
        let mut payload = payload_to_value(&self.kind);
        if !self.children.is_empty() {
            let children: Vec<Value> = self.children.iter().map(Block::to_value).collect();
            if let Value::Object(map) = &mut payload {
                map.insert("children".into(), Value::Array(children));
            }
        }
        let mut out = Map::new();
        out.insert("object".into(), json!("block"));
        out.insert("type".into(), Value::String(tag.clone()));
        out.insert(tag, payload);
        Value::Object(out)
    }
}

fn spans_from_payload(payload: &Value) -> Vec<RichTextSpan> {
    payload
        .get("rich_text")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().map(RichTextSpan::from_value).collect())
        .unwrap_or_default()
}

fn spans_to_values(spans: &[RichTextSpan]) -> Value {
    Value::Array(spans.iter().map(RichTextSpan::to_value).collect())
}

/// First available external or hosted URL of a media payload.
fn media_url(payload: &Value) -> String {
    for source in ["external", "file"] {
        if let Some(url) = payload
            .get(source)
            .and_then(|s| s.get("url"))
            .and_then(Value::as_str)
        {
            return url.to_string();
        }
    }
    String::new()
}

fn kind_from_payload(type_tag: &str, payload: &Value) -> BlockKind {
    match type_tag {
        "paragraph" => BlockKind::Paragraph {
            rich_text: spans_from_payload(payload),
        },
        "heading_1" => BlockKind::Heading1 {
            rich_text: spans_from_payload(payload),
        },
        "heading_2" => BlockKind::Heading2 {
            rich_text: spans_from_payload(payload),
        },
        "heading_3" => BlockKind::Heading3 {
            rich_text: spans_from_payload(payload),
        },
        "bulleted_list_item" => BlockKind::BulletedListItem {
            rich_text: spans_from_payload(payload),
        },
        "numbered_list_item" => BlockKind::NumberedListItem {
            rich_text: spans_from_payload(payload),
        },
        "to_do" => BlockKind::ToDo {
            rich_text: spans_from_payload(payload),
            checked: payload
                .get("checked")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        },
        "quote" => BlockKind::Quote {
            rich_text: spans_from_payload(payload),
        },
        "code" => BlockKind::Code {
            rich_text: spans_from_payload(payload),
            language: payload
                .get("language")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        "divider" => BlockKind::Divider,
        "toggle" => BlockKind::Toggle {
            rich_text: spans_from_payload(payload),
        },
        "callout" => BlockKind::Callout {
            rich_text: spans_from_payload(payload),
        },
        "image" => BlockKind::Image {
            url: media_url(payload),
        },
        "video" => BlockKind::Video {
            url: media_url(payload),
        },
        "audio" => BlockKind::Audio {
            url: media_url(payload),
        },
        "file" => BlockKind::File {
            url: media_url(payload),
        },
        "pdf" => BlockKind::Pdf {
            url: media_url(payload),
        },
        "bookmark" => BlockKind::Bookmark {
            url: payload
                .get("url")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        "embed" => BlockKind::Embed {
            url: payload
                .get("url")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        "equation" => BlockKind::Equation {
            expression: payload
                .get("expression")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        "table_of_contents" => BlockKind::TableOfContents,
        "breadcrumb" => BlockKind::Breadcrumb,
        "synced_block" => BlockKind::SyncedBlock,
        "column_list" => BlockKind::ColumnList,
        "column" => BlockKind::Column,
        "table" => BlockKind::Table {
            has_column_header: payload
                .get("has_column_header")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            has_row_header: payload
                .get("has_row_header")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        },
        "table_row" => BlockKind::TableRow {
            cells: payload
                .get("cells")
                .and_then(Value::as_array)
                .map(|rows| {
                    rows.iter()
                        .map(|cell| {
                            cell.as_array()
                                .map(|arr| arr.iter().map(RichTextSpan::from_value).collect())
                                .unwrap_or_default()
                        })
                        .collect()
                })
                .unwrap_or_default(),
        },
        tag => BlockKind::Unsupported {
            type_tag: if tag.is_empty() { "unknown".into() } else { tag.into() },
            payload: payload.clone(),
        },
    }
}

fn payload_to_value(kind: &BlockKind) -> Value {
    match kind {
        BlockKind::Paragraph { rich_text }
        | BlockKind::Heading1 { rich_text }
        | BlockKind::Heading2 { rich_text }
        | BlockKind::Heading3 { rich_text }
        | BlockKind::BulletedListItem { rich_text }
        | BlockKind::NumberedListItem { rich_text }
        | BlockKind::Quote { rich_text }
        | BlockKind::Toggle { rich_text }
        | BlockKind::Callout { rich_text } => json!({ "rich_text": spans_to_values(rich_text) }),
        BlockKind::ToDo { rich_text, checked } => json!({
            "rich_text": spans_to_values(rich_text),
            "checked": checked,
        }),
        BlockKind::Code { rich_text, language } => json!({
            "rich_text": spans_to_values(rich_text),
            "language": if language.is_empty() { "plain text" } else { language.as_str() },
        }),
        BlockKind::Divider
        | BlockKind::TableOfContents
        | BlockKind::Breadcrumb
        | BlockKind::SyncedBlock
        | BlockKind::ColumnList
        | BlockKind::Column => json!({}),
        BlockKind::Image { url }
        | BlockKind::Video { url }
        | BlockKind::Audio { url }
        | BlockKind::File { url }
        | BlockKind::Pdf { url } => json!({
            "type": "external",
            "external": { "url": url },
        }),
        BlockKind::Bookmark { url } | BlockKind::Embed { url } => json!({ "url": url }),
        BlockKind::Equation { expression } => json!({ "expression": expression }),
        BlockKind::Table {
            has_column_header,
            has_row_header,
        } => json!({
            "has_column_header": has_column_header,
            "has_row_header": has_row_header,
        }),
        BlockKind::TableRow { cells } => {
            let cells: Vec<Value> = cells.iter().map(|c| spans_to_values(c)).collect();
            json!({ "cells": cells })
        }
        BlockKind::Unsupported { payload, .. } => payload.clone(),
    }
}
