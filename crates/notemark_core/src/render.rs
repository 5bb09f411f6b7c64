//! Blocks-to-Markdown renderer.

use crate::block::{Block, BlockKind};
use crate::richtext::{spans_plain_text, spans_to_markdown};

/// Renders an ordered block forest as Markdown.
///
/// Total and deterministic: unrecognized kinds render as an HTML comment
/// placeholder naming the type, fidelity loss is allowed, failure is not.
/// Empty fragments are dropped, so the output never contains blank lines.
pub fn blocks_to_markdown(blocks: &[Block]) -> String {
    render_blocks(blocks, 0)
}

fn render_blocks(blocks: &[Block], indent: usize) -> String {
    let mut fragments: Vec<String> = Vec::new();
    for block in blocks {
        let pref = " ".repeat(indent);
        match &block.kind {
            BlockKind::Paragraph { rich_text } => {
                fragments.push(format!("{pref}{}", spans_to_markdown(rich_text)));
            }
            BlockKind::Heading1 { rich_text } => {
                fragments.push(format!("# {}", spans_to_markdown(rich_text)));
            }
            BlockKind::Heading2 { rich_text } => {
                fragments.push(format!("## {}", spans_to_markdown(rich_text)));
            }
            BlockKind::Heading3 { rich_text } => {
                fragments.push(format!("### {}", spans_to_markdown(rich_text)));
            }
            BlockKind::BulletedListItem { rich_text } => {
                fragments.push(format!("{pref}- {}", spans_to_markdown(rich_text)));
                fragments.push(render_blocks(&block.children, indent + 2));
            }
            BlockKind::NumberedListItem { rich_text } => {
                fragments.push(format!("{pref}1. {}", spans_to_markdown(rich_text)));
                fragments.push(render_blocks(&block.children, indent + 2));
            }
            BlockKind::ToDo { rich_text, checked } => {
                let mark = if *checked { 'x' } else { ' ' };
                fragments.push(format!("{pref}- [{mark}] {}", spans_to_markdown(rich_text)));
                fragments.push(render_blocks(&block.children, indent + 2));
            }
            BlockKind::Quote { rich_text } => {
                fragments.push(format!("{pref}> {}", spans_to_markdown(rich_text)));
            }
            BlockKind::Code { rich_text, language } => {
                fragments.push(format!("```{language}"));
                fragments.push(spans_plain_text(rich_text));
                fragments.push("```".into());
            }
            BlockKind::Divider => fragments.push("---".into()),
            BlockKind::Toggle { rich_text } => {
                fragments.push(format!(
                    "{pref}<details><summary>{}</summary>",
                    spans_to_markdown(rich_text)
                ));
                fragments.push(render_blocks(&block.children, indent + 2));
                fragments.push(format!("{pref}</details>"));
            }
            BlockKind::Callout { rich_text } => {
                fragments.push(format!("{pref}> {}", spans_to_markdown(rich_text)));
                fragments.push(render_blocks(&block.children, indent + 2));
            }
            BlockKind::Image { url } => fragments.push(format!("{pref}![image]({url})")),
            BlockKind::Video { url } => fragments.push(format!("{pref}[video]({url})")),
            BlockKind::Audio { url } => fragments.push(format!("{pref}[audio]({url})")),
            BlockKind::File { url } => fragments.push(format!("{pref}[file]({url})")),
            BlockKind::Pdf { url } => fragments.push(format!("{pref}[pdf]({url})")),
            BlockKind::Bookmark { url } => fragments.push(format!("{pref}[{url}]({url})")),
            BlockKind::Embed { url } => fragments.push(format!("{pref}[embed]({url})")),
            BlockKind::Equation { expression } => fragments.push(format!("$${expression}$$")),
            BlockKind::TableOfContents => fragments.push("[TOC]".into()),
            // No Markdown equivalent.
            BlockKind::Breadcrumb => {}
            BlockKind::SyncedBlock => {
                fragments.push(render_blocks(&block.children, indent));
            }
            BlockKind::ColumnList => {
                // Side-by-side layout is discarded: each column's children
                // render sequentially, separated by a blank line.
                let columns: Vec<String> = block
                    .children
                    .iter()
                    .map(|col| render_blocks(&col.children, indent))
                    .filter(|s| !s.is_empty())
                    .collect();
                fragments.push(columns.join("\n\n"));
            }
            BlockKind::Table { .. } => fragments.push(table_to_markdown(block)),
            kind => {
                fragments.push(format!(
                    "{pref}<!-- unsupported block: {} -->",
                    kind.type_tag()
                ));
            }
        }
    }
    fragments.retain(|f| !f.is_empty());
    fragments.join("\n")
}

fn table_to_markdown(table: &Block) -> String {
    let (has_column_header, has_row_header) = match table.kind {
        BlockKind::Table {
            has_column_header,
            has_row_header,
        } => (has_column_header, has_row_header),
        _ => (false, false),
    };

    let mut matrix: Vec<Vec<String>> = table
        .children
        .iter()
        .filter_map(|row| match &row.kind {
            BlockKind::TableRow { cells } => {
                Some(cells.iter().map(|c| spans_to_markdown(c)).collect())
            }
            _ => None,
        })
        .collect();
    if matrix.is_empty() {
        return String::new();
    }

    let col_count = matrix.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut matrix {
        row.resize(col_count, String::new());
    }

    let (header, data) = if has_column_header {
        let header = matrix.remove(0);
        (header, matrix)
    } else {
        let header = (1..=col_count).map(|i| format!("Col {i}")).collect();
        (header, matrix)
    };

    let mut lines = Vec::new();
    lines.push(format!("| {} |", header.join(" | ")));
    lines.push(format!("|{}|", vec![" --- "; header.len()].join("|")));
    for row in data {
        let cells: Vec<String> = row
            .into_iter()
            .enumerate()
            .map(|(i, cell)| {
                if has_row_header && i == 0 {
                    format!("**{cell}**")
                } else {
                    cell
                }
            })
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::RichTextSpan;
    use serde_json::Value;

    fn text_block(kind: fn(Vec<RichTextSpan>) -> BlockKind, text: &str) -> Block {
        Block::new(kind(vec![RichTextSpan::plain(text)]))
    }

    fn paragraph(text: &str) -> Block {
        text_block(|rich_text| BlockKind::Paragraph { rich_text }, text)
    }

    #[test]
    fn empty_input_renders_empty_string() {
        assert_eq!(blocks_to_markdown(&[]), "");
    }

    #[test]
    fn heading_levels() {
        let blocks = vec![
            text_block(|rich_text| BlockKind::Heading1 { rich_text }, "One"),
            text_block(|rich_text| BlockKind::Heading2 { rich_text }, "Two"),
            text_block(|rich_text| BlockKind::Heading3 { rich_text }, "Three"),
        ];
        assert_eq!(blocks_to_markdown(&blocks), "# One\n## Two\n### Three");
    }

    #[test]
    fn nested_list_indents_by_two() {
        let mut item = text_block(|rich_text| BlockKind::BulletedListItem { rich_text }, "outer");
        item.children = vec![text_block(
            |rich_text| BlockKind::BulletedListItem { rich_text },
            "inner",
        )];
        assert_eq!(blocks_to_markdown(&[item]), "- outer\n  - inner");
    }

    #[test]
    fn todo_checkbox_state() {
        let blocks = vec![
            Block::new(BlockKind::ToDo {
                rich_text: vec![RichTextSpan::plain("a")],
                checked: false,
            }),
            Block::new(BlockKind::ToDo {
                rich_text: vec![RichTextSpan::plain("b")],
                checked: true,
            }),
        ];
        assert_eq!(blocks_to_markdown(&blocks), "- [ ] a\n- [x] b");
    }

    #[test]
    fn code_block_preserves_language_and_body() {
        let block = Block::new(BlockKind::Code {
            rich_text: vec![RichTextSpan::plain("let x = 1;")],
            language: "rust".into(),
        });
        assert_eq!(blocks_to_markdown(&[block]), "```rust\nlet x = 1;\n```");
    }

    #[test]
    fn toggle_wraps_children_in_details() {
        let mut toggle = text_block(|rich_text| BlockKind::Toggle { rich_text }, "More");
        toggle.children = vec![paragraph("hidden")];
        assert_eq!(
            blocks_to_markdown(&[toggle]),
            "<details><summary>More</summary>\n  hidden\n</details>"
        );
    }

    #[test]
    fn callout_renders_quote_then_children() {
        let mut callout = text_block(|rich_text| BlockKind::Callout { rich_text }, "Note");
        callout.children = vec![paragraph("detail")];
        assert_eq!(blocks_to_markdown(&[callout]), "> Note\n  detail");
    }

    #[test]
    fn media_placeholders() {
        let blocks = vec![
            Block::new(BlockKind::Image { url: "u1".into() }),
            Block::new(BlockKind::Bookmark { url: "u2".into() }),
            Block::new(BlockKind::Embed { url: "u3".into() }),
            Block::new(BlockKind::Pdf { url: "u4".into() }),
        ];
        assert_eq!(
            blocks_to_markdown(&blocks),
            "![image](u1)\n[u2](u2)\n[embed](u3)\n[pdf](u4)"
        );
    }

    #[test]
    fn unsupported_renders_placeholder_comment() {
        let block = Block::new(BlockKind::Unsupported {
            type_tag: "whiteboard".into(),
            payload: Value::Null,
        });
        assert_eq!(
            blocks_to_markdown(&[block]),
            "<!-- unsupported block: whiteboard -->"
        );
    }

    #[test]
    fn breadcrumb_renders_nothing() {
        assert_eq!(blocks_to_markdown(&[Block::new(BlockKind::Breadcrumb)]), "");
    }

    #[test]
    fn column_list_flattens_columns_with_blank_line() {
        let mut left = Block::new(BlockKind::Column);
        left.children = vec![paragraph("left")];
        let mut right = Block::new(BlockKind::Column);
        right.children = vec![paragraph("right")];
        let mut list = Block::new(BlockKind::ColumnList);
        list.children = vec![left, right];
        assert_eq!(blocks_to_markdown(&[list]), "left\n\nright");
    }

    fn table_row(cells: &[&str]) -> Block {
        Block::new(BlockKind::TableRow {
            cells: cells.iter().map(|c| vec![RichTextSpan::plain(*c)]).collect(),
        })
    }

    #[test]
    fn table_with_column_header() {
        let mut table = Block::new(BlockKind::Table {
            has_column_header: true,
            has_row_header: false,
        });
        table.children = vec![table_row(&["A", "B"]), table_row(&["1", "2"])];
        assert_eq!(
            blocks_to_markdown(&[table]),
            "| A | B |\n| --- | --- |\n| 1 | 2 |"
        );
    }

    #[test]
    fn table_without_header_synthesizes_labels() {
        let mut table = Block::new(BlockKind::Table {
            has_column_header: false,
            has_row_header: false,
        });
        table.children = vec![table_row(&["1", "2"])];
        assert_eq!(
            blocks_to_markdown(&[table]),
            "| Col 1 | Col 2 |\n| --- | --- |\n| 1 | 2 |"
        );
    }

    #[test]
    fn table_row_header_bolds_first_column() {
        let mut table = Block::new(BlockKind::Table {
            has_column_header: true,
            has_row_header: true,
        });
        table.children = vec![table_row(&["H1", "H2"]), table_row(&["k", "v"])];
        assert_eq!(
            blocks_to_markdown(&[table]),
            "| H1 | H2 |\n| --- | --- |\n| **k** | v |"
        );
    }

    #[test]
    fn ragged_table_rows_are_padded() {
        let mut table = Block::new(BlockKind::Table {
            has_column_header: false,
            has_row_header: false,
        });
        table.children = vec![table_row(&["a"]), table_row(&["b", "c"])];
        assert_eq!(
            blocks_to_markdown(&[table]),
            "| Col 1 | Col 2 |\n| --- | --- |\n| a |  |\n| b | c |"
        );
    }

    #[test]
    fn empty_table_renders_nothing() {
        let table = Block::new(BlockKind::Table {
            has_column_header: true,
            has_row_header: false,
        });
        assert_eq!(blocks_to_markdown(&[table]), "");
    }

    #[test]
    fn empty_paragraphs_are_dropped() {
        let blocks = vec![paragraph(""), paragraph("kept")];
        assert_eq!(blocks_to_markdown(&blocks), "kept");
    }

    #[test]
    fn equation_renders_delimited() {
        let block = Block::new(BlockKind::Equation {
            expression: "e = mc^2".into(),
        });
        assert_eq!(blocks_to_markdown(&[block]), "$$e = mc^2$$");
    }
}
