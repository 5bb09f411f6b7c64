//! Markdown-to-blocks parser.

use crate::block::{Block, BlockKind};
use crate::richtext::RichTextSpan;
use regex::Regex;
use std::sync::LazyLock;

static FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^```(.*)$").unwrap());
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,3})\s+(.*)$").unwrap());
static QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>\s?(.*)$").unwrap());
static TODO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s*\[( |x|X)\]\s+(.*)$").unwrap());
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-\s+(.*)$").unwrap());
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+(.*)$").unwrap());
static HRULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^---+$").unwrap());

/// Parses Markdown text into an ordered block list.
///
/// A single left-to-right scan over lines, recognizing in priority order:
/// fenced code, horizontal rule, ATX heading (1–3 `#`), blockquote,
/// checklist run, unordered list run, ordered list run, and a fallback
/// paragraph that greedily consumes subsequent non-blank lines as one
/// multi-line block. Blank lines are pure separators. All text bodies
/// become a single unstyled span: inline styling does not survive a round
/// trip; structural shape does.
///
/// Total over line-oriented input: never fails, and every non-blank line
/// is consumed into exactly one block. Output is not batched here; callers
/// append to the remote in chunks of at most 90 blocks.
pub fn markdown_to_blocks(text: &str) -> Vec<Block> {
    let normalized = text.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.trim().is_empty() {
            i += 1;
            continue;
        }

        if let Some(caps) = FENCE.captures(line) {
            let language = caps[1].trim().to_string();
            i += 1;
            let mut body = Vec::new();
            while i < lines.len() && !lines[i].starts_with("```") {
                body.push(lines[i]);
                i += 1;
            }
            // Closing fence is optional at end of input.
            if i < lines.len() {
                i += 1;
            }
            blocks.push(Block::new(BlockKind::Code {
                rich_text: vec![RichTextSpan::plain(body.join("\n"))],
                language: if language.is_empty() {
                    "plain text".into()
                } else {
                    language
                },
            }));
            continue;
        }

        if HRULE.is_match(line.trim()) {
            blocks.push(Block::new(BlockKind::Divider));
            i += 1;
            continue;
        }

        if let Some(caps) = HEADING.captures(line) {
            let rich_text = vec![RichTextSpan::plain(&caps[2])];
            let kind = match caps[1].len() {
                1 => BlockKind::Heading1 { rich_text },
                2 => BlockKind::Heading2 { rich_text },
                _ => BlockKind::Heading3 { rich_text },
            };
            blocks.push(Block::new(kind));
            i += 1;
            continue;
        }

        if let Some(caps) = QUOTE.captures(line) {
            let mut body = vec![caps[1].to_string()];
            i += 1;
            while i < lines.len() && lines[i].starts_with('>') {
                body.push(QUOTE.replace(lines[i], "$1").into_owned());
                i += 1;
            }
            blocks.push(Block::new(BlockKind::Quote {
                rich_text: vec![RichTextSpan::plain(body.join("\n"))],
            }));
            continue;
        }

        if TODO.is_match(line) {
            while i < lines.len() {
                let Some(caps) = TODO.captures(lines[i]) else {
                    break;
                };
                blocks.push(Block::new(BlockKind::ToDo {
                    rich_text: vec![RichTextSpan::plain(&caps[2])],
                    checked: caps[1].eq_ignore_ascii_case("x"),
                }));
                i += 1;
            }
            continue;
        }

        if BULLET.is_match(line) {
            while i < lines.len() {
                let Some(caps) = BULLET.captures(lines[i]) else {
                    break;
                };
                blocks.push(Block::new(BlockKind::BulletedListItem {
                    rich_text: vec![RichTextSpan::plain(&caps[1])],
                }));
                i += 1;
            }
            continue;
        }

        if NUMBERED.is_match(line) {
            while i < lines.len() {
                let Some(caps) = NUMBERED.captures(lines[i]) else {
                    break;
                };
                blocks.push(Block::new(BlockKind::NumberedListItem {
                    rich_text: vec![RichTextSpan::plain(&caps[1])],
                }));
                i += 1;
            }
            continue;
        }

        // Fallback paragraph: greedy until the next blank line.
        let mut body = vec![line];
        i += 1;
        while i < lines.len() && !lines[i].trim().is_empty() {
            body.push(lines[i]);
            i += 1;
        }
        blocks.push(Block::new(BlockKind::Paragraph {
            rich_text: vec![RichTextSpan::plain(body.join("\n"))],
        }));
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<String> {
        markdown_to_blocks(text)
            .iter()
            .map(|b| b.kind.type_tag().to_string())
            .collect()
    }

    fn single_text(block: &Block) -> &str {
        match &block.kind {
            BlockKind::Paragraph { rich_text }
            | BlockKind::Heading1 { rich_text }
            | BlockKind::Heading2 { rich_text }
            | BlockKind::Heading3 { rich_text }
            | BlockKind::BulletedListItem { rich_text }
            | BlockKind::NumberedListItem { rich_text }
            | BlockKind::ToDo { rich_text, .. }
            | BlockKind::Quote { rich_text }
            | BlockKind::Code { rich_text, .. } => &rich_text[0].text,
            other => panic!("no text on {other:?}"),
        }
    }

    #[test]
    fn empty_input_yields_no_blocks() {
        assert!(markdown_to_blocks("").is_empty());
        assert!(markdown_to_blocks("\n\n  \n").is_empty());
    }

    #[test]
    fn headings_up_to_level_three() {
        assert_eq!(
            kinds("# a\n## b\n### c"),
            vec!["heading_1", "heading_2", "heading_3"]
        );
        // Four hashes are not a heading; the fallback paragraph takes them.
        assert_eq!(kinds("#### d"), vec!["paragraph"]);
    }

    #[test]
    fn code_fence_preserves_body_and_language() {
        let blocks = markdown_to_blocks("```rust\nfn main() {}\n\nlet x;\n```");
        assert_eq!(blocks.len(), 1);
        match &blocks[0].kind {
            BlockKind::Code { rich_text, language } => {
                assert_eq!(language, "rust");
                assert_eq!(rich_text[0].text, "fn main() {}\n\nlet x;");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn unterminated_fence_consumes_to_end() {
        let blocks = markdown_to_blocks("```\nbody line");
        assert_eq!(blocks.len(), 1);
        match &blocks[0].kind {
            BlockKind::Code { rich_text, language } => {
                assert_eq!(language, "plain text");
                assert_eq!(rich_text[0].text, "body line");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn horizontal_rule() {
        assert_eq!(kinds("---"), vec!["divider"]);
        assert_eq!(kinds("-----"), vec!["divider"]);
    }

    #[test]
    fn blockquote_merges_consecutive_lines() {
        let blocks = markdown_to_blocks("> one\n> two\nafter");
        assert_eq!(blocks.len(), 2);
        assert_eq!(single_text(&blocks[0]), "one\ntwo");
        assert_eq!(blocks[1].kind.type_tag(), "paragraph");
    }

    #[test]
    fn checklist_round() {
        let blocks = markdown_to_blocks("- [ ] a\n- [x] b\n- [X] c");
        assert_eq!(blocks.len(), 3);
        for (block, expected) in blocks.iter().zip([false, true, true]) {
            match block.kind {
                BlockKind::ToDo { checked, .. } => assert_eq!(checked, expected),
                _ => panic!("expected to_do"),
            }
        }
    }

    #[test]
    fn checklist_takes_priority_over_bullets() {
        assert_eq!(kinds("- [ ] task\n- plain"), vec!["to_do", "bulleted_list_item"]);
    }

    #[test]
    fn list_runs_emit_one_block_per_line() {
        assert_eq!(
            kinds("- a\n- b\n1. c\n2. d"),
            vec![
                "bulleted_list_item",
                "bulleted_list_item",
                "numbered_list_item",
                "numbered_list_item"
            ]
        );
    }

    #[test]
    fn ordered_item_keeps_content_only() {
        let blocks = markdown_to_blocks("12. twelve");
        assert_eq!(single_text(&blocks[0]), "twelve");
    }

    #[test]
    fn paragraph_consumes_until_blank_line() {
        let blocks = markdown_to_blocks("one\ntwo\n\nthree");
        assert_eq!(blocks.len(), 2);
        assert_eq!(single_text(&blocks[0]), "one\ntwo");
        assert_eq!(single_text(&blocks[1]), "three");
    }

    #[test]
    fn crlf_input_is_normalized() {
        let blocks = markdown_to_blocks("# a\r\ntext\r\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(single_text(&blocks[0]), "a");
    }

    #[test]
    fn bodies_are_single_unstyled_spans() {
        let blocks = markdown_to_blocks("**not bold** text");
        match &blocks[0].kind {
            BlockKind::Paragraph { rich_text } => {
                assert_eq!(rich_text.len(), 1);
                assert_eq!(rich_text[0].text, "**not bold** text");
                assert!(!rich_text[0].bold);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }
}
