//! Converter totality and structural round-trip properties.

use notemark_core::{blocks_to_markdown, markdown_to_blocks, Block, BlockKind, RichTextSpan};
use proptest::prelude::*;

fn text_kind(tag: usize, text: String) -> BlockKind {
    let rich_text = vec![RichTextSpan::plain(text)];
    match tag {
        0 => BlockKind::Paragraph { rich_text },
        1 => BlockKind::Heading1 { rich_text },
        2 => BlockKind::Heading2 { rich_text },
        3 => BlockKind::Heading3 { rich_text },
        4 => BlockKind::BulletedListItem { rich_text },
        5 => BlockKind::NumberedListItem { rich_text },
        6 => BlockKind::ToDo {
            rich_text,
            checked: true,
        },
        7 => BlockKind::Quote { rich_text },
        8 => BlockKind::Toggle { rich_text },
        _ => BlockKind::Callout { rich_text },
    }
}

fn arb_block() -> impl Strategy<Value = Block> {
    prop_oneof![
        (0usize..10, "[a-zA-Z0-9 ]{0,20}").prop_map(|(tag, text)| Block::new(text_kind(tag, text))),
        Just(Block::new(BlockKind::Divider)),
        Just(Block::new(BlockKind::TableOfContents)),
        Just(Block::new(BlockKind::Breadcrumb)),
        "[a-z_]{1,12}".prop_map(|tag| Block::new(BlockKind::Unsupported {
            type_tag: tag,
            payload: serde_json::Value::Null,
        })),
        "[a-z:/.]{0,30}".prop_map(|url| Block::new(BlockKind::Image { url })),
        "[a-z0-9 =+^]{0,20}".prop_map(|expression| Block::new(BlockKind::Equation {
            expression
        })),
    ]
}

proptest! {
    /// The renderer is total: any block sequence renders without panicking.
    #[test]
    fn renderer_never_panics(blocks in prop::collection::vec(arb_block(), 0..20)) {
        let _ = blocks_to_markdown(&blocks);
    }

    /// The parser is total and consumes every non-blank line.
    #[test]
    fn parser_never_panics_and_consumes_all_lines(text in "[ -~\n]{0,400}") {
        let blocks = markdown_to_blocks(&text);
        // Without fences, block count never exceeds non-blank line count,
        // and nothing non-blank may be dropped entirely.
        let non_blank = text.lines().filter(|l| !l.trim().is_empty()).count();
        if !text.contains("```") {
            prop_assert!(blocks.len() <= non_blank.max(1));
            prop_assert_eq!(non_blank == 0, blocks.is_empty());
        }
    }

    /// Wire parsing is total over arbitrary JSON-ish block objects.
    #[test]
    fn wire_parse_never_panics(tag in "[a-z_]{0,12}", id in "[a-f0-9-]{0,36}") {
        let value = serde_json::json!({ "id": id, "type": tag.clone(), tag: {} });
        let _ = Block::from_value(&value);
    }
}

/// Gross structure survives a render, parse, and re-render cycle for a pure
/// heading/list/quote/code/divider tree. Paragraphs are excluded: the
/// parser's greedy fallback would absorb following lines, which is part of
/// the documented asymmetry.
#[test]
fn structural_idempotence_for_recognized_subset() {
    let original = vec![
        Block::new(BlockKind::Heading1 {
            rich_text: vec![RichTextSpan::plain("Title")],
        }),
        Block::new(BlockKind::BulletedListItem {
            rich_text: vec![RichTextSpan::plain("first")],
        }),
        Block::new(BlockKind::BulletedListItem {
            rich_text: vec![RichTextSpan::plain("second")],
        }),
        Block::new(BlockKind::Quote {
            rich_text: vec![RichTextSpan::plain("quoted")],
        }),
        Block::new(BlockKind::Code {
            rich_text: vec![RichTextSpan::plain("let x = 1;")],
            language: "rust".into(),
        }),
        Block::new(BlockKind::Divider),
    ];

    let rendered = blocks_to_markdown(&original);
    let reparsed = markdown_to_blocks(&rendered);
    let rerendered = blocks_to_markdown(&reparsed);

    let tags = |blocks: &[Block]| -> Vec<String> {
        blocks.iter().map(|b| b.kind.type_tag().to_string()).collect()
    };
    assert_eq!(tags(&original), tags(&reparsed));
    assert_eq!(rendered, rerendered);
}

/// Checkbox state round-trips exactly.
#[test]
fn checklist_state_round_trips() {
    let original = vec![
        Block::new(BlockKind::ToDo {
            rich_text: vec![RichTextSpan::plain("a")],
            checked: false,
        }),
        Block::new(BlockKind::ToDo {
            rich_text: vec![RichTextSpan::plain("b")],
            checked: true,
        }),
    ];
    let rendered = blocks_to_markdown(&original);
    assert_eq!(rendered, "- [ ] a\n- [x] b");
    let reparsed = markdown_to_blocks(&rendered);
    assert_eq!(reparsed.len(), 2);
    assert!(matches!(reparsed[0].kind, BlockKind::ToDo { checked: false, .. }));
    assert!(matches!(reparsed[1].kind, BlockKind::ToDo { checked: true, .. }));
    assert_eq!(blocks_to_markdown(&reparsed), rendered);
}

/// Inline styling is intentionally lost on a round trip.
#[test]
fn styling_does_not_survive_round_trip() {
    let original = vec![Block::new(BlockKind::Paragraph {
        rich_text: vec![RichTextSpan {
            text: "bold".into(),
            bold: true,
            ..Default::default()
        }],
    })];
    let reparsed = markdown_to_blocks(&blocks_to_markdown(&original));
    match &reparsed[0].kind {
        BlockKind::Paragraph { rich_text } => {
            assert_eq!(rich_text[0].text, "**bold**");
            assert!(!rich_text[0].bold);
        }
        other => panic!("unexpected kind: {other:?}"),
    }
}
