//! # notemark core
//!
//! Block data model and Markdown converters for notemark.
//!
//! This crate provides:
//! - A tagged-variant block tree mirroring the remote content model
//! - Rich-text spans with independent style flags
//! - Wire (de)serialization against the remote JSON shape
//! - The two lossy structural converters:
//!   [`blocks_to_markdown`] and [`markdown_to_blocks`]
//!
//! ## Fidelity contract
//!
//! `blocks_to_markdown` is total: every block kind renders to something,
//! unrecognized kinds render as an HTML comment placeholder, and the
//! function never fails. `markdown_to_blocks` is total over line-oriented
//! input: every non-blank line is consumed into exactly one block. The pair
//! is **not** a bijection: re-parsing rendered output preserves gross
//! structure (headings, lists, quotes, code, dividers) but loses inline
//! styling and unsupported block kinds.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod parse;
mod render;
mod richtext;
mod wire;

pub use block::{Block, BlockKind};
pub use parse::markdown_to_blocks;
pub use render::blocks_to_markdown;
pub use richtext::RichTextSpan;
