//! # notemark sync engine
//!
//! Bidirectional sync engine and state store for notemark.
//!
//! This crate provides:
//! - A durable [`SyncState`] checkpoint store, read and written atomically
//! - The [`SyncEngine`]: per-database pull-then-push passes with
//!   last-writer-wins conflict resolution
//! - [`ensure_fresh`]: a TTL-gated wrapper that triggers a single-database
//!   pass only when the local mirror may have drifted
//!
//! ## Key invariants
//!
//! - Pull always completes before push within a pass
//! - A page checkpoint's baseline mtime is the value observed immediately
//!   after the engine last wrote or accepted that file
//! - A stale local edit is discarded silently; only a strictly newer local
//!   file overwrites remote content
//! - Per-page push failures are logged and never abort the remaining pages
//!
//! Execution is single-threaded cooperative: one remote call is in flight
//! at a time, and concurrent engines over one sync root are undefined.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod error;
mod files;
mod refresh;
mod state;

pub use engine::SyncEngine;
pub use error::{EngineError, EngineResult};
pub use files::{expand_path, file_mtime_ms, page_file_name, slug, split_frontmatter};
pub use refresh::{ensure_fresh, DEFAULT_REFRESH_TTL};
pub use state::{read_state, write_state, DatabaseState, PageState, SyncState, STATE_FILE};
