//! Durable sync checkpoint store.

use crate::error::EngineResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the state document under the sync root.
pub const STATE_FILE: &str = ".state.json";

/// Per-page checkpoint record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageState {
    /// Remote page id.
    pub page_id: String,
    /// Owning database id.
    pub database_id: String,
    /// Local mirror file path.
    pub file: PathBuf,
    /// Remote last-modified instant at the last pull or push, RFC 3339.
    pub notion_last_edited_time: String,
    /// File modification time (epoch ms) observed immediately after the
    /// engine last wrote or accepted the file. The baseline for local-edit
    /// detection, never a live-queried value.
    pub file_mtime_ms: i64,
}

/// Per-database checkpoint record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseState {
    /// Latest remote last-modified instant seen across pulled pages; lower
    /// bound filter for the next pull.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_pull_iso: Option<String>,
    /// Wall-clock instant (epoch ms) of the last full refresh; the
    /// freshness guard's TTL stamp, distinct from the pull checkpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_time_ms: Option<i64>,
}

/// The entire persisted sync state.
///
/// Loaded at the start of a pass, mutated in memory, written back
/// atomically at the end.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncState {
    /// Database checkpoints by database id.
    #[serde(default)]
    pub databases: BTreeMap<String, DatabaseState>,
    /// Page checkpoints by page id.
    #[serde(default)]
    pub pages: BTreeMap<String, PageState>,
}

/// Reads the state document under `root`.
///
/// A missing file or a parse failure yields an empty state: a first run
/// is never an error.
pub fn read_state(root: &Path) -> SyncState {
    let path = root.join(STATE_FILE);
    match fs::read_to_string(&path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "state file unreadable, starting empty");
            SyncState::default()
        }),
        Err(_) => SyncState::default(),
    }
}

/// Writes the state document under `root` atomically.
///
/// Serializes to a temporary file in the same directory, then renames it
/// over the canonical path, so a concurrent reader never observes a
/// partially-written document.
///
/// # Errors
///
/// Returns an error if serialization or file I/O fails.
pub fn write_state(root: &Path, state: &SyncState) -> EngineResult<()> {
    let path = root.join(STATE_FILE);
    let tmp = root.join(format!("{STATE_FILE}.tmp"));
    let raw = serde_json::to_string_pretty(state)?;
    fs::write(&tmp, raw)?;
    fs::rename(&tmp, &path)?;
    Ok(())
}
