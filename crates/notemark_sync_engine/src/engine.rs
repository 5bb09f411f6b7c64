//! Pull/push sync passes.

use crate::error::{EngineError, EngineResult};
use crate::files::{file_mtime_ms, page_file_name, render_frontmatter, slug, split_frontmatter};
use crate::state::{read_state, write_state, PageState, SyncState};
use chrono::DateTime;
use notemark_client::{fetch_all_blocks, DatabaseObject, RemoteApi};
use notemark_core::{blocks_to_markdown, markdown_to_blocks};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Blocks per append call. The remote accepts up to 100; staying below
/// leaves headroom for payload quirks.
const APPEND_BATCH: usize = 90;

/// The sync engine: pull-then-push passes over a local Markdown mirror.
///
/// One pass per database is `{pull, push}`, run sequentially: pull always
/// completes before push begins. Execution is single-threaded cooperative;
/// the suspension points are exactly the remote and file I/O calls.
pub struct SyncEngine {
    remote: Arc<dyn RemoteApi>,
    root: PathBuf,
}

impl SyncEngine {
    /// Creates an engine over a remote and a sync root directory.
    pub fn new(remote: Arc<dyn RemoteApi>, root: impl Into<PathBuf>) -> Self {
        Self {
            remote,
            root: root.into(),
        }
    }

    /// Returns the sync root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Syncs every database visible to the integration, in listing order.
    ///
    /// State is read once at the start and written back atomically at the
    /// end of the whole pass.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, on remote errors outside the per-page push
    /// containment, and on a database with no title property.
    pub async fn sync_all_databases(&self) -> EngineResult<()> {
        fs::create_dir_all(&self.root)?;
        let mut state = read_state(&self.root);
        let mut cursor = None;
        loop {
            let listing = self.remote.search_databases(cursor).await?;
            for db in &listing.results {
                self.sync_database_with_state(&db.id, &mut state).await?;
            }
            if !listing.has_more {
                break;
            }
            match listing.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        write_state(&self.root, &state)?;
        Ok(())
    }

    /// Runs a single-database pass, persisting state immediately after.
    ///
    /// # Errors
    ///
    /// See [`SyncEngine::sync_all_databases`].
    pub async fn sync_database(&self, database_id: &str) -> EngineResult<()> {
        fs::create_dir_all(&self.root)?;
        let mut state = read_state(&self.root);
        self.sync_database_with_state(database_id, &mut state).await?;
        write_state(&self.root, &state)?;
        Ok(())
    }

    async fn sync_database_with_state(
        &self,
        database_id: &str,
        state: &mut SyncState,
    ) -> EngineResult<()> {
        let db = self.remote.retrieve_database(database_id).await?;
        let title_key = db
            .title_property()
            .ok_or_else(|| EngineError::NoTitleProperty {
                database_id: database_id.to_string(),
            })?
            .to_string();

        let folder_name = if db.title.is_empty() {
            "database".to_string()
        } else {
            db.title.clone()
        };
        let folder = self.root.join(slug(&folder_name));
        fs::create_dir_all(&folder)?;

        self.pull(&db, &title_key, &folder, state).await?;
        self.push(database_id, state).await;
        Ok(())
    }

    /// Pull: mirror remote pages modified since the stored checkpoint.
    async fn pull(
        &self,
        db: &DatabaseObject,
        title_key: &str,
        folder: &Path,
        state: &mut SyncState,
    ) -> EngineResult<()> {
        let since = state
            .databases
            .get(&db.id)
            .and_then(|d| d.last_pull_iso.clone());
        let mut latest = since.clone();
        let mut pulled = 0usize;
        let mut cursor = None;

        loop {
            let batch = self
                .remote
                .query_database(&db.id, since.as_deref(), cursor)
                .await?;
            for page in &batch.results {
                let title = page.title(title_key).unwrap_or_default();
                let file = folder.join(page_file_name(
                    if title.is_empty() { "untitled" } else { &title },
                    &page.id,
                ));

                let blocks = fetch_all_blocks(self.remote.as_ref(), &page.id).await?;
                let header = render_frontmatter(&[
                    ("page_id", json!(page.id)),
                    ("database_id", json!(db.id)),
                    ("notion_last_edited_time", json!(page.last_edited_time)),
                    ("url", json!(page.url)),
                ]);
                let display_title = if title.is_empty() { "Untitled" } else { &title };
                let content = format!(
                    "---\n{header}\n---\n\n# {display_title}\n\n{}\n",
                    blocks_to_markdown(&blocks)
                );
                fs::write(&file, content)?;

                // The post-write mtime is the baseline for edit detection.
                let mtime = file_mtime_ms(&file)?;
                state.pages.insert(
                    page.id.clone(),
                    PageState {
                        page_id: page.id.clone(),
                        database_id: db.id.clone(),
                        file: file.clone(),
                        notion_last_edited_time: page.last_edited_time.clone(),
                        file_mtime_ms: mtime,
                    },
                );
                latest = newest_iso(latest, &page.last_edited_time);
                pulled += 1;
                tracing::debug!(page_id = %page.id, file = %file.display(), "pulled page");
            }
            if !batch.has_more {
                break;
            }
            match batch.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        let entry = state.databases.entry(db.id.clone()).or_default();
        if let Some(latest) = latest {
            entry.last_pull_iso = Some(latest);
        }
        tracing::debug!(database_id = %db.id, pulled, "pull complete");
        Ok(())
    }

    /// Push: write locally-edited mirror files back to the remote.
    ///
    /// Every failure is contained to its page.
    async fn push(&self, database_id: &str, state: &mut SyncState) {
        let page_ids: Vec<String> = state
            .pages
            .values()
            .filter(|p| p.database_id == database_id)
            .map(|p| p.page_id.clone())
            .collect();
        for page_id in page_ids {
            if let Err(err) = self.push_page(&page_id, state).await {
                tracing::warn!(page_id = %page_id, error = %err, "push skipped for page");
            }
        }
    }

    async fn push_page(&self, page_id: &str, state: &mut SyncState) -> EngineResult<()> {
        let Some(info) = state.pages.get(page_id).cloned() else {
            return Ok(());
        };
        let mtime = file_mtime_ms(&info.file)?;
        if mtime <= info.file_mtime_ms {
            // No local edit since the last checkpoint.
            return Ok(());
        }

        let content = fs::read_to_string(&info.file)?;
        let (_meta, body) = split_frontmatter(&content);

        // Last-writer-wins on wall-clock instant: only a strictly newer
        // local file overwrites remote content.
        let page = self.remote.retrieve_page(page_id).await?;
        let Some(remote_ms) = iso_to_ms(&page.last_edited_time) else {
            tracing::debug!(page_id, "remote timestamp unreadable, keeping remote");
            return Ok(());
        };
        if mtime <= remote_ms {
            tracing::debug!(page_id, "remote is newer, discarding local edit");
            return Ok(());
        }

        self.replace_page_content(page_id, body).await?;

        let entry = state
            .pages
            .get_mut(page_id)
            .expect("checkpoint present for pushed page");
        entry.file_mtime_ms = mtime;
        entry.notion_last_edited_time = self.remote.retrieve_page(page_id).await?.last_edited_time;
        tracing::debug!(page_id, "pushed page");
        Ok(())
    }

    /// Replaces a page's content: delete every current top-level child
    /// (best-effort), then append the parsed body in batches.
    async fn replace_page_content(&self, page_id: &str, body: &str) -> EngineResult<()> {
        let mut children = Vec::new();
        let mut cursor = None;
        loop {
            let batch = self.remote.list_children(page_id, cursor).await?;
            children.extend(batch.results);
            if !batch.has_more {
                break;
            }
            match batch.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        for child in &children {
            if let Err(err) = self.remote.delete_block(&child.id).await {
                tracing::debug!(block_id = %child.id, error = %err, "delete failed, continuing");
            }
        }

        let blocks = markdown_to_blocks(body);
        for chunk in blocks.chunks(APPEND_BATCH) {
            self.remote.append_children(page_id, chunk).await?;
        }
        Ok(())
    }
}

/// Parses an RFC 3339 instant to epoch milliseconds.
fn iso_to_ms(iso: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(iso)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// Keeps the chronologically later of a stored instant and a candidate.
fn newest_iso(current: Option<String>, candidate: &str) -> Option<String> {
    let Some(existing) = current else {
        return Some(candidate.to_string());
    };
    let newer = match (iso_to_ms(&existing), iso_to_ms(candidate)) {
        (Some(a), Some(b)) => b > a,
        // Fall back to string order for unparseable stamps.
        _ => candidate > existing.as_str(),
    };
    if newer {
        Some(candidate.to_string())
    } else {
        Some(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_parsing() {
        assert_eq!(iso_to_ms("2024-05-01T10:00:00.000Z"), Some(1_714_557_600_000));
        assert_eq!(iso_to_ms("not a date"), None);
    }

    #[test]
    fn newest_iso_tracks_maximum() {
        let latest = newest_iso(None, "2024-01-01T00:00:00.000Z");
        let latest = newest_iso(latest, "2024-06-01T00:00:00.000Z");
        let latest = newest_iso(latest, "2024-03-01T00:00:00.000Z");
        assert_eq!(latest.as_deref(), Some("2024-06-01T00:00:00.000Z"));
    }

    #[test]
    fn newest_iso_handles_offsets() {
        // +02:00 makes this earlier than the stored UTC instant.
        let latest = newest_iso(
            Some("2024-05-01T10:00:00.000Z".into()),
            "2024-05-01T11:00:00.000+02:00",
        );
        assert_eq!(latest.as_deref(), Some("2024-05-01T10:00:00.000Z"));
    }
}
