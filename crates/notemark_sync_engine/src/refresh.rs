//! TTL-gated freshness guard.

use crate::engine::SyncEngine;
use crate::error::EngineResult;
use crate::state::{read_state, write_state};
use chrono::Utc;
use notemark_client::RemoteApi;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Default TTL before an on-demand command re-syncs a database.
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_millis(60_000);

/// Runs a single-database sync pass unless one completed within `ttl`.
///
/// The guard stamps a wall-clock "last full refresh" instant separate from
/// the pull/push checkpoints, so a pass that pulled nothing still
/// suppresses re-triggering inside the TTL window. Within the window this
/// performs zero remote calls.
///
/// # Errors
///
/// Propagates sync-pass and state-write failures.
pub async fn ensure_fresh(
    remote: Arc<dyn RemoteApi>,
    root: &Path,
    database_id: &str,
    ttl: Duration,
) -> EngineResult<()> {
    let state = read_state(root);
    let now_ms = Utc::now().timestamp_millis();
    if let Some(last) = state
        .databases
        .get(database_id)
        .and_then(|d| d.last_sync_time_ms)
    {
        if now_ms - last < ttl.as_millis() as i64 {
            tracing::debug!(database_id, "mirror is fresh, skipping sync");
            return Ok(());
        }
    }

    let engine = SyncEngine::new(remote, root);
    engine.sync_database(database_id).await?;

    // Reload: the pass rewrote the document.
    let mut state = read_state(root);
    state
        .databases
        .entry(database_id.to_string())
        .or_default()
        .last_sync_time_ms = Some(now_ms);
    write_state(root, &state)?;
    Ok(())
}
