//! CLI command implementations.

pub mod auth;
pub mod db;
pub mod page;
pub mod search;
pub mod sync;

use notemark_client::{Credentials, HttpRemote};
use std::sync::Arc;
use std::time::Duration;

/// Command result type.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Builds a remote client from the environment.
///
/// A missing token is a fatal precondition for every remote command.
pub(crate) fn remote_from_env() -> Result<Arc<HttpRemote>, Box<dyn std::error::Error>> {
    let creds = Credentials::from_env()?;
    Ok(Arc::new(HttpRemote::new(creds)?))
}

/// Sync root for freshness-guarded commands: `NOTION_AUTO_SYNC_DIR` or the
/// default, `~` expanded.
pub(crate) fn auto_sync_root() -> std::path::PathBuf {
    let dir = std::env::var("NOTION_AUTO_SYNC_DIR")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "~/notion-sync".to_string());
    notemark_sync_engine::expand_path(&dir)
}

/// Freshness TTL: `NOTION_REFRESH_TTL_MS` or the engine default.
pub(crate) fn refresh_ttl() -> Duration {
    std::env::var("NOTION_REFRESH_TTL_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(notemark_sync_engine::DEFAULT_REFRESH_TTL)
}
