//! Sync command implementations.

use super::{remote_from_env, CommandResult};
use notemark_sync_engine::{expand_path, SyncEngine};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runs `sync once`.
pub async fn once(dir: &str) -> CommandResult {
    let remote = remote_from_env()?;
    let root = expand_path(dir);
    let engine = SyncEngine::new(remote, &root);
    engine.sync_all_databases().await?;
    tracing::info!(dir = %root.display(), "sync once completed");
    Ok(())
}

/// Runs `sync run`: a polling loop of full passes.
///
/// The shutdown flag is checked only between passes; mid-pass cancellation
/// is out of scope.
pub async fn run(dir: &str, interval_secs: u64) -> CommandResult {
    let remote = remote_from_env()?;
    let root = expand_path(dir);
    let engine = SyncEngine::new(remote, &root);
    let interval = Duration::from_secs(interval_secs.max(10));

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown requested, finishing current pass");
                shutdown.store(true, Ordering::SeqCst);
            }
        });
    }

    tracing::info!(dir = %root.display(), interval_secs = interval.as_secs(), "sync daemon started");
    loop {
        let started = Instant::now();
        if let Err(err) = engine.sync_all_databases().await {
            tracing::error!(error = %err, "sync loop error");
        }
        if shutdown.load(Ordering::SeqCst) {
            break;
        }
        let wait = interval.saturating_sub(started.elapsed());
        tokio::time::sleep(wait).await;
        if shutdown.load(Ordering::SeqCst) {
            break;
        }
    }
    tracing::info!("sync daemon stopped");
    Ok(())
}
