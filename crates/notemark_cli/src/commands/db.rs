//! Database command implementations.

use super::{auto_sync_root, refresh_ttl, remote_from_env, CommandResult};
use notemark_client::RemoteApi;
use notemark_sync_engine::ensure_fresh;
use serde_json::json;
use std::path::Path;

/// Runs `db list`.
pub async fn list(json: bool) -> CommandResult {
    let remote = remote_from_env()?;
    let mut databases = Vec::new();
    let mut cursor = None;
    loop {
        let page = remote.search_databases(cursor).await?;
        databases.extend(page.results);
        if !page.has_more {
            break;
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    if json {
        let items: Vec<_> = databases
            .iter()
            .map(|db| json!({ "id": db.id, "title": db.title }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for db in &databases {
            tracing::info!(id = %db.id, title = %db.title, "database");
        }
        tracing::info!(count = databases.len(), "listing complete");
    }
    Ok(())
}

/// Runs `db schema`.
pub async fn schema(id: &str, json: bool, no_refresh: bool) -> CommandResult {
    let remote = remote_from_env()?;
    if !no_refresh {
        ensure_fresh(remote.clone(), &auto_sync_root(), id, refresh_ttl()).await?;
    }
    let db = remote.retrieve_database(id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&db.raw)?);
    } else {
        let properties: Vec<String> = db
            .properties
            .iter()
            .map(|(name, kind)| format!("{name}: {kind}"))
            .collect();
        tracing::info!(id = %db.id, title = %db.title, properties = ?properties, "database schema");
    }
    Ok(())
}

/// Runs `db pull`.
pub async fn pull(id: &str, out: Option<&Path>, no_refresh: bool) -> CommandResult {
    let remote = remote_from_env()?;
    if !no_refresh {
        ensure_fresh(remote.clone(), &auto_sync_root(), id, refresh_ttl()).await?;
    }

    let mut pages = Vec::new();
    let mut cursor = None;
    loop {
        let batch = remote.query_database(id, None, cursor).await?;
        pages.extend(batch.results.into_iter().map(|p| p.raw));
        if !batch.has_more {
            break;
        }
        match batch.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    let rendered = serde_json::to_string_pretty(&pages)?;
    match out {
        Some(path) => {
            std::fs::write(path, rendered)?;
            tracing::info!(count = pages.len(), file = %path.display(), "pulled pages");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
