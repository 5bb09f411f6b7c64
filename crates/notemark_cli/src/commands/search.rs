//! Search command implementation.

use super::{remote_from_env, CommandResult};
use notemark_client::RemoteApi;
use serde_json::json;

/// Runs `search <query>`.
pub async fn run(query: &str, json: bool) -> CommandResult {
    let remote = remote_from_env()?;
    let mut hits = Vec::new();
    let mut cursor = None;
    loop {
        let page = remote.search(query, cursor).await?;
        hits.extend(page.results);
        if !page.has_more {
            break;
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    if json {
        let items: Vec<_> = hits
            .iter()
            .map(|h| json!({ "id": h.id, "object": h.object }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for hit in &hits {
            tracing::info!(id = %hit.id, object = %hit.object, "search result");
        }
        tracing::info!(count = hits.len(), "search complete");
    }
    Ok(())
}
