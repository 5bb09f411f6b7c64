//! Page command implementations.

use super::{remote_from_env, CommandResult};
use notemark_client::RemoteApi;
use notemark_core::markdown_to_blocks;
use std::path::Path;

/// Blocks per append call, matching the engine's batch size.
const APPEND_BATCH: usize = 90;

/// Runs `page get`.
pub async fn get(id: &str, json: bool) -> CommandResult {
    let remote = remote_from_env()?;
    let page = remote.retrieve_page(id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&page.raw)?);
    } else {
        // Without the database schema, probe the properties for the
        // title-typed entry.
        let title = page
            .properties
            .as_object()
            .and_then(|props| {
                props
                    .keys()
                    .find_map(|key| page.title(key))
            })
            .unwrap_or_else(|| "Untitled".to_string());
        tracing::info!(id = %page.id, title = %title, edited = %page.last_edited_time, "page info");
    }
    Ok(())
}

/// Runs `page append`.
pub async fn append(id: &str, content: &Path) -> CommandResult {
    let remote = remote_from_env()?;
    let markdown = std::fs::read_to_string(content)?;
    let blocks = markdown_to_blocks(&markdown);
    for chunk in blocks.chunks(APPEND_BATCH) {
        remote.append_children(id, chunk).await?;
    }
    tracing::info!(id = %id, blocks = blocks.len(), "content appended to page");
    Ok(())
}
