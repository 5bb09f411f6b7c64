//! Recursive block-tree retrieval.

use crate::error::ApiResult;
use crate::remote::RemoteApi;
use notemark_core::Block;
use std::future::Future;
use std::pin::Pin;

/// Fetches every direct child of a block or page, following cursors to
/// exhaustion, then recursively fetches the children of any block flagged
/// as having them.
///
/// A failure listing one block's children is downgraded to "no children"
/// rather than aborting the page: some block kinds do not support child
/// listing.
pub fn fetch_all_blocks<'a>(
    remote: &'a dyn RemoteApi,
    block_id: &'a str,
) -> Pin<Box<dyn Future<Output = ApiResult<Vec<Block>>> + Send + 'a>> {
    Box::pin(async move {
        let mut blocks = Vec::new();
        let mut cursor = None;
        loop {
            let page = remote.list_children(block_id, cursor).await?;
            blocks.extend(page.results);
            if !page.has_more {
                break;
            }
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        for block in &mut blocks {
            if block.has_children {
                let id = block.id.clone();
                block.children = match fetch_all_blocks(remote, &id).await {
                    Ok(children) => children,
                    Err(err) => {
                        tracing::debug!(block_id = %id, error = %err, "child listing failed, treating as empty");
                        Vec::new()
                    }
                };
            }
        }
        Ok(blocks)
    })
}
