//! Remote API surface abstraction.

use crate::error::{ApiError, ApiResult};
use crate::types::{DatabaseObject, PageObject, Paginated, SearchResult};
use async_trait::async_trait;
use notemark_core::Block;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// The remote API surface consumed by the sync engine and the CLI.
///
/// This trait abstracts the remote service, allowing the reqwest-backed
/// [`crate::HttpRemote`] to be swapped for [`MockRemote`] in tests.
/// Implementations are expected to perform their own retry handling.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Searches pages and databases by free-text query.
    async fn search(&self, query: &str, cursor: Option<String>)
        -> ApiResult<Paginated<SearchResult>>;

    /// Lists databases visible to the integration.
    ///
    /// The remote has no dedicated listing endpoint; this is a search
    /// filtered to database objects.
    async fn search_databases(&self, cursor: Option<String>)
        -> ApiResult<Paginated<DatabaseObject>>;

    /// Retrieves one database with its schema.
    async fn retrieve_database(&self, database_id: &str) -> ApiResult<DatabaseObject>;

    /// Queries pages of a database, optionally filtered to pages modified
    /// at-or-after the given RFC 3339 instant.
    async fn query_database(
        &self,
        database_id: &str,
        updated_on_or_after: Option<&str>,
        cursor: Option<String>,
    ) -> ApiResult<Paginated<PageObject>>;

    /// Retrieves one page.
    async fn retrieve_page(&self, page_id: &str) -> ApiResult<PageObject>;

    /// Lists direct children of a block or page.
    async fn list_children(&self, block_id: &str, cursor: Option<String>)
        -> ApiResult<Paginated<Block>>;

    /// Appends children to a block or page.
    ///
    /// The remote accepts at most 100 blocks per call; callers batch at 90.
    async fn append_children(&self, block_id: &str, children: &[Block]) -> ApiResult<()>;

    /// Deletes (archives) a block.
    async fn delete_block(&self, block_id: &str) -> ApiResult<()>;
}

/// A scripted in-memory remote for tests.
///
/// Holds databases, pages, and block children keyed by id; records every
/// append and delete, counts every call, and can be told to fail specific
/// operations.
#[derive(Default)]
pub struct MockRemote {
    databases: Mutex<Vec<DatabaseObject>>,
    pages: Mutex<HashMap<String, PageObject>>,
    db_pages: Mutex<HashMap<String, Vec<String>>>,
    children: Mutex<HashMap<String, Vec<Block>>>,
    fail_children: Mutex<HashSet<String>>,
    fail_append: Mutex<HashSet<String>>,
    appends: Mutex<Vec<(String, usize)>>,
    deletes: Mutex<Vec<String>>,
    calls: AtomicU32,
}

impl MockRemote {
    /// Creates an empty mock remote.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a database.
    pub fn add_database(&self, database: DatabaseObject) {
        self.databases.lock().unwrap().push(database);
    }

    /// Registers a page under a database.
    pub fn add_page(&self, database_id: &str, page: PageObject) {
        self.db_pages
            .lock()
            .unwrap()
            .entry(database_id.to_string())
            .or_default()
            .push(page.id.clone());
        self.pages.lock().unwrap().insert(page.id.clone(), page);
    }

    /// Replaces a registered page (e.g. to move its remote timestamp).
    pub fn update_page(&self, page: PageObject) {
        self.pages.lock().unwrap().insert(page.id.clone(), page);
    }

    /// Sets the children returned for a block or page id.
    pub fn set_children(&self, parent_id: &str, children: Vec<Block>) {
        self.children
            .lock()
            .unwrap()
            .insert(parent_id.to_string(), children);
    }

    /// Makes child listing fail for the given id.
    pub fn fail_children_of(&self, parent_id: &str) {
        self.fail_children
            .lock()
            .unwrap()
            .insert(parent_id.to_string());
    }

    /// Makes appends fail for the given id.
    pub fn fail_append_to(&self, parent_id: &str) {
        self.fail_append
            .lock()
            .unwrap()
            .insert(parent_id.to_string());
    }

    /// Returns every recorded append as `(parent id, block count)`.
    pub fn appended(&self) -> Vec<(String, usize)> {
        self.appends.lock().unwrap().clone()
    }

    /// Returns every deleted block id, in order.
    pub fn deleted(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }

    /// Returns the total number of remote calls made.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RemoteApi for MockRemote {
    async fn search(
        &self,
        _query: &str,
        _cursor: Option<String>,
    ) -> ApiResult<Paginated<SearchResult>> {
        self.record_call();
        let hits = self
            .databases
            .lock()
            .unwrap()
            .iter()
            .map(|db| SearchResult {
                id: db.id.clone(),
                object: "database".into(),
            })
            .collect();
        Ok(Paginated::single(hits))
    }

    async fn search_databases(
        &self,
        _cursor: Option<String>,
    ) -> ApiResult<Paginated<DatabaseObject>> {
        self.record_call();
        Ok(Paginated::single(self.databases.lock().unwrap().clone()))
    }

    async fn retrieve_database(&self, database_id: &str) -> ApiResult<DatabaseObject> {
        self.record_call();
        self.databases
            .lock()
            .unwrap()
            .iter()
            .find(|db| db.id == database_id)
            .cloned()
            .ok_or_else(|| ApiError::status(404, format!("no database {database_id}")))
    }

    async fn query_database(
        &self,
        database_id: &str,
        updated_on_or_after: Option<&str>,
        _cursor: Option<String>,
    ) -> ApiResult<Paginated<PageObject>> {
        self.record_call();
        let page_ids = self
            .db_pages
            .lock()
            .unwrap()
            .get(database_id)
            .cloned()
            .unwrap_or_default();
        let pages = self.pages.lock().unwrap();
        let results = page_ids
            .iter()
            .filter_map(|id| pages.get(id))
            // RFC 3339 UTC instants compare correctly as strings.
            .filter(|p| updated_on_or_after.is_none_or(|since| p.last_edited_time.as_str() >= since))
            .cloned()
            .collect();
        Ok(Paginated::single(results))
    }

    async fn retrieve_page(&self, page_id: &str) -> ApiResult<PageObject> {
        self.record_call();
        self.pages
            .lock()
            .unwrap()
            .get(page_id)
            .cloned()
            .ok_or_else(|| ApiError::status(404, format!("no page {page_id}")))
    }

    async fn list_children(
        &self,
        block_id: &str,
        _cursor: Option<String>,
    ) -> ApiResult<Paginated<Block>> {
        self.record_call();
        if self.fail_children.lock().unwrap().contains(block_id) {
            return Err(ApiError::status(500, format!("children of {block_id} unavailable")));
        }
        Ok(Paginated::single(
            self.children
                .lock()
                .unwrap()
                .get(block_id)
                .cloned()
                .unwrap_or_default(),
        ))
    }

    async fn append_children(&self, block_id: &str, children: &[Block]) -> ApiResult<()> {
        self.record_call();
        if self.fail_append.lock().unwrap().contains(block_id) {
            return Err(ApiError::status(400, format!("append to {block_id} rejected")));
        }
        self.appends
            .lock()
            .unwrap()
            .push((block_id.to_string(), children.len()));
        self.children
            .lock()
            .unwrap()
            .entry(block_id.to_string())
            .or_default()
            .extend_from_slice(children);
        Ok(())
    }

    async fn delete_block(&self, block_id: &str) -> ApiResult<()> {
        self.record_call();
        self.deletes.lock().unwrap().push(block_id.to_string());
        for children in self.children.lock().unwrap().values_mut() {
            children.retain(|b| b.id != block_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db(id: &str) -> DatabaseObject {
        DatabaseObject {
            id: id.into(),
            title: "Test".into(),
            ..Default::default()
        }
    }

    fn page(id: &str, edited: &str) -> PageObject {
        PageObject {
            id: id.into(),
            last_edited_time: edited.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn query_filters_by_modification_floor() {
        let remote = MockRemote::new();
        remote.add_database(db("d1"));
        remote.add_page("d1", page("p1", "2024-01-01T00:00:00.000Z"));
        remote.add_page("d1", page("p2", "2024-06-01T00:00:00.000Z"));

        let all = remote.query_database("d1", None, None).await.unwrap();
        assert_eq!(all.results.len(), 2);

        let recent = remote
            .query_database("d1", Some("2024-03-01T00:00:00.000Z"), None)
            .await
            .unwrap();
        assert_eq!(recent.results.len(), 1);
        assert_eq!(recent.results[0].id, "p2");
    }

    #[tokio::test]
    async fn call_counter_tracks_every_operation() {
        let remote = MockRemote::new();
        remote.add_database(db("d1"));
        let _ = remote.search_databases(None).await;
        let _ = remote.retrieve_database("d1").await;
        assert_eq!(remote.call_count(), 2);
    }

    #[tokio::test]
    async fn scripted_children_failure() {
        let remote = MockRemote::new();
        remote.fail_children_of("b1");
        assert!(remote.list_children("b1", None).await.is_err());
        assert!(remote.list_children("b2", None).await.is_ok());
    }

    #[tokio::test]
    async fn delete_records_and_removes() {
        let remote = MockRemote::new();
        let child = Block {
            id: "c1".into(),
            ..Default::default()
        };
        remote.set_children("p1", vec![child]);
        remote.delete_block("c1").await.unwrap();
        assert_eq!(remote.deleted(), vec!["c1".to_string()]);
        assert!(remote.list_children("p1", None).await.unwrap().results.is_empty());
    }
}
