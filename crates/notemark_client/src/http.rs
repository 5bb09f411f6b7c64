//! reqwest-backed remote implementation.

use crate::config::Credentials;
use crate::error::{ApiError, ApiResult};
use crate::remote::RemoteApi;
use crate::retry::{with_retry, RetryPolicy};
use crate::types::{DatabaseObject, PageObject, Paginated, SearchResult};
use async_trait::async_trait;
use notemark_core::Block;
use reqwest::{header, Method, StatusCode};
use serde_json::{json, Map, Value};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the remote API.
///
/// Sends bearer auth and the API version header with every request and
/// wraps each call in retry with exponential backoff.
pub struct HttpRemote {
    http: reqwest::Client,
    creds: Credentials,
    retry: RetryPolicy,
}

impl HttpRemote {
    /// Creates a client with the default retry policy.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(creds: Credentials) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::transport(e.to_string()))?;
        Ok(Self {
            http,
            creds,
            retry: RetryPolicy::default(),
        })
    }

    /// Overrides the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1{}", self.creds.base_url, path)
    }

    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<Value> {
        with_retry(&self.retry, || self.send_once(method.clone(), path, body.as_ref())).await
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        let mut req = self
            .http
            .request(method, self.url(path))
            .bearer_auth(&self.creds.token)
            .header("Notion-Version", &self.creds.api_version);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let retry_after = resp
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
                retry_after,
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        resp.json::<Value>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

fn with_cursor(mut body: Map<String, Value>, cursor: Option<String>) -> Value {
    if let Some(cursor) = cursor {
        body.insert("start_cursor".into(), Value::String(cursor));
    }
    Value::Object(body)
}

fn cursor_query(path: &str, cursor: Option<String>) -> String {
    match cursor {
        Some(cursor) => format!("{path}?start_cursor={cursor}"),
        None => path.to_string(),
    }
}

#[async_trait]
impl RemoteApi for HttpRemote {
    async fn search(
        &self,
        query: &str,
        cursor: Option<String>,
    ) -> ApiResult<Paginated<SearchResult>> {
        let mut body = Map::new();
        body.insert("query".into(), Value::String(query.to_string()));
        let value = self
            .request(Method::POST, "/search", Some(with_cursor(body, cursor)))
            .await?;
        Paginated::from_value(&value, SearchResult::from_value)
    }

    async fn search_databases(
        &self,
        cursor: Option<String>,
    ) -> ApiResult<Paginated<DatabaseObject>> {
        let mut body = Map::new();
        body.insert(
            "filter".into(),
            json!({ "property": "object", "value": "database" }),
        );
        let value = self
            .request(Method::POST, "/search", Some(with_cursor(body, cursor)))
            .await?;
        Paginated::from_value(&value, DatabaseObject::from_value)
    }

    async fn retrieve_database(&self, database_id: &str) -> ApiResult<DatabaseObject> {
        let value = self
            .request(Method::GET, &format!("/databases/{database_id}"), None)
            .await?;
        DatabaseObject::from_value(&value)
    }

    async fn query_database(
        &self,
        database_id: &str,
        updated_on_or_after: Option<&str>,
        cursor: Option<String>,
    ) -> ApiResult<Paginated<PageObject>> {
        let mut body = Map::new();
        if let Some(since) = updated_on_or_after {
            body.insert(
                "filter".into(),
                json!({
                    "timestamp": "last_edited_time",
                    "last_edited_time": { "on_or_after": since },
                }),
            );
        }
        let value = self
            .request(
                Method::POST,
                &format!("/databases/{database_id}/query"),
                Some(with_cursor(body, cursor)),
            )
            .await?;
        Paginated::from_value(&value, PageObject::from_value)
    }

    async fn retrieve_page(&self, page_id: &str) -> ApiResult<PageObject> {
        let value = self
            .request(Method::GET, &format!("/pages/{page_id}"), None)
            .await?;
        PageObject::from_value(&value)
    }

    async fn list_children(
        &self,
        block_id: &str,
        cursor: Option<String>,
    ) -> ApiResult<Paginated<Block>> {
        let path = cursor_query(&format!("/blocks/{block_id}/children"), cursor);
        let value = self.request(Method::GET, &path, None).await?;
        Paginated::from_value(&value, |v| Ok(Block::from_value(v)))
    }

    async fn append_children(&self, block_id: &str, children: &[Block]) -> ApiResult<()> {
        let children: Vec<Value> = children.iter().map(Block::to_value).collect();
        self.request(
            Method::PATCH,
            &format!("/blocks/{block_id}/children"),
            Some(json!({ "children": children })),
        )
        .await?;
        Ok(())
    }

    async fn delete_block(&self, block_id: &str) -> ApiResult<()> {
        self.request(Method::DELETE, &format!("/blocks/{block_id}"), None)
            .await?;
        Ok(())
    }
}
