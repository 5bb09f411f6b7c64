//! Typed views over remote API objects.

use crate::error::{ApiError, ApiResult};
use serde_json::Value;
use std::collections::BTreeMap;

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Default)]
pub struct Paginated<T> {
    /// Items in this page.
    pub results: Vec<T>,
    /// Whether more pages follow.
    pub has_more: bool,
    /// Cursor for the next page, when more pages follow.
    pub next_cursor: Option<String>,
}

impl<T> Paginated<T> {
    /// Creates a single-page result with no continuation.
    pub fn single(results: Vec<T>) -> Self {
        Self {
            results,
            has_more: false,
            next_cursor: None,
        }
    }

    /// Parses a paginated envelope, converting each result with `convert`.
    pub(crate) fn from_value(value: &Value, convert: impl Fn(&Value) -> ApiResult<T>) -> ApiResult<Self> {
        let results = value
            .get("results")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(&convert).collect::<ApiResult<Vec<T>>>())
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            results,
            has_more: value
                .get("has_more")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            next_cursor: value
                .get("next_cursor")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// A database object: title, schema, raw payload.
#[derive(Debug, Clone, Default)]
pub struct DatabaseObject {
    /// Opaque database id.
    pub id: String,
    /// Concatenated plain text of the database title.
    pub title: String,
    /// Property name to property type.
    pub properties: BTreeMap<String, String>,
    /// The raw remote payload, for inspection commands.
    pub raw: Value,
}

impl DatabaseObject {
    /// Parses a database object from its remote JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidResponse`] when the id is missing.
    pub fn from_value(value: &Value) -> ApiResult<Self> {
        let id = require_id(value, "database")?;
        let title = value
            .get("title")
            .map(plain_text_of)
            .unwrap_or_default();
        let properties = value
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(name, prop)| {
                        let kind = prop
                            .get("type")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string();
                        (name.clone(), kind)
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self {
            id,
            title,
            properties,
            raw: value.clone(),
        })
    }

    /// Returns the name of the title-typed property, when the schema has
    /// one.
    pub fn title_property(&self) -> Option<&str> {
        self.properties
            .iter()
            .find(|(_, kind)| kind.as_str() == "title")
            .map(|(name, _)| name.as_str())
    }
}

/// A page object: identity, modification instant, properties.
#[derive(Debug, Clone, Default)]
pub struct PageObject {
    /// Opaque page id.
    pub id: String,
    /// Remote last-modified instant, RFC 3339.
    pub last_edited_time: String,
    /// Canonical remote URL.
    pub url: String,
    /// Raw properties map.
    pub properties: Value,
    /// The raw remote payload, for inspection commands.
    pub raw: Value,
}

impl PageObject {
    /// Parses a page object from its remote JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidResponse`] when the id is missing.
    pub fn from_value(value: &Value) -> ApiResult<Self> {
        let id = require_id(value, "page")?;
        Ok(Self {
            id,
            last_edited_time: value
                .get("last_edited_time")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            url: value
                .get("url")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            properties: value.get("properties").cloned().unwrap_or(Value::Null),
            raw: value.clone(),
        })
    }

    /// Extracts the page title through the database's title property key.
    ///
    /// Returns `None` when the property is absent or empty.
    pub fn title(&self, title_key: &str) -> Option<String> {
        let spans = self.properties.get(title_key)?.get("title")?;
        let spans = spans.as_array()?;
        if spans.is_empty() {
            return None;
        }
        Some(plain_text_of(&Value::Array(spans.clone())))
    }
}

/// A minimal search hit.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Object id.
    pub id: String,
    /// Object kind (`page` or `database`).
    pub object: String,
}

impl SearchResult {
    /// Parses a search hit from its remote JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidResponse`] when the id is missing.
    pub fn from_value(value: &Value) -> ApiResult<Self> {
        Ok(Self {
            id: require_id(value, "search result")?,
            object: value
                .get("object")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

fn require_id(value: &Value, what: &str) -> ApiResult<String> {
    value
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ApiError::InvalidResponse(format!("{what} object without id")))
}

/// Concatenates the `plain_text` fields of a rich-text array.
fn plain_text_of(value: &Value) -> String {
    value
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|t| t.get("plain_text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn database_title_and_schema() {
        let value = json!({
            "id": "db1",
            "title": [{ "plain_text": "Tasks" }, { "plain_text": " 2024" }],
            "properties": {
                "Name": { "type": "title" },
                "Done": { "type": "checkbox" },
            },
        });
        let db = DatabaseObject::from_value(&value).unwrap();
        assert_eq!(db.title, "Tasks 2024");
        assert_eq!(db.title_property(), Some("Name"));
        assert_eq!(db.properties["Done"], "checkbox");
    }

    #[test]
    fn database_without_title_property() {
        let value = json!({ "id": "db1", "properties": { "N": { "type": "number" } } });
        let db = DatabaseObject::from_value(&value).unwrap();
        assert_eq!(db.title_property(), None);
    }

    #[test]
    fn missing_id_is_invalid() {
        assert!(matches!(
            DatabaseObject::from_value(&json!({})),
            Err(ApiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn page_title_through_key() {
        let value = json!({
            "id": "p1",
            "last_edited_time": "2024-05-01T10:00:00.000Z",
            "url": "https://notion.so/p1",
            "properties": {
                "Name": { "title": [{ "plain_text": "My" }, { "plain_text": " page" }] },
            },
        });
        let page = PageObject::from_value(&value).unwrap();
        assert_eq!(page.title("Name").as_deref(), Some("My page"));
        assert_eq!(page.title("Other"), None);
    }

    #[test]
    fn empty_title_array_is_none() {
        let value = json!({ "id": "p1", "properties": { "Name": { "title": [] } } });
        let page = PageObject::from_value(&value).unwrap();
        assert_eq!(page.title("Name"), None);
    }

    #[test]
    fn paginated_envelope() {
        let value = json!({
            "results": [{ "id": "a", "object": "page" }],
            "has_more": true,
            "next_cursor": "c2",
        });
        let page = Paginated::from_value(&value, SearchResult::from_value).unwrap();
        assert_eq!(page.results.len(), 1);
        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("c2"));
    }
}
