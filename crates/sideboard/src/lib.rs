#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Sideboard
//!
//! Data source adapter that serves rows to [`tabletop`] stores.
//!
//! A [`DataSource`] performs a single GET of a remote JSON document, decodes
//! it as a list of todo records, and normalizes each record into a [`Todo`]
//! row with a string identifier. Any transport, status, or decode failure is
//! logged and degrades to an empty row list — the caller never sees an
//! error, only an empty table.
//!
//! # Example
//!
//! ```rust
//! use sideboard::DataSource;
//!
//! let source = DataSource::with_url("https://example.com/rows.json");
//! assert_eq!(source.url(), "https://example.com/rows.json");
//! ```

use serde::Deserialize;
use tabletop::{Row, SortValue};
use thiserror::Error;
use tracing::error;

/// Default remote dataset: a static JSON todo list.
pub const DEFAULT_DATA_URL: &str = "https://gist.githubusercontent.com/hperrin/e24a4ebd9afdf2a8c283338ae5160a62/raw/dcbf8e6382db49b0dcab70b22f56b1cc444f26d4/todos.json";

/// Error fetching or decoding the remote dataset.
///
/// Internal to the adapter: [`DataSource::fetch_data`] logs it and returns
/// an empty list instead of propagating.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request failed or returned an error status.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response body was not a valid row list.
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Wire format of one record in the remote document.
#[derive(Debug, Deserialize)]
struct TodoRecord {
    id: u64,
    title: String,
    #[serde(default)]
    completed: bool,
    #[serde(rename = "userId", default)]
    user_id: u64,
}

/// One todo row, with the identifier re-keyed to a string.
#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    /// Unique identifier (numeric in the source document).
    pub id: String,
    /// Title, used for filtering.
    pub title: String,
    /// Completion flag.
    pub completed: bool,
    /// Owner of the todo in the source document.
    pub user_id: u64,
}

impl From<TodoRecord> for Todo {
    fn from(record: TodoRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title,
            completed: record.completed,
            user_id: record.user_id,
        }
    }
}

impl Row for Todo {
    fn id(&self) -> &str {
        &self.id
    }

    fn filter_value(&self) -> &str {
        &self.title
    }

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "id" => Some(SortValue::Text(self.id.clone())),
            "title" => Some(SortValue::Text(self.title.clone())),
            "completed" => Some(SortValue::Number(f64::from(u8::from(self.completed)))),
            "userId" | "user_id" => Some(SortValue::Number(self.user_id as f64)),
            _ => None,
        }
    }
}

/// Fetches the row list from a fixed remote resource.
///
/// One GET per call — no retries, no caching, and no client-side timeout;
/// callers that need a deadline wrap the future themselves.
#[derive(Debug, Clone)]
pub struct DataSource {
    client: reqwest::Client,
    url: String,
}

impl Default for DataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource {
    /// Creates a source reading [`DEFAULT_DATA_URL`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_url(DEFAULT_DATA_URL)
    }

    /// Creates a source reading the given URL.
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Returns the configured URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches and normalizes the row list.
    ///
    /// Failures are logged and yield an empty list; callers cannot
    /// distinguish "no rows" from "load failed" here.
    pub async fn fetch_data(&self) -> Vec<Todo> {
        match self.try_fetch().await {
            Ok(rows) => rows,
            Err(err) => {
                error!(url = %self.url, %err, "fetch failed");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self) -> Result<Vec<Todo>, FetchError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_rows(&body)
    }
}

/// Decodes a JSON array of wire records into normalized rows.
fn parse_rows(body: &str) -> Result<Vec<Todo>, FetchError> {
    let records: Vec<TodoRecord> = serde_json::from_str(body)?;
    Ok(records.into_iter().map(Todo::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows_normalizes_ids_to_strings() {
        let body = r#"[
            {"id": 1, "title": "Buy milk", "completed": false, "userId": 7},
            {"id": 2, "title": "Walk dog", "completed": true, "userId": 7}
        ]"#;
        let rows = parse_rows(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "1");
        assert_eq!(rows[0].title, "Buy milk");
        assert_eq!(rows[1].id, "2");
        assert!(rows[1].completed);
        assert_eq!(rows[1].user_id, 7);
    }

    #[test]
    fn test_parse_rows_tolerates_missing_optional_fields() {
        let body = r#"[{"id": 3, "title": "Water plants"}]"#;
        let rows = parse_rows(body).unwrap();
        assert!(!rows[0].completed);
        assert_eq!(rows[0].user_id, 0);
    }

    #[test]
    fn test_parse_rows_rejects_malformed_documents() {
        assert!(matches!(
            parse_rows("not json"),
            Err(FetchError::Decode(_))
        ));
        assert!(matches!(
            parse_rows(r#"{"id": 1}"#),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_todo_row_contract() {
        let todo = Todo {
            id: "42".into(),
            title: "Buy milk".into(),
            completed: true,
            user_id: 9,
        };
        assert_eq!(todo.id(), "42");
        assert_eq!(todo.filter_value(), "Buy milk");
        assert_eq!(todo.sort_value("id"), Some(SortValue::Text("42".into())));
        assert_eq!(
            todo.sort_value("title"),
            Some(SortValue::Text("Buy milk".into()))
        );
        assert_eq!(todo.sort_value("completed"), Some(SortValue::Number(1.0)));
        assert_eq!(todo.sort_value("userId"), Some(SortValue::Number(9.0)));
        assert_eq!(todo.sort_value("unknown"), None);
    }

    #[tokio::test]
    async fn test_fetch_data_degrades_to_empty_on_bad_url() {
        let source = DataSource::with_url("not a url");
        assert!(source.fetch_data().await.is_empty());
    }
}
