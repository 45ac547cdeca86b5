//! Entity API content source.
//!
//! Talks to an entity-style HTTP API exposing `Memo` and `Resume`
//! collections: `GET {base}/entities/{Entity}?q=<json>&sort=<field>&limit=<n>`.

use portfolio_common::Diagnostics;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ContentError, Result};
use crate::repository::ContentRepository;
use crate::schema::{MemoRecord, Resume};

pub const MEMO_ENTITY: &str = "Memo";
pub const RESUME_ENTITY: &str = "Resume";

/// Newest first, as the entity API spells it.
pub const SORT_NEWEST_FIRST: &str = "-date_published";

/// Server-side list/filter parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityQuery {
    /// Equality predicate, e.g. `{"status": "Public"}`
    pub predicate: Option<Value>,
    /// Sort field, `-` prefix for descending
    pub sort: Option<String>,
    pub limit: Option<usize>,
}

impl EntityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, predicate: Value) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Repository backed by the remote entity API.
pub struct RemoteEntityRepository {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    diagnostics: Diagnostics,
}

impl RemoteEntityRepository {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::blocking::Client::new(),
            diagnostics: Diagnostics::disabled(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// URL for listing `entity` with the given query.
    pub fn entity_url(&self, entity: &str, query: &EntityQuery) -> Result<Url> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(predicate) = &query.predicate {
            params.push(("q", predicate.to_string()));
        }
        if let Some(sort) = &query.sort {
            params.push(("sort", sort.clone()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }

        let base = format!("{}/entities/{}", self.base_url, entity);
        let mut url = Url::parse(&base)
            .map_err(|e| ContentError::http(format!("Invalid API URL {}: {}", base, e)))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(&params);
        }
        Ok(url)
    }

    /// Fetch raw entity objects.
    pub fn list(&self, entity: &str, query: &EntityQuery) -> Result<Vec<Value>> {
        let url = self.entity_url(entity, query)?;

        let mut builder = self.client.get(url.clone()).header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            builder = builder.header("api_key", key);
        }

        let response = builder.send().map_err(|e| {
            self.diagnostics
                .log("content", "fetch_failed", &format!("{}: {}", url, e));
            ContentError::http(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ContentError::http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            self.diagnostics.log(
                "content",
                "fetch_failed",
                &format!("{} returned {}", url, status),
            );
            return Err(ContentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_entity_list(&body)
    }

    /// Fetch and deserialize, skipping records that do not fit `T`.
    fn list_as<T: DeserializeOwned>(&self, entity: &str, query: &EntityQuery) -> Result<Vec<T>> {
        let mut records = Vec::new();
        for value in self.list(entity, query)? {
            match serde_json::from_value::<T>(value) {
                Ok(record) => records.push(record),
                Err(e) => self.diagnostics.warn(
                    "content",
                    "record_skipped",
                    &format!("Failed to parse {} record: {}", entity, e),
                ),
            }
        }
        Ok(records)
    }
}

impl ContentRepository for RemoteEntityRepository {
    fn memos(&self) -> Result<Vec<MemoRecord>> {
        self.list_as(MEMO_ENTITY, &EntityQuery::new().sort(SORT_NEWEST_FIRST))
    }

    fn resume(&self) -> Result<Option<Resume>> {
        let resumes: Vec<Resume> = self.list_as(RESUME_ENTITY, &EntityQuery::new())?;
        Ok(resumes.into_iter().next())
    }

    fn memo_by_slug(&self, slug: &str) -> Result<Option<MemoRecord>> {
        let query = EntityQuery::new().filter(serde_json::json!({ "slug": slug }));
        let memos: Vec<MemoRecord> = self.list_as(MEMO_ENTITY, &query)?;
        Ok(memos.into_iter().find(|m| m.slug == slug))
    }
}

/// Accept a bare JSON array or an object wrapping one in `items`.
pub fn parse_entity_list(body: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(body)? {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ContentError::http("Response has no entity list")),
        },
        _ => Err(ContentError::http("Response has no entity list")),
    }
}
