//! Appwrite document database trending store.
//!
//! Each search term is one document in a collection:
//! `{ searchTerm, count, movie_id, title, poster_url }`.
//! Incrementing is read-then-write: look the term up, then patch its count
//! or create the document. Two concurrent first searches for the same term
//! can therefore create two documents; the hosted store offers no upsert.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::{stored_poster_url, TrendingEntry, TrendingError, TrendingStore};
use crate::config::AppwriteConfig;
use crate::external_catalog::Movie;

/// Appwrite REST client scoped to one collection.
pub struct AppwriteTrendingStore {
    client: Client,
    documents_url: String,
    project_id: String,
    api_key: String,
    image_base_url: String,
}

impl AppwriteTrendingStore {
    /// Create a new Appwrite store.
    pub fn new(config: &AppwriteConfig) -> Result<Self, TrendingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let documents_url = format!(
            "{}/databases/{}/collections/{}/documents",
            config.endpoint.trim_end_matches('/'),
            urlencoding::encode(&config.database_id),
            urlencoding::encode(&config.collection_id),
        );

        Ok(Self {
            client,
            documents_url,
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
            image_base_url: config.image_base_url.clone(),
        })
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
    }

    async fn list_documents(&self, queries: &[String]) -> Result<Vec<SearchDocument>, TrendingError> {
        let params: Vec<(&str, &str)> = queries.iter().map(|q| ("queries[]", q.as_str())).collect();

        let response = self
            .request(Method::GET, &self.documents_url)
            .query(&params)
            .send()
            .await?;
        let response = check_status(response).await?;

        let list: DocumentList = response
            .json()
            .await
            .map_err(|e| TrendingError::ParseError(format!("Failed to parse document list: {}", e)))?;

        Ok(list.documents)
    }
}

#[async_trait]
impl TrendingStore for AppwriteTrendingStore {
    async fn increment_search_count(
        &self,
        term: &str,
        movie: &Movie,
    ) -> Result<(), TrendingError> {
        let existing = self
            .list_documents(&[equal_query("searchTerm", term)])
            .await?;

        match existing.into_iter().next() {
            Some(doc) => {
                debug!("Appwrite: bumping '{}' to {}", term, doc.count + 1);
                let url = format!("{}/{}", self.documents_url, urlencoding::encode(&doc.id));
                let response = self
                    .request(Method::PATCH, &url)
                    .json(&json!({ "data": { "count": doc.count + 1 } }))
                    .send()
                    .await?;
                check_status(response).await?;
            }
            None => {
                debug!("Appwrite: creating entry for '{}'", term);
                let data = NewSearchDocument {
                    search_term: term,
                    count: 1,
                    movie_id: movie.id,
                    title: &movie.title,
                    poster_url: stored_poster_url(movie, &self.image_base_url),
                };
                let response = self
                    .request(Method::POST, &self.documents_url)
                    .json(&json!({ "documentId": "unique()", "data": data }))
                    .send()
                    .await?;
                check_status(response).await?;
            }
        }

        Ok(())
    }

    async fn list_top_trending(&self, limit: u32) -> Result<Vec<TrendingEntry>, TrendingError> {
        let docs = self
            .list_documents(&[order_desc_query("count"), limit_query(limit)])
            .await?;

        Ok(docs.into_iter().map(|d| d.into()).collect())
    }
}

async fn check_status(response: Response) -> Result<Response, TrendingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<AppwriteErrorBody>(&body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or(body);
    Err(TrendingError::ApiError {
        status: status.as_u16(),
        message,
    })
}

// ============================================================================
// Query builders (Appwrite 1.5+ JSON query syntax)
// ============================================================================

fn equal_query(attribute: &str, value: &str) -> String {
    json!({ "method": "equal", "attribute": attribute, "values": [value] }).to_string()
}

fn order_desc_query(attribute: &str) -> String {
    json!({ "method": "orderDesc", "attribute": attribute }).to_string()
}

fn limit_query(limit: u32) -> String {
    json!({ "method": "limit", "values": [limit] }).to_string()
}

// ============================================================================
// Appwrite API Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<SearchDocument>,
}

#[derive(Debug, Deserialize)]
struct SearchDocument {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "searchTerm")]
    search_term: String,
    #[serde(default)]
    count: u64,
    #[serde(default)]
    movie_id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    poster_url: String,
}

#[derive(Debug, Serialize)]
struct NewSearchDocument<'a> {
    #[serde(rename = "searchTerm")]
    search_term: &'a str,
    count: u64,
    movie_id: u64,
    title: &'a str,
    poster_url: String,
}

#[derive(Debug, Deserialize)]
struct AppwriteErrorBody {
    message: Option<String>,
}

impl From<SearchDocument> for TrendingEntry {
    fn from(d: SearchDocument) -> Self {
        // Older documents may lack a title; fall back to the term itself
        let title = if d.title.is_empty() {
            d.search_term.clone()
        } else {
            d.title
        };
        Self {
            id: d.id,
            search_term: d.search_term,
            title,
            movie_id: d.movie_id,
            poster_url: d.poster_url,
            search_count: d.count,
        }
    }
}
