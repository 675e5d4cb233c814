//! TMDB (The Movie Database) API client.
//!
//! Authenticates with a v4 bearer token. The token is whatever the caller
//! injected through [`CatalogConfig`]; an empty token is sent as-is and the
//! API answers 401.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{debug, warn};

use super::types::{Movie, MovieQuery};
use super::{CatalogError, MovieCatalog, DEFAULT_REJECTION_MESSAGE};
use crate::config::CatalogConfig;
use crate::metrics::{CATALOG_REQUESTS, CATALOG_REQUEST_DURATION};

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            warn!("No catalog API key configured, catalog requests will be rejected");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Popular movies, most popular first.
    pub async fn discover_movies(&self) -> Result<Vec<Movie>, CatalogError> {
        let url = format!("{}/discover/movie", self.base_url);

        debug!("TMDB discover: sort_by=popularity.desc");

        let request = self
            .client
            .get(&url)
            .query(&[("sort_by", "popularity.desc")]);

        self.send_list(request).await
    }

    /// Search for movies by title.
    pub async fn search_movies(&self, query: &str) -> Result<Vec<Movie>, CatalogError> {
        let url = format!("{}/search/movie", self.base_url);

        debug!("TMDB movie search: query='{}'", query);

        let request = self.client.get(&url).query(&[("query", query)]);

        self.send_list(request).await
    }

    async fn send_list(&self, request: reqwest::RequestBuilder) -> Result<Vec<Movie>, CatalogError> {
        let response = request
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TmdbStatusResponse>(&body)
                .ok()
                .and_then(|s| s.status_message)
                .unwrap_or(body);
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let list: TmdbListResponse = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse movie list response: {}", e))
        })?;

        if list.response.as_deref() == Some("False") {
            return Err(CatalogError::Rejected(
                list.error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string()),
            ));
        }

        Ok(list
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.into())
            .collect())
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn fetch_movies(&self, query: &MovieQuery) -> Result<Vec<Movie>, CatalogError> {
        let endpoint = query.endpoint();
        let started = Instant::now();

        let result = match query {
            MovieQuery::Discover => self.discover_movies().await,
            MovieQuery::Search(term) => self.search_movies(term).await,
        };

        CATALOG_REQUEST_DURATION
            .with_label_values(&[endpoint])
            .observe(started.elapsed().as_secs_f64());
        let outcome = match &result {
            Ok(_) => "success",
            Err(CatalogError::Rejected(_)) => "rejected",
            Err(_) => "error",
        };
        CATALOG_REQUESTS
            .with_label_values(&[endpoint, outcome])
            .inc();

        result
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbListResponse {
    /// Present (as "False") only on the logical error shape.
    #[serde(rename = "Response", default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    results: Option<Vec<TmdbMovieResult>>,
}

#[derive(Debug, Deserialize)]
struct TmdbStatusResponse {
    status_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieResult {
    id: u64,
    title: String,
    poster_path: Option<String>,
    popularity: Option<f64>,
    vote_average: Option<f32>,
    original_language: Option<String>,
    release_date: Option<String>,
}

impl From<TmdbMovieResult> for Movie {
    fn from(r: TmdbMovieResult) -> Self {
        Self {
            id: r.id,
            title: r.title,
            poster_path: r.poster_path,
            popularity: r.popularity.unwrap_or_default(),
            vote_average: r.vote_average,
            original_language: r.original_language,
            release_date: r.release_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::{HeaderMap, StatusCode, Uri},
        response::IntoResponse,
        Json, Router,
    };
    use serde_json::{json, Value};

    /// A request as seen by the fake catalog.
    #[derive(Debug, Clone)]
    struct SeenRequest {
        path: String,
        raw_query: String,
        params: HashMap<String, String>,
        authorization: Option<String>,
        accept: Option<String>,
    }

    #[derive(Clone)]
    struct FakeCatalog {
        status: StatusCode,
        body: Value,
        seen: Arc<Mutex<Vec<SeenRequest>>>,
    }

    async fn fake_handler(
        State(fake): State<FakeCatalog>,
        uri: Uri,
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        let header_value = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        fake.seen.lock().unwrap().push(SeenRequest {
            path: uri.path().to_string(),
            raw_query: uri.query().unwrap_or_default().to_string(),
            params,
            authorization: header_value(header::AUTHORIZATION),
            accept: header_value(header::ACCEPT),
        });
        (fake.status, Json(fake.body.clone()))
    }

    /// Serve a canned response and return a client pointed at it.
    async fn fake_catalog(
        status: StatusCode,
        body: Value,
    ) -> (TmdbClient, Arc<Mutex<Vec<SeenRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(fake_handler).with_state(FakeCatalog {
            status,
            body,
            seen: Arc::clone(&seen),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = TmdbClient::new(&CatalogConfig {
            api_key: "test-token".to_string(),
            base_url: format!("http://{}/", addr),
            ..Default::default()
        })
        .unwrap();

        (client, seen)
    }

    fn two_results() -> Value {
        json!({
            "page": 1,
            "results": [
                {
                    "id": 268,
                    "title": "Batman",
                    "poster_path": "/batman.jpg",
                    "popularity": 45.1,
                    "vote_average": 7.2,
                    "original_language": "en",
                    "release_date": "1989-06-23"
                },
                {
                    "id": 414906,
                    "title": "The Batman",
                    "poster_path": null,
                    "popularity": 99.5
                }
            ],
            "total_pages": 1
        })
    }

    #[tokio::test]
    async fn test_empty_query_hits_discover_endpoint() {
        let (client, seen) = fake_catalog(StatusCode::OK, two_results()).await;

        let movies = client.fetch_movies(&MovieQuery::Discover).await.unwrap();
        assert_eq!(movies.len(), 2);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].path, "/discover/movie");
        assert_eq!(
            seen[0].params.get("sort_by").map(String::as_str),
            Some("popularity.desc")
        );
        assert_eq!(seen[0].authorization.as_deref(), Some("Bearer test-token"));
        assert_eq!(seen[0].accept.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_search_term_is_url_encoded() {
        let (client, seen) = fake_catalog(StatusCode::OK, two_results()).await;

        client
            .fetch_movies(&MovieQuery::from_term("the dark knight & co"))
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].path, "/search/movie");
        assert_eq!(
            seen[0].params.get("query").map(String::as_str),
            Some("the dark knight & co")
        );
        assert!(!seen[0].raw_query.contains(' '));
        assert!(!seen[0].raw_query.contains("& co"));
    }

    #[tokio::test]
    async fn test_results_keep_catalog_order() {
        let (client, _) = fake_catalog(StatusCode::OK, two_results()).await;

        let movies = client.search_movies("bat").await.unwrap();
        assert_eq!(movies[0].id, 268);
        assert_eq!(movies[0].title, "Batman");
        assert_eq!(movies[0].year(), Some(1989));
        assert_eq!(movies[0].original_language.as_deref(), Some("en"));
        assert_eq!(movies[1].id, 414906);
        assert!(movies[1].poster_path.is_none());
        assert_eq!(movies[1].popularity, 99.5);
    }

    #[tokio::test]
    async fn test_missing_results_is_empty_list() {
        let (client, _) = fake_catalog(StatusCode::OK, json!({ "page": 1 })).await;

        let movies = client.discover_movies().await.unwrap();
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn test_error_payload_is_rejection() {
        let (client, _) = fake_catalog(
            StatusCode::OK,
            json!({ "Response": "False", "error": "Invalid API key" }),
        )
        .await;

        let err = client.search_movies("bat").await.unwrap_err();
        assert!(matches!(err, CatalogError::Rejected(ref m) if m == "Invalid API key"));
        assert_eq!(err.user_message(), "Invalid API key");
    }

    #[tokio::test]
    async fn test_error_payload_without_message() {
        let (client, _) = fake_catalog(StatusCode::OK, json!({ "Response": "False" })).await;

        let err = client.search_movies("bat").await.unwrap_err();
        assert_eq!(err.user_message(), DEFAULT_REJECTION_MESSAGE);
    }

    #[tokio::test]
    async fn test_http_failure_is_api_error() {
        let (client, _) = fake_catalog(
            StatusCode::UNAUTHORIZED,
            json!({ "status_code": 7, "status_message": "Invalid API key: You must be granted a valid key." }),
        )
        .await;

        let err = client.discover_movies().await.unwrap_err();
        match &err {
            CatalogError::ApiError { status, message } => {
                assert_eq!(*status, 401);
                assert!(message.starts_with("Invalid API key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.user_message(), super::super::GENERIC_FETCH_ERROR);
    }

    #[tokio::test]
    async fn test_transport_failure_is_http_error() {
        // Bind then drop to get a port with nothing listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = TmdbClient::new(&CatalogConfig {
            base_url: format!("http://{}", addr),
            ..Default::default()
        })
        .unwrap();

        let err = client.discover_movies().await.unwrap_err();
        assert!(matches!(err, CatalogError::HttpError(_)));
    }
}
