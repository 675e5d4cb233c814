//! Mock movie catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::external_catalog::{CatalogError, Movie, MovieCatalog, MovieQuery};

/// Canned answer for one query.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Successful response with these results.
    Movies(Vec<Movie>),
    /// Success status, but the body carries an error payload.
    Rejected(String),
    /// Non-success HTTP status.
    HttpStatus(u16),
}

/// Mock implementation of the MovieCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Canned responses per query (unknown queries return no movies)
/// - Per-query latency, so out-of-order responses can be staged
/// - Query recording for assertions
///
/// # Example
///
/// ```rust,ignore
/// use moviescout_core::testing::{fixtures, MockMovieCatalog, MockResponse};
///
/// let catalog = MockMovieCatalog::new();
/// catalog
///     .set_response(MovieQuery::from_term("bat"), MockResponse::Movies(fixtures::movies(2)))
///     .await;
/// ```
#[derive(Debug)]
pub struct MockMovieCatalog {
    responses: Arc<RwLock<HashMap<MovieQuery, MockResponse>>>,
    delays: Arc<RwLock<HashMap<MovieQuery, Duration>>>,
    queries: Arc<RwLock<Vec<MovieQuery>>>,
}

impl Default for MockMovieCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMovieCatalog {
    /// Create a new mock catalog with no canned responses.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            delays: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the answer for a query.
    pub async fn set_response(&self, query: MovieQuery, response: MockResponse) {
        self.responses.write().await.insert(query, response);
    }

    /// Delay the answer for a query.
    pub async fn set_delay(&self, query: MovieQuery, delay: Duration) {
        self.delays.write().await.insert(query, delay);
    }

    /// Get all recorded queries, in call order.
    pub async fn recorded_queries(&self) -> Vec<MovieQuery> {
        self.queries.read().await.clone()
    }

    /// Clear recorded queries.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
    }
}

#[async_trait]
impl MovieCatalog for MockMovieCatalog {
    async fn fetch_movies(&self, query: &MovieQuery) -> Result<Vec<Movie>, CatalogError> {
        self.queries.write().await.push(query.clone());

        let delay = self.delays.read().await.get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.read().await.get(query).cloned();
        match response {
            None => Ok(Vec::new()),
            Some(MockResponse::Movies(movies)) => Ok(movies),
            Some(MockResponse::Rejected(message)) => Err(CatalogError::Rejected(message)),
            Some(MockResponse::HttpStatus(status)) => Err(CatalogError::ApiError {
                status,
                message: "mock failure".to_string(),
            }),
        }
    }
}
