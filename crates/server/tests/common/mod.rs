//! Common test utilities for API testing with mocks.
//!
//! Builds an in-process router with the catalog and trending store replaced
//! by mocks, so requests go through the real handlers without a network.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use moviescout_core::testing::{MockMovieCatalog, MockTrendingStore};
use moviescout_core::Config;
use moviescout_server::state::AppState;

/// Re-export fixtures for test convenience
pub use moviescout_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_health() {
///     let fixture = TestFixture::new();
///     let response = fixture.get("/api/v1/health").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog - configure search responses
    pub catalog: Arc<MockMovieCatalog>,
    /// Mock trending store - seed entries, inspect increments
    pub trending: Arc<MockTrendingStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with default config.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a test fixture with custom configuration.
    pub fn with_config(config: Config) -> Self {
        let catalog = Arc::new(MockMovieCatalog::new());
        let trending = Arc::new(MockTrendingStore::new());

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&catalog) as Arc<dyn moviescout_core::MovieCatalog>,
            Arc::clone(&trending) as Arc<dyn moviescout_core::TrendingStore>,
        ));

        let router = moviescout_server::api::create_router(state);

        Self {
            router,
            catalog,
            trending,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
