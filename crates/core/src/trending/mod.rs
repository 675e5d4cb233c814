//! Trending store - per-term search counters and a top-N leaderboard.
//!
//! Every successful non-empty search records its term together with the
//! first movie it returned. The leaderboard lists the most searched terms.

mod appwrite;
mod sqlite;
mod types;

pub use appwrite::AppwriteTrendingStore;
pub use sqlite::SqliteTrendingStore;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::external_catalog::{Movie, NO_POSTER_PLACEHOLDER};

/// Errors that can occur when talking to a trending store.
#[derive(Debug, Error)]
pub enum TrendingError {
    /// Local database error.
    #[error("Database error: {0}")]
    Database(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Remote store returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Trait for trending store backends.
#[async_trait]
pub trait TrendingStore: Send + Sync {
    /// Count one more search for `term`.
    ///
    /// The first time a term is seen, `movie` becomes the entry's
    /// representative title and poster. Later hits only bump the count.
    async fn increment_search_count(&self, term: &str, movie: &Movie)
        -> Result<(), TrendingError>;

    /// The `limit` most searched entries, highest count first.
    async fn list_top_trending(&self, limit: u32) -> Result<Vec<TrendingEntry>, TrendingError>;
}

/// Poster URL stored with a new entry.
pub(crate) fn stored_poster_url(movie: &Movie, image_base_url: &str) -> String {
    movie
        .poster_url(image_base_url)
        .unwrap_or_else(|| NO_POSTER_PLACEHOLDER.to_string())
}
