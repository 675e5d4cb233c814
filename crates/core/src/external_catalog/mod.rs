//! Remote movie catalog integration.
//!
//! The catalog is a TMDB-shaped REST API: an empty search term lists
//! popular movies, anything else runs a title search.

mod tmdb;
mod types;

pub use tmdb::TmdbClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Message shown to the user for any transport or HTTP failure.
pub const GENERIC_FETCH_ERROR: &str = "Error displaying movies at the moment. Try again later!";

/// Message shown when the API rejects a request without saying why.
pub const DEFAULT_REJECTION_MESSAGE: &str = "Failed to fetch movies";

/// Errors that can occur when querying the movie catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// API answered with a success status but an error payload.
    #[error("API rejected request: {0}")]
    Rejected(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl CatalogError {
    /// Text to display in place of the movie list.
    ///
    /// Only API-reported rejections carry their own wording; every other
    /// failure collapses to the generic message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) => message.clone(),
            _ => GENERIC_FETCH_ERROR.to_string(),
        }
    }
}

/// Trait for movie catalog clients.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Fetch one page of movies for the query, in catalog order.
    async fn fetch_movies(&self, query: &MovieQuery) -> Result<Vec<Movie>, CatalogError>;
}
