//! Testing utilities and mock implementations.
//!
//! Mocks for the two external seams, the movie catalog and the trending
//! store, so the discovery flow can be exercised without a network.
//!
//! # Example
//!
//! ```rust,ignore
//! use moviescout_core::testing::{fixtures, MockMovieCatalog, MockTrendingStore};
//!
//! let catalog = MockMovieCatalog::new();
//! let trending = MockTrendingStore::new();
//! trending.set_entries(vec![fixtures::trending_entry("bat", "Batman", 3)]).await;
//! ```

mod mock_movie_catalog;
mod mock_trending_store;

pub use mock_movie_catalog::{MockMovieCatalog, MockResponse};
pub use mock_trending_store::{MockTrendingStore, RecordedIncrement};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::external_catalog::Movie;
    use crate::trending::TrendingEntry;

    /// Create a test movie with a poster at `/poster-{id}.jpg`.
    pub fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            poster_path: Some(format!("/poster-{}.jpg", id)),
            popularity: 100.0,
            vote_average: Some(7.2),
            original_language: Some("en".to_string()),
            release_date: Some("1989-06-23".to_string()),
        }
    }

    /// Create `count` distinct movies.
    pub fn movies(count: u64) -> Vec<Movie> {
        (1..=count)
            .map(|i| movie(i, &format!("Movie {}", i)))
            .collect()
    }

    /// Create a trending leaderboard row.
    pub fn trending_entry(term: &str, title: &str, count: u64) -> TrendingEntry {
        TrendingEntry {
            id: format!("doc-{}", term),
            search_term: term.to_string(),
            title: title.to_string(),
            movie_id: term.len() as u64,
            poster_url: format!("https://image.tmdb.org/t/p/w500/{}.jpg", term),
            search_count: count,
        }
    }
}
