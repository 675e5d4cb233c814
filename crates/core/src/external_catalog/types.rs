//! Types for movie catalog results.

use serde::{Deserialize, Serialize};

/// Placeholder shown when a movie has no poster.
pub const NO_POSTER_PLACEHOLDER: &str = "/no-movie.png";

/// A movie as returned by the catalog.
///
/// Immutable snapshot; nothing in the service mutates a movie after it has
/// been fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Catalog movie ID.
    pub id: u64,
    /// Movie title.
    pub title: String,
    /// Poster path (relative to the image base URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    /// Catalog popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Average vote (0-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f32>,
    /// ISO 639-1 language code of the original release.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl Movie {
    /// Get the release year from the release date.
    pub fn year(&self) -> Option<u32> {
        self.release_date
            .as_ref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }

    /// Full poster URL, or `None` when the movie has no poster.
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}{}", image_base_url.trim_end_matches('/'), p))
    }
}

/// Which catalog endpoint a query resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MovieQuery {
    /// No search term: generally popular movies.
    Discover,
    /// Title search.
    Search(String),
}

impl MovieQuery {
    /// An empty term means discover; anything else is searched verbatim.
    pub fn from_term(term: &str) -> Self {
        if term.is_empty() {
            Self::Discover
        } else {
            Self::Search(term.to_string())
        }
    }

    /// Endpoint label used in logs and metrics.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Discover => "discover",
            Self::Search(_) => "search",
        }
    }

    /// The search term, if any.
    pub fn term(&self) -> Option<&str> {
        match self {
            Self::Discover => None,
            Self::Search(term) => Some(term),
        }
    }
}
