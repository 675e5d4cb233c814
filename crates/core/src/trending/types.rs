use serde::{Deserialize, Serialize};

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingEntry {
    /// Store-assigned document ID.
    pub id: String,
    /// The search term being counted.
    pub search_term: String,
    /// Title of the first movie the term returned.
    pub title: String,
    /// Catalog ID of that movie.
    pub movie_id: u64,
    /// Absolute poster URL (or the no-poster placeholder).
    pub poster_url: String,
    /// How many searches have been recorded for the term.
    pub search_count: u64,
}
