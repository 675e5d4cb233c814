//! View models produced by the render layer.
//!
//! Display-ready data only: every string is already formatted and every
//! fallback already applied.

use serde::{Deserialize, Serialize};

/// One page section in exactly one of its four display states.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SectionView<T> {
    /// A request for this section is in flight.
    Loading,
    /// The last request failed.
    Error { message: String },
    /// Items to show, in display order.
    List { items: Vec<T> },
    /// Nothing to show.
    Empty { message: String },
}

impl<T> SectionView<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Items when the section is populated.
    pub fn items(&self) -> Option<&[T]> {
        match self {
            Self::List { items } => Some(items),
            _ => None,
        }
    }
}

/// A card in the "all movies" grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieCard {
    /// Catalog movie ID.
    pub key: u64,
    pub title: String,
    /// Absolute poster URL, or the no-poster placeholder.
    pub poster_url: String,
    /// Average vote with one decimal, or "N/A".
    pub rating: String,
    /// Original language code, or "N/A".
    pub language: String,
    /// Release year, or "N/A".
    pub year: String,
}

/// A row in the trending strip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingCard {
    /// Store document ID.
    pub key: String,
    /// 1-based position in the leaderboard.
    pub rank: usize,
    pub title: String,
    pub poster_url: String,
}

/// Everything the client draws.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageView {
    /// Raw input, echoed back into the search box.
    pub search_term: String,
    pub trending: SectionView<TrendingCard>,
    pub movies: SectionView<MovieCard>,
}

/// Inputs the renderer needs besides page state.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Prefix for relative poster paths.
    pub image_base_url: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            image_base_url: crate::config::CatalogConfig::default().image_base_url,
        }
    }
}

impl From<&crate::config::Config> for RenderOptions {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            image_base_url: config.catalog.image_base_url.clone(),
        }
    }
}
