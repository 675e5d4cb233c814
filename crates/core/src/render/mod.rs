//! Render layer: turns page state into display-ready view models.
//!
//! Each section shows exactly one branch, chosen by priority
//! loading > error > list > empty.

mod types;

pub use types::*;

use crate::discovery::{PageState, RequestState, TrendingState};
use crate::external_catalog::{Movie, NO_POSTER_PLACEHOLDER};
use crate::trending::TrendingEntry;

/// Shown when the trending list is empty.
pub const NO_TRENDING_MESSAGE: &str = "No Trending Movies Yet";

/// Shown when a search returned nothing.
pub const NO_MOVIES_MESSAGE: &str = "No movies found. Try other title !";

const NOT_AVAILABLE: &str = "N/A";

/// Render the whole page.
pub fn render_page(state: &PageState, options: &RenderOptions) -> PageView {
    PageView {
        search_term: state.search.raw_term.clone(),
        trending: render_trending(&state.trending),
        movies: render_movies(&state.movies, options),
    }
}

/// Render the "all movies" section.
pub fn render_movies(state: &RequestState, options: &RenderOptions) -> SectionView<MovieCard> {
    section(
        state.is_loading,
        state.error_message.as_deref(),
        &state.results,
        NO_MOVIES_MESSAGE,
        |movie| movie_card(movie, &options.image_base_url),
    )
}

/// Render the trending section.
pub fn render_trending(state: &TrendingState) -> SectionView<TrendingCard> {
    let mut rank = 0;
    section(
        state.is_loading,
        state.error_message.as_deref(),
        &state.entries,
        NO_TRENDING_MESSAGE,
        |entry| {
            rank += 1;
            trending_card(entry, rank)
        },
    )
}

fn section<S, T>(
    is_loading: bool,
    error_message: Option<&str>,
    items: &[S],
    empty_message: &str,
    render: impl FnMut(&S) -> T,
) -> SectionView<T> {
    if is_loading {
        SectionView::Loading
    } else if let Some(message) = error_message {
        SectionView::Error {
            message: message.to_string(),
        }
    } else if items.is_empty() {
        SectionView::Empty {
            message: empty_message.to_string(),
        }
    } else {
        SectionView::List {
            items: items.iter().map(render).collect(),
        }
    }
}

fn movie_card(movie: &Movie, image_base_url: &str) -> MovieCard {
    MovieCard {
        key: movie.id,
        title: movie.title.clone(),
        poster_url: movie
            .poster_url(image_base_url)
            .unwrap_or_else(|| NO_POSTER_PLACEHOLDER.to_string()),
        rating: movie
            .vote_average
            .filter(|v| *v > 0.0)
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        language: movie
            .original_language
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        year: movie
            .year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}

fn trending_card(entry: &TrendingEntry, rank: usize) -> TrendingCard {
    let poster_url = if entry.poster_url.is_empty() {
        NO_POSTER_PLACEHOLDER.to_string()
    } else {
        entry.poster_url.clone()
    };
    TrendingCard {
        key: entry.id.clone(),
        rank,
        title: entry.title.clone(),
        poster_url,
    }
}
