//! One-shot movie search.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use moviescout_core::discovery::{PageHandle, SearchController};
use moviescout_core::render::{render_movies, MovieCard, SectionView};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MoviesParams {
    /// Empty or absent lists popular movies.
    #[serde(default)]
    pub query: String,
}

/// Run a single search and return the rendered movies section.
///
/// Failures render as the section's error branch, so this always answers
/// 200.
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MoviesParams>,
) -> Json<SectionView<MovieCard>> {
    let page = PageHandle::new();
    let controller = SearchController::new(
        state.catalog(),
        state.trending(),
        page.clone(),
        state.config().search.discard_stale_responses,
    );

    controller.search(&params.query).await;

    Json(render_movies(&page.snapshot().movies, &state.render_options()))
}
