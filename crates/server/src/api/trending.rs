//! Trending leaderboard.

use axum::{extract::State, Json};
use std::sync::Arc;

use moviescout_core::discovery::{PageHandle, TrendingLoader};
use moviescout_core::render::{render_trending, SectionView, TrendingCard};

use crate::state::AppState;

/// Load the leaderboard and return the rendered trending section.
pub async fn list_trending(State(state): State<Arc<AppState>>) -> Json<SectionView<TrendingCard>> {
    let page = PageHandle::new();
    TrendingLoader::new(state.trending(), page.clone(), state.config().trending.limit)
        .load_trending()
        .await;

    Json(render_trending(&page.snapshot().trending))
}
