use axum::{middleware, routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::{handlers, middleware::metrics_middleware, movies, trending, ws};
use crate::state::AppState;

/// API and metrics routes only.
pub fn create_router(state: Arc<AppState>) -> Router {
    api_router(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}

/// API routes plus the static client, with SPA fallback to `index.html`.
pub fn create_router_with_static(state: Arc<AppState>, static_dir: &Path) -> Router {
    let index_path = static_dir.join("index.html");
    let serve_dir = ServeDir::new(static_dir).fallback(ServeFile::new(index_path));

    api_router(state)
        .fallback_service(serve_dir)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}

fn api_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Discovery
        .route("/movies", get(movies::search_movies))
        .route("/trending", get(trending::list_trending))
        .route("/ws", get(ws::ws_handler))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(CorsLayer::permissive())
}
