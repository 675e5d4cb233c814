//! End-to-end discovery flow: real TMDB client against an in-process fake
//! catalog, real SQLite trending store on disk.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::Query, routing::get, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::time::timeout;

use moviescout_core::render::{render_page, MovieCard, RenderOptions, SectionView};
use moviescout_core::{
    load_config_from_str, DiscoverySession, PageState, SessionOptions, SqliteTrendingStore,
    TmdbClient, TrendingStore,
};

#[derive(Deserialize)]
struct SearchParams {
    query: String,
}

async fn discover() -> Json<Value> {
    Json(json!({
        "results": [
            { "id": 1, "title": "Popular One", "poster_path": "/p1.jpg", "popularity": 99.0 },
            { "id": 2, "title": "Popular Two", "poster_path": null, "popularity": 50.0 }
        ]
    }))
}

async fn search(Query(params): Query<SearchParams>) -> Json<Value> {
    if params.query == "bat" {
        Json(json!({
            "results": [
                { "id": 268, "title": "Batman", "poster_path": "/bat.jpg",
                  "vote_average": 7.2, "original_language": "en", "release_date": "1989-06-23" },
                { "id": 414906, "title": "The Batman", "poster_path": "/thebat.jpg" }
            ]
        }))
    } else {
        Json(json!({ "results": [] }))
    }
}

async fn spawn_fake_catalog() -> String {
    let app = Router::new()
        .route("/3/discover/movie", get(discover))
        .route("/3/search/movie", get(search));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/3", addr)
}

async fn wait_until(
    session: &DiscoverySession,
    pred: impl Fn(&PageState) -> bool,
) -> PageState {
    let mut rx = session.subscribe();
    let state = timeout(Duration::from_secs(5), rx.wait_for(|s| pred(s)))
        .await
        .expect("page never reached the expected state")
        .unwrap()
        .clone();
    state
}

fn first_title(state: &PageState) -> Option<&str> {
    state.movies.results.first().map(|m| m.title.as_str())
}

fn movie_titles(view: &SectionView<MovieCard>) -> Vec<String> {
    view.items()
        .map(|items| items.iter().map(|c| c.title.clone()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_search_flow_counts_terms_in_sqlite() {
    let base_url = spawn_fake_catalog().await;
    let db_dir = TempDir::new().unwrap();
    let config = load_config_from_str(&format!(
        r#"
[catalog]
api_key = "token"
base_url = "{}"

[search]
debounce_ms = 50
"#,
        base_url
    ))
    .unwrap();

    let catalog = Arc::new(TmdbClient::new(&config.catalog).unwrap());
    let store = Arc::new(
        SqliteTrendingStore::new(&db_dir.path().join("t.db"), &config.catalog.image_base_url)
            .unwrap(),
    );
    let render_options = RenderOptions::from(&config);

    let session = DiscoverySession::start(
        catalog.clone(),
        store.clone(),
        SessionOptions::from(&config),
    );

    let mounted = wait_until(&session, |s| {
        !s.movies.is_loading && !s.trending.is_loading && s.movies.results.len() == 2
    })
    .await;
    let view = render_page(&mounted, &render_options);
    assert_eq!(movie_titles(&view.movies), vec!["Popular One", "Popular Two"]);
    assert!(matches!(view.trending, SectionView::Empty { .. }));

    for _ in 0..2 {
        session.input("b");
        session.input("ba");
        session.input("bat");
        let searched = wait_until(&session, |s| {
            s.search.debounced_term == "bat"
                && !s.movies.is_loading
                && first_title(s) == Some("Batman")
        })
        .await;
        assert_eq!(searched.movies.results.len(), 2);

        session.input("");
        wait_until(&session, |s| {
            s.search.debounced_term.is_empty()
                && !s.movies.is_loading
                && first_title(s) == Some("Popular One")
        })
        .await;
    }

    // Trending writes run in the background
    let mut entries = Vec::new();
    for _ in 0..50 {
        entries = store.list_top_trending(5).await.unwrap();
        if entries.first().map(|e| e.search_count) == Some(2) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].search_term, "bat");
    assert_eq!(entries[0].title, "Batman");
    assert_eq!(entries[0].movie_id, 268);
    assert_eq!(entries[0].search_count, 2);
    assert_eq!(
        entries[0].poster_url,
        "https://image.tmdb.org/t/p/w500/bat.jpg"
    );
}

#[tokio::test]
async fn test_unknown_title_renders_empty_message() {
    let base_url = spawn_fake_catalog().await;
    let config = load_config_from_str(&format!(
        "[catalog]\nbase_url = \"{}\"\n\n[search]\ndebounce_ms = 20\n",
        base_url
    ))
    .unwrap();
    let store = Arc::new(SqliteTrendingStore::in_memory(&config.catalog.image_base_url).unwrap());

    let session = DiscoverySession::start(
        Arc::new(TmdbClient::new(&config.catalog).unwrap()),
        store.clone(),
        SessionOptions::from(&config),
    );
    session.input("qwertyuiop");

    let state = wait_until(&session, |s| {
        s.search.debounced_term == "qwertyuiop"
            && !s.movies.is_loading
            && s.movies.results.is_empty()
    })
    .await;
    let view = render_page(&state, &RenderOptions::from(&config));

    assert_eq!(
        view.movies,
        SectionView::Empty {
            message: "No movies found. Try other title !".to_string()
        }
    );
    assert!(store.list_top_trending(5).await.unwrap().is_empty());
}
