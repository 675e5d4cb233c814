//! Fetch controller: runs one catalog query and folds the outcome into the
//! movies section of the page.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::state::PageHandle;
use crate::external_catalog::{CatalogError, Movie, MovieCatalog, MovieQuery};
use crate::metrics::{result_label, STALE_RESPONSES_DISCARDED, TRENDING_OPERATIONS};
use crate::trending::TrendingStore;

/// What happened to one `search` call.
#[derive(Debug)]
pub struct SearchOutcome {
    /// Sequence number the request was tagged with.
    pub sequence: u64,
    /// False when the response was discarded as stale.
    pub applied: bool,
    /// Background trending report, if one was dispatched.
    pub trending_report: Option<JoinHandle<()>>,
}

/// Issues catalog searches for a page.
///
/// Requests are never cancelled. Each one is tagged with an increasing
/// sequence number; when `discard_stale` is set, a response that resolves
/// after a newer request was issued is dropped without touching the page.
/// Otherwise the last response to resolve wins.
pub struct SearchController {
    catalog: Arc<dyn MovieCatalog>,
    trending: Arc<dyn TrendingStore>,
    page: PageHandle,
    discard_stale: bool,
    latest: AtomicU64,
}

impl SearchController {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        trending: Arc<dyn TrendingStore>,
        page: PageHandle,
        discard_stale: bool,
    ) -> Self {
        Self {
            catalog,
            trending,
            page,
            discard_stale,
            latest: AtomicU64::new(0),
        }
    }

    /// Run one search. An empty query lists popular movies.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let sequence = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let movie_query = MovieQuery::from_term(query);

        debug!(
            "Search #{} via {} endpoint: '{}'",
            sequence,
            movie_query.endpoint(),
            query
        );

        self.page.update(|s| {
            s.movies.is_loading = true;
            s.movies.error_message = None;
        });

        let result = self.catalog.fetch_movies(&movie_query).await;

        if self.discard_stale && self.latest.load(Ordering::SeqCst) != sequence {
            debug!("Discarding stale response for search #{}", sequence);
            STALE_RESPONSES_DISCARDED.inc();
            return SearchOutcome {
                sequence,
                applied: false,
                trending_report: None,
            };
        }

        let top_result = match result {
            Ok(movies) => {
                info!("Search '{}' returned {} movies", query, movies.len());
                let top = movies.first().cloned();
                self.page.update(|s| {
                    s.movies.results = movies;
                    s.movies.error_message = None;
                    s.movies.is_loading = false;
                });
                top
            }
            Err(e) => {
                match &e {
                    CatalogError::Rejected(reason) => {
                        warn!("Catalog rejected search '{}': {}", query, reason)
                    }
                    _ => error!("Error fetching movies for '{}': {}", query, e),
                }
                let message = e.user_message();
                self.page.update(|s| {
                    s.movies.results.clear();
                    s.movies.error_message = Some(message);
                    s.movies.is_loading = false;
                });
                None
            }
        };

        let trending_report = match (movie_query, top_result) {
            (MovieQuery::Search(term), Some(movie)) => Some(self.report_search(term, movie)),
            _ => None,
        };

        SearchOutcome {
            sequence,
            applied: true,
            trending_report,
        }
    }

    /// Record the hit in the background; failures are only logged.
    fn report_search(&self, term: String, movie: Movie) -> JoinHandle<()> {
        let trending = Arc::clone(&self.trending);
        tokio::spawn(async move {
            let result = trending.increment_search_count(&term, &movie).await;
            TRENDING_OPERATIONS
                .with_label_values(&["increment", result_label(&result)])
                .inc();
            if let Err(e) = result {
                error!("Failed to update search count for '{}': {}", term, e);
            }
        })
    }
}
