//! One user's discovery session: keystroke → debounce → fetch → page.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use super::controller::SearchController;
use super::debounce::Debouncer;
use super::state::{PageHandle, PageState};
use super::trending_loader::TrendingLoader;
use crate::config::Config;
use crate::external_catalog::MovieCatalog;
use crate::trending::TrendingStore;

/// Session tuning, usually taken from [`Config`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub debounce: Duration,
    pub discard_stale_responses: bool,
    pub trending_limit: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            debounce: Duration::from_millis(config.search.debounce_ms),
            discard_stale_responses: config.search.discard_stale_responses,
            trending_limit: config.trending.limit,
        }
    }
}

/// A mounted discovery page.
///
/// Starting the session fetches popular movies and the trending list
/// independently. Afterwards every settled search term triggers one fetch.
/// Dropping the session cancels the debounce timer; fetches already in
/// flight run to completion.
pub struct DiscoverySession {
    page: PageHandle,
    debouncer: Debouncer,
    pump: JoinHandle<()>,
}

impl DiscoverySession {
    pub fn start(
        catalog: Arc<dyn MovieCatalog>,
        trending: Arc<dyn TrendingStore>,
        options: SessionOptions,
    ) -> Self {
        let page = PageHandle::new();
        let controller = Arc::new(SearchController::new(
            catalog,
            Arc::clone(&trending),
            page.clone(),
            options.discard_stale_responses,
        ));
        let loader = TrendingLoader::new(trending, page.clone(), options.trending_limit);

        tokio::spawn(async move { loader.load_trending().await });

        let mount = Arc::clone(&controller);
        tokio::spawn(async move {
            mount.search("").await;
        });

        let (debouncer, settled) = Debouncer::spawn(options.debounce, String::new());
        let pump = tokio::spawn(pump_settled_terms(settled, controller, page.clone()));

        Self {
            page,
            debouncer,
            pump,
        }
    }

    /// Record a keystroke.
    pub fn input(&self, term: &str) {
        self.page.update(|s| s.search.raw_term = term.to_string());
        self.debouncer.push(term);
    }

    /// Current page state.
    pub fn snapshot(&self) -> PageState {
        self.page.snapshot()
    }

    /// Notified after every page change.
    pub fn subscribe(&self) -> watch::Receiver<PageState> {
        self.page.subscribe()
    }
}

impl Drop for DiscoverySession {
    fn drop(&mut self) {
        self.debouncer.cancel();
        self.pump.abort();
    }
}

async fn pump_settled_terms(
    mut settled: watch::Receiver<String>,
    controller: Arc<SearchController>,
    page: PageHandle,
) {
    while settled.changed().await.is_ok() {
        let term = settled.borrow_and_update().clone();
        debug!("Search term settled: '{}'", term);
        page.update(|s| s.search.debounced_term = term.clone());

        let controller = Arc::clone(&controller);
        tokio::spawn(async move {
            controller.search(&term).await;
        });
    }
}
