//! Trending loader: fills the trending section once when a page mounts.

use std::sync::Arc;

use tracing::{error, info};

use super::state::PageHandle;
use crate::metrics::{result_label, TRENDING_OPERATIONS};
use crate::trending::TrendingStore;

pub struct TrendingLoader {
    store: Arc<dyn TrendingStore>,
    page: PageHandle,
    limit: u32,
}

impl TrendingLoader {
    pub fn new(store: Arc<dyn TrendingStore>, page: PageHandle, limit: u32) -> Self {
        Self { store, page, limit }
    }

    /// Replace the trending list with the current leaderboard.
    ///
    /// A failed read is logged and leaves the list and the error slot
    /// untouched.
    pub async fn load_trending(&self) {
        self.page.update(|s| s.trending.is_loading = true);

        let result = self.store.list_top_trending(self.limit).await;
        TRENDING_OPERATIONS
            .with_label_values(&["list_top", result_label(&result)])
            .inc();

        match result {
            Ok(entries) => {
                info!("Loaded {} trending entries", entries.len());
                self.page.update(|s| {
                    s.trending.entries = entries;
                    s.trending.is_loading = false;
                });
            }
            Err(e) => {
                error!("Error fetching trending movies: {}", e);
                self.page.update(|s| s.trending.is_loading = false);
            }
        }
    }
}
