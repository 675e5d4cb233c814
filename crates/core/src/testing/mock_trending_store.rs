//! Mock trending store for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::external_catalog::Movie;
use crate::trending::{TrendingEntry, TrendingError, TrendingStore};

/// A recorded increment for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedIncrement {
    pub term: String,
    pub movie: Movie,
}

/// Mock implementation of the TrendingStore trait.
///
/// Keeps entries in memory and counts increments the same way the real
/// backends do, so it can also serve as a throwaway store.
#[derive(Debug)]
pub struct MockTrendingStore {
    entries: Arc<RwLock<Vec<TrendingEntry>>>,
    increments: Arc<RwLock<Vec<RecordedIncrement>>>,
    limits: Arc<RwLock<Vec<u32>>>,
    list_delay: Arc<RwLock<Option<Duration>>>,
    fail_increments: Arc<RwLock<bool>>,
    fail_list: Arc<RwLock<bool>>,
}

impl Default for MockTrendingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTrendingStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            increments: Arc::new(RwLock::new(Vec::new())),
            limits: Arc::new(RwLock::new(Vec::new())),
            list_delay: Arc::new(RwLock::new(None)),
            fail_increments: Arc::new(RwLock::new(false)),
            fail_list: Arc::new(RwLock::new(false)),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Replace the stored entries.
    pub async fn set_entries(&self, entries: Vec<TrendingEntry>) {
        *self.entries.write().await = entries;
    }

    /// Delay every leaderboard read.
    pub async fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.write().await = Some(delay);
    }

    /// Make increments fail.
    pub async fn set_fail_increments(&self, fail: bool) {
        *self.fail_increments.write().await = fail;
    }

    /// Make leaderboard reads fail.
    pub async fn set_fail_list(&self, fail: bool) {
        *self.fail_list.write().await = fail;
    }

    // =========================================================================
    // Recording
    // =========================================================================

    /// Current entries, unsorted.
    pub async fn entries(&self) -> Vec<TrendingEntry> {
        self.entries.read().await.clone()
    }

    /// Every increment attempted, including failed ones.
    pub async fn recorded_increments(&self) -> Vec<RecordedIncrement> {
        self.increments.read().await.clone()
    }

    /// Number of increments attempted.
    pub async fn increment_count(&self) -> usize {
        self.increments.read().await.len()
    }

    /// Limits passed to `list_top_trending`.
    pub async fn recorded_limits(&self) -> Vec<u32> {
        self.limits.read().await.clone()
    }

    /// Wait until at least `count` increments were attempted.
    ///
    /// Returns false if that did not happen within `timeout`.
    pub async fn wait_for_increments(&self, count: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.increment_count().await >= count {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl TrendingStore for MockTrendingStore {
    async fn increment_search_count(
        &self,
        term: &str,
        movie: &Movie,
    ) -> Result<(), TrendingError> {
        self.increments.write().await.push(RecordedIncrement {
            term: term.to_string(),
            movie: movie.clone(),
        });

        if *self.fail_increments.read().await {
            return Err(TrendingError::Database("mock increment failure".to_string()));
        }

        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|e| e.search_term == term) {
            Some(entry) => entry.search_count += 1,
            None => {
                let id = format!("mock-{}", entries.len() + 1);
                entries.push(TrendingEntry {
                    id,
                    search_term: term.to_string(),
                    title: movie.title.clone(),
                    movie_id: movie.id,
                    poster_url: movie.poster_path.clone().unwrap_or_default(),
                    search_count: 1,
                });
            }
        }

        Ok(())
    }

    async fn list_top_trending(&self, limit: u32) -> Result<Vec<TrendingEntry>, TrendingError> {
        self.limits.write().await.push(limit);

        let delay = *self.list_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.fail_list.read().await {
            return Err(TrendingError::Database("mock list failure".to_string()));
        }

        let mut entries = self.entries.read().await.clone();
        entries.sort_by(|a, b| b.search_count.cmp(&a.search_count));
        entries.truncate(limit as usize);
        Ok(entries)
    }
}
