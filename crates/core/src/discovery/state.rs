//! Page state shared by the controller, the loader, and the renderer.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::external_catalog::Movie;
use crate::trending::TrendingEntry;

/// What the user typed, and what the debouncer has let through.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SearchState {
    /// Updated on every keystroke.
    pub raw_term: String,
    /// Updated only once input has been quiet for the debounce delay.
    pub debounced_term: String,
}

/// State of the "all movies" section.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RequestState {
    pub is_loading: bool,
    pub error_message: Option<String>,
    /// Results of the last applied search, in catalog order.
    pub results: Vec<Movie>,
}

/// State of the trending section.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TrendingState {
    pub is_loading: bool,
    /// Rendered when set, but the loader only logs its failures.
    pub error_message: Option<String>,
    pub entries: Vec<TrendingEntry>,
}

/// Everything the page renders from.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PageState {
    pub search: SearchState,
    pub movies: RequestState,
    pub trending: TrendingState,
}

/// Shared, observable page state.
///
/// Cheap to clone. Every update notifies subscribers, which is how the
/// session knows to re-render.
#[derive(Debug, Clone)]
pub struct PageHandle {
    tx: Arc<watch::Sender<PageState>>,
}

impl Default for PageHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl PageHandle {
    /// Create a handle holding an empty page.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(PageState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Apply a mutation and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut PageState)) {
        self.tx.send_modify(f);
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> PageState {
        self.tx.borrow().clone()
    }

    /// Receive a notification after every update.
    pub fn subscribe(&self) -> watch::Receiver<PageState> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_notifies_subscribers() {
        let page = PageHandle::new();
        let mut rx = page.subscribe();

        page.update(|s| s.search.raw_term = "bat".to_string());

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().search.raw_term, "bat");
        assert_eq!(page.snapshot().search.raw_term, "bat");
    }

    #[test]
    fn test_clones_share_state() {
        let page = PageHandle::new();
        let other = page.clone();

        other.update(|s| s.movies.is_loading = true);

        assert!(page.snapshot().movies.is_loading);
    }
}
