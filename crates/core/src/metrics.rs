//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Movie catalog requests (by endpoint and outcome)
//! - Search responses dropped by stale-response fencing
//! - Trending store reads and writes

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Catalog Metrics
// =============================================================================

/// Catalog requests total by endpoint and result.
pub static CATALOG_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "moviescout_catalog_requests_total",
            "Total movie catalog requests",
        ),
        &["endpoint", "result"], // "discover"/"search", "success"/"rejected"/"error"
    )
    .unwrap()
});

/// Catalog request duration in seconds.
pub static CATALOG_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "moviescout_catalog_request_duration_seconds",
            "Duration of movie catalog requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["endpoint"],
    )
    .unwrap()
});

// =============================================================================
// Search Metrics
// =============================================================================

/// Search responses discarded because a newer search had been issued.
pub static STALE_RESPONSES_DISCARDED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "moviescout_stale_responses_discarded_total",
        "Search responses discarded because a newer search was issued",
    )
    .unwrap()
});

// =============================================================================
// Trending Metrics
// =============================================================================

/// Trending store operations by operation and result.
pub static TRENDING_OPERATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "moviescout_trending_operations_total",
            "Trending store operations",
        ),
        &["operation", "result"], // "increment"/"list_top", "success"/"error"
    )
    .unwrap()
});

/// Returns all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CATALOG_REQUESTS.clone()),
        Box::new(CATALOG_REQUEST_DURATION.clone()),
        Box::new(STALE_RESPONSES_DISCARDED.clone()),
        Box::new(TRENDING_OPERATIONS.clone()),
    ]
}

/// Label for an operation outcome.
pub(crate) fn result_label<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() {
        "success"
    } else {
        "error"
    }
}
