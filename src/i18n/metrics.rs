//! Translation metrics and observability module.
//!
//! Each resolver owns one `TranslationMetrics` so counters describe exactly
//! the traffic that went through it.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for every resolution tier.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Resolutions short-circuited because source and target matched
    identity: AtomicUsize,

    /// Number of times a translation was found in cache
    cache_hits: AtomicUsize,

    /// Number of times a translation was not found in cache
    cache_misses: AtomicUsize,

    /// Cache misses answered by the curated phrase table
    phrase_hits: AtomicUsize,

    /// Number of calls made to the remote translation service
    remote_calls: AtomicUsize,

    /// Number of remote calls that failed
    remote_failures: AtomicUsize,

    /// Failed resolutions that degraded to a fallback string
    fallbacks: AtomicUsize,
}

impl TranslationMetrics {
    /// Create a zeroed set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_identity(&self) {
        self.identity.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_phrase_hit(&self) {
        self.phrase_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_remote_call(&self) {
        self.remote_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_remote_failure(&self) {
        self.remote_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn remote_calls(&self) -> usize {
        self.remote_calls.load(Ordering::Relaxed)
    }

    pub fn remote_failures(&self) -> usize {
        self.remote_failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let total_cache_queries = hits + misses;
        let cache_hit_rate = if total_cache_queries > 0 {
            (hits as f64 / total_cache_queries as f64) * 100.0
        } else {
            0.0
        };

        let calls = self.remote_calls();
        let failures = self.remote_failures();
        let remote_success_rate = if calls > 0 {
            ((calls - failures) as f64 / calls as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            identity: self.identity.load(Ordering::Relaxed),
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            phrase_hits: self.phrase_hits.load(Ordering::Relaxed),
            remote_calls: calls,
            remote_failures: failures,
            remote_success_rate,
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of translation statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub identity: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub phrase_hits: usize,
    pub remote_calls: usize,
    pub remote_failures: usize,

    /// Remote success rate as a percentage (0-100)
    pub remote_success_rate: f64,

    pub fallbacks: usize,
}
