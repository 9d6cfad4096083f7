//! Basic metrics instrumentation for the contacts store.
//!
//! Provides counters and duration tracking for store queries, batches and deletes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector for store traffic.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of store queries issued
    store_queries_total: Arc<AtomicU64>,

    /// Total number of failed store calls
    store_errors_total: Arc<AtomicU64>,

    /// Total duration of all store queries in milliseconds
    store_duration_total_ms: Arc<AtomicU64>,

    /// Create batches committed
    batches_applied_total: Arc<AtomicU64>,

    /// Create batches refused by the store
    batches_rejected_total: Arc<AtomicU64>,

    /// Delete calls that reached the store
    deletes_total: Arc<AtomicU64>,

    /// Number of contacts fetched
    contacts_fetched_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            store_queries_total: Arc::new(AtomicU64::new(0)),
            store_errors_total: Arc::new(AtomicU64::new(0)),
            store_duration_total_ms: Arc::new(AtomicU64::new(0)),
            batches_applied_total: Arc::new(AtomicU64::new(0)),
            batches_rejected_total: Arc::new(AtomicU64::new(0)),
            deletes_total: Arc::new(AtomicU64::new(0)),
            contacts_fetched_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record a store query with duration.
    pub fn record_store_query(&self, duration: Duration) {
        self.store_queries_total.fetch_add(1, Ordering::Relaxed);
        self.store_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a failed store call.
    pub fn record_store_error(&self) {
        self.store_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch_applied(&self) {
        self.batches_applied_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch_rejected(&self) {
        self.batches_rejected_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delete(&self) {
        self.deletes_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record contacts fetched.
    pub fn record_contacts_fetched(&self, count: usize) {
        self.contacts_fetched_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Get total store queries.
    pub fn store_queries_total(&self) -> u64 {
        self.store_queries_total.load(Ordering::Relaxed)
    }

    /// Get total store errors.
    pub fn store_errors_total(&self) -> u64 {
        self.store_errors_total.load(Ordering::Relaxed)
    }

    /// Get total store query duration in milliseconds.
    pub fn store_duration_total_ms(&self) -> u64 {
        self.store_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average store query duration in milliseconds.
    pub fn store_duration_avg_ms(&self) -> f64 {
        let total = self.store_duration_total_ms.load(Ordering::Relaxed);
        let count = self.store_queries_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    pub fn batches_applied_total(&self) -> u64 {
        self.batches_applied_total.load(Ordering::Relaxed)
    }

    pub fn batches_rejected_total(&self) -> u64 {
        self.batches_rejected_total.load(Ordering::Relaxed)
    }

    pub fn deletes_total(&self) -> u64 {
        self.deletes_total.load(Ordering::Relaxed)
    }

    /// Get total contacts fetched.
    pub fn contacts_fetched_total(&self) -> u64 {
        self.contacts_fetched_total.load(Ordering::Relaxed)
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.store_queries_total.store(0, Ordering::Relaxed);
        self.store_errors_total.store(0, Ordering::Relaxed);
        self.store_duration_total_ms.store(0, Ordering::Relaxed);
        self.batches_applied_total.store(0, Ordering::Relaxed);
        self.batches_rejected_total.store(0, Ordering::Relaxed);
        self.deletes_total.store(0, Ordering::Relaxed);
        self.contacts_fetched_total.store(0, Ordering::Relaxed);
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            store_queries_total: self.store_queries_total(),
            store_errors_total: self.store_errors_total(),
            store_duration_total_ms: self.store_duration_total_ms(),
            store_duration_avg_ms: self.store_duration_avg_ms(),
            batches_applied_total: self.batches_applied_total(),
            batches_rejected_total: self.batches_rejected_total(),
            deletes_total: self.deletes_total(),
            contacts_fetched_total: self.contacts_fetched_total(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub store_queries_total: u64,
    pub store_errors_total: u64,
    pub store_duration_total_ms: u64,
    pub store_duration_avg_ms: f64,
    pub batches_applied_total: u64,
    pub batches_rejected_total: u64,
    pub deletes_total: u64,
    pub contacts_fetched_total: u64,
}

/// Helper for timing store queries.
pub struct QueryTimer {
    start: Instant,
    metrics: Metrics,
}

impl QueryTimer {
    /// Start timing a store query.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the duration.
    pub fn complete(self) {
        let duration = self.start.elapsed();
        self.metrics.record_store_query(duration);
    }

    /// Complete the timing and record as an error.
    pub fn complete_with_error(self) {
        let duration = self.start.elapsed();
        self.metrics.record_store_query(duration);
        self.metrics.record_store_error();
    }
}
