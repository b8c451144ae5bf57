//! Run counters and structured logging.
//!
//! The engine records generation-level statistics here and emits them
//! through `tracing`; the caller decides where they go by installing a
//! subscriber (see [`init_logging`]).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Collector for evolution statistics.
pub struct Metrics {
    generation_count: AtomicU64,
    species_count: AtomicU64,
    last_generation_ms: AtomicU64,
    pub counters: Mutex<HashMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("generation_count", &self.generation_count())
            .field("species_count", &self.species_count())
            .finish_non_exhaustive()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation_count: AtomicU64::new(0),
            species_count: AtomicU64::new(0),
            last_generation_ms: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed generational step. Logging is left to the caller.
    pub fn record_generation(&self, duration: Duration, species: usize) {
        self.generation_count.fetch_add(1, Ordering::Relaxed);
        self.species_count.store(species as u64, Ordering::Relaxed);
        self.last_generation_ms
            .store(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn increment_counter(&self, name: &str) {
        self.add_to_counter(name, 1);
    }

    pub fn add_to_counter(&self, name: &str, amount: u64) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(amount, Ordering::Relaxed);
    }

    /// Current value of a named counter, 0 if it was never touched.
    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn generation_count(&self) -> u64 {
        self.generation_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn species_count(&self) -> u64 {
        self.species_count.load(Ordering::Relaxed)
    }

    /// Wall time of the most recent generational step.
    #[must_use]
    pub fn last_generation_time(&self) -> Duration {
        Duration::from_millis(self.last_generation_ms.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs a recoverable population event such as a speciation collapse.
    pub fn log_event(&self, event_type: &str, details: &str) {
        self.increment_counter(event_type);
        tracing::warn!(event_type = event_type, details = details, "Population event");
    }
}

/// Installs a global `tracing` subscriber filtered by `RUST_LOG`
/// (default `info`). Calling it twice is harmless.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.generation_count(), 0);
        assert_eq!(metrics.counter("anything"), 0);
    }

    #[test]
    fn test_record_generation() {
        let metrics = Metrics::new();
        metrics.record_generation(Duration::from_millis(3), 7);
        metrics.record_generation(Duration::from_millis(9), 4);
        assert_eq!(metrics.generation_count(), 2);
        assert_eq!(metrics.species_count(), 4);
        assert_eq!(metrics.last_generation_time(), Duration::from_millis(9));
    }

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.increment_counter("offspring");
        metrics.add_to_counter("offspring", 4);
        metrics.log_event("collapse", "all species stale");
        assert_eq!(metrics.counter("offspring"), 5);
        assert_eq!(metrics.counter("collapse"), 1);
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
    }
}
