use serde::{Deserialize, Serialize};

/// Engine tunables
///
/// Every knob has a sensible default; construct with `Default` and
/// adjust through the `with_*` builders.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Per-query truncation bound for ranked results
    pub max_results: usize,
    /// Width of the empty-result rolling window, in ticks
    pub window_size: usize,
    /// Bucket count for the concurrent relevance map
    pub shard_count: usize,
    /// Worker threads for the parallel plus-word phase
    pub plus_workers: usize,
    /// Worker threads for the parallel minus-word phase
    pub minus_workers: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            window_size: 1440,
            shard_count: 10_000,
            plus_workers: 16,
            minus_workers: 8,
        }
    }
}

impl SearchConfig {
    /// Set the ranked-result truncation bound
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the rolling-window width in ticks
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the concurrent-map bucket count
    pub fn with_shard_count(mut self, shard_count: usize) -> Self {
        self.shard_count = shard_count;
        self
    }

    /// Set the worker counts for the parallel query phases
    pub fn with_workers(mut self, plus_workers: usize, minus_workers: usize) -> Self {
        self.plus_workers = plus_workers;
        self.minus_workers = minus_workers;
        self
    }
}
