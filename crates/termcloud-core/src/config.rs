//! Engine configuration.
//!
//! All tuning knobs are constructor-injected rather than ambient globals:
//! whichever component composes the engine owns the config lifecycle.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning knobs for the word-cloud engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of memoized results held at once.
    pub cache_capacity: usize,
    /// Seconds before a memoized result expires.
    pub cache_ttl_secs: u64,
    /// Row count above which the loader switches to paged fetches.
    pub chunk_threshold: u64,
    /// Rows per page in chunked mode.
    pub page_size: u64,
    /// Corpus character length above which classification is partitioned
    /// across workers.
    pub parallel_threshold: usize,
    /// Number of segments (and workers) used for partitioned classification.
    pub segment_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 100,
            cache_ttl_secs: 3600,
            chunk_threshold: 10_000,
            page_size: 5_000,
            parallel_threshold: 1_000_000,
            segment_count: 4,
        }
    }
}

impl EngineConfig {
    /// Cache TTL as a `Duration`.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.chunk_threshold, 10_000);
        assert_eq!(cfg.page_size, 5_000);
        assert_eq!(cfg.segment_count, 4);
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(3600));
    }
}
