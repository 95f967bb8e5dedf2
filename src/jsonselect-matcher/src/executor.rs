//! Cached selector execution
//!
//! The executor parses each distinct selector string once and keeps the
//! parsed tree in an LRU cache, so the same selector can be run against many
//! documents without reparsing.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonselect_parser::{Result, Selector, SelectorParser};
use lru::LruCache;
use serde_json::Value;

use crate::matcher::Collector;

/// Execution configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Maximum number of parsed selectors to cache
    pub cache_size: usize,
    /// Whether to collect execution statistics
    pub collect_stats: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            cache_size: 256,
            collect_stats: false,
        }
    }
}

/// Execution statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Selectors parsed because they were not cached
    pub selectors_compiled: usize,
    /// Lookups answered from the cache
    pub cache_hits: usize,
    /// Lookups that had to parse
    pub cache_misses: usize,
    /// Document nodes visited while matching
    pub nodes_visited: usize,
    /// Matches handed back to callers
    pub matches_returned: usize,
    /// Time spent matching
    pub execution_time: Duration,
}

impl ExecutionStats {
    /// Cache hit rate (0.0 to 1.0)
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

/// Selector executor with a parse cache
pub struct SelectorExecutor {
    parser: SelectorParser,
    config: ExecutorConfig,
    /// Arc lets callers keep a selector after it is evicted
    cache: LruCache<String, Arc<Selector>>,
    stats: Option<ExecutionStats>,
}

impl SelectorExecutor {
    /// Create a new executor with default configuration
    pub fn new() -> Self {
        Self::with_config(ExecutorConfig::default())
    }

    /// Create a new executor with custom configuration
    pub fn with_config(config: ExecutorConfig) -> Self {
        let capacity = NonZeroUsize::new(config.cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            parser: SelectorParser::new(),
            stats: config.collect_stats.then(ExecutionStats::default),
            cache: LruCache::new(capacity),
            config,
        }
    }

    /// Parse `selector`, or fetch it from the cache
    pub fn compile(&mut self, selector: &str) -> Result<Arc<Selector>> {
        if let Some(cached) = self.cache.get(selector) {
            let cached = Arc::clone(cached);
            if let Some(stats) = self.stats.as_mut() {
                stats.cache_hits += 1;
            }
            return Ok(cached);
        }

        log::debug!("selector cache miss: {:?}", selector);
        #[cfg(feature = "profiling")]
        coz::progress!("selector_compilation");

        let compiled = Arc::new(self.parser.parse(selector)?);
        self.cache.put(selector.to_string(), Arc::clone(&compiled));
        if let Some(stats) = self.stats.as_mut() {
            stats.cache_misses += 1;
            stats.selectors_compiled += 1;
        }
        Ok(compiled)
    }

    /// Every node of `root` matched by `selector`, in document order
    pub fn select<'v>(&mut self, selector: &str, root: &'v Value) -> Result<Vec<&'v Value>> {
        let compiled = self.compile(selector)?;
        Ok(self.run(Collector::new(), &compiled, root))
    }

    /// The first node of `root` matched by `selector`
    pub fn select_first<'v>(&mut self, selector: &str, root: &'v Value) -> Result<Option<&'v Value>> {
        let compiled = self.compile(selector)?;
        Ok(self
            .run(Collector::first_only(), &compiled, root)
            .into_iter()
            .next())
    }

    fn run<'v>(&mut self, mut collector: Collector, selector: &Selector, root: &'v Value) -> Vec<&'v Value> {
        let start = Instant::now();
        let found = collector.collect(&selector.union, root);
        if let Some(stats) = self.stats.as_mut() {
            stats.execution_time += start.elapsed();
            stats.nodes_visited += collector.nodes_visited();
            stats.matches_returned += found.len();
        }
        found
    }

    /// Check that `selector` parses, without caching it
    pub fn validate(&self, selector: &str) -> Result<()> {
        self.parser.parse(selector)?;
        Ok(())
    }

    /// Get execution statistics
    pub fn stats(&self) -> Option<&ExecutionStats> {
        self.stats.as_ref()
    }

    /// Clear the selector cache
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Number of cached selectors
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Get current configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }
}

impl Default for SelectorExecutor {
    fn default() -> Self {
        Self::new()
    }
}
