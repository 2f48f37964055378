/// Snapshot of cache counters for observability.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheMetricsSnapshot {
    pub positive_entries: usize,
    pub negative_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub stale_hits: u64,
    pub positive_inserts: u64,
    pub negative_inserts: u64,
    pub uncacheable: u64,
    pub bypassed: u64,
    pub positive_evictions: u64,
    pub negative_evictions: u64,
    pub prefetches: u64,
    pub prefetch_failures: u64,
    pub prefetch_dropped: u64,
    pub hit_rate: f64,
}

pub trait DnsCachePort: Send + Sync {
    fn cache_size(&self) -> usize;
    fn cache_metrics_snapshot(&self) -> CacheMetricsSnapshot;
}
