use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

// align(64) keeps the read-path counters on their own cache line.
#[derive(Default, Debug)]
#[repr(align(64))]
pub struct CacheMetrics {
    // Hot counters, touched on every lookup.
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    _hot_pad: [u64; 6],

    pub stale_hits: AtomicU64,
    pub positive_inserts: AtomicU64,
    pub negative_inserts: AtomicU64,
    pub uncacheable: AtomicU64,
    pub bypassed: AtomicU64,
    pub prefetches: AtomicU64,
    pub prefetch_failures: AtomicU64,
    pub prefetch_dropped: AtomicU64,
}

impl CacheMetrics {
    #[inline]
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, AtomicOrdering::Relaxed);
    }

    #[inline]
    pub fn read(counter: &AtomicU64) -> u64 {
        counter.load(AtomicOrdering::Relaxed)
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = Self::read(&self.hits) as f64;
        let total = hits + Self::read(&self.misses) as f64;

        if total > 0.0 {
            (hits / total) * 100.0
        } else {
            0.0
        }
    }
}
