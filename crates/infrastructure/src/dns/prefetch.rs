use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use dnscache_application::ports::DnsForwarder;
use dnscache_application::DnsRequest;
use dnscache_domain::CacheConfig;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

use super::cache::{CacheEntry, CacheKey, CacheMetrics, ResponseCache};

type InflightSet = Arc<DashMap<CacheKey, (), FxBuildHasher>>;

/// Clears the in-flight flag for its key when dropped, whichever way the
/// refresh ends.
struct InflightGuard {
    inflight: InflightSet,
    key: CacheKey,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.inflight.remove(&self.key);
    }
}

struct PrefetchJob {
    request: DnsRequest,
    guard: InflightGuard,
}

/// Refreshes hot entries shortly before they expire.
///
/// The read path only enqueues; re-queries run on background tasks bounded
/// by a semaphore. At most one refresh per key is in flight at any time.
pub struct Prefetcher {
    cache: Arc<ResponseCache>,
    inflight: InflightSet,
    sender: mpsc::Sender<PrefetchJob>,
    amount: u64,
    threshold: f64,
}

impl Prefetcher {
    /// Spawns the refresh loop; must be called inside a tokio runtime.
    pub fn new(
        cache: Arc<ResponseCache>,
        next: Arc<dyn DnsForwarder>,
        config: &CacheConfig,
    ) -> Self {
        info!(
            amount = config.prefetch_amount,
            threshold = config.prefetch_threshold,
            concurrency = config.prefetch_concurrency,
            queue = config.prefetch_queue_size,
            "Initializing prefetcher"
        );

        let (sender, receiver) = mpsc::channel(config.prefetch_queue_size.max(1));
        let semaphore = Arc::new(Semaphore::new(config.prefetch_concurrency.max(1)));
        tokio::spawn(Self::refresh_loop(
            receiver,
            Arc::clone(&cache),
            next,
            semaphore,
        ));

        Self {
            cache,
            inflight: Arc::new(DashMap::with_hasher(FxBuildHasher)),
            sender,
            amount: config.prefetch_amount,
            threshold: config.prefetch_threshold,
        }
    }

    /// Hot enough and close enough to expiry.
    pub fn should_prefetch(&self, entry: &CacheEntry, now_secs: u64) -> bool {
        entry.hits() > self.amount && entry.remaining_fraction(now_secs) < self.threshold
    }

    pub fn is_in_flight(&self, key: &CacheKey) -> bool {
        self.inflight.contains_key(key)
    }

    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }

    /// Called after a cache hit. Queues a refresh when the entry qualifies
    /// and no refresh for `key` is already running. Returns whether a job was
    /// queued.
    pub fn on_hit(&self, key: &CacheKey, entry: &CacheEntry, request: &DnsRequest) -> bool {
        if !self.should_prefetch(entry, self.cache.now_secs()) {
            return false;
        }

        match self.inflight.entry(key.clone()) {
            Entry::Occupied(_) => return false,
            Entry::Vacant(slot) => {
                slot.insert(());
            }
        }

        let job = PrefetchJob {
            request: request.with_id(fastrand::u16(..)),
            guard: InflightGuard {
                inflight: Arc::clone(&self.inflight),
                key: key.clone(),
            },
        };

        match self.sender.try_send(job) {
            Ok(()) => {
                CacheMetrics::incr(&self.cache.metrics().prefetches);
                debug!(key = %key, hits = entry.hits(), "Prefetch scheduled");
                true
            }
            Err(_) => {
                CacheMetrics::incr(&self.cache.metrics().prefetch_dropped);
                warn!(key = %key, "Prefetch queue full, dropping refresh");
                false
            }
        }
    }

    async fn refresh_loop(
        mut receiver: mpsc::Receiver<PrefetchJob>,
        cache: Arc<ResponseCache>,
        next: Arc<dyn DnsForwarder>,
        semaphore: Arc<Semaphore>,
    ) {
        while let Some(job) = receiver.recv().await {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            let cache = Arc::clone(&cache);
            let next = Arc::clone(&next);
            tokio::spawn(async move {
                let _permit = permit;
                Self::refresh(&cache, next.as_ref(), job).await;
            });
        }
    }

    async fn refresh(cache: &ResponseCache, next: &dyn DnsForwarder, job: PrefetchJob) {
        let key = &job.guard.key;
        match next.forward(&job.request).await {
            Ok(response) => match cache.insert(key, &response, job.request.dnssec_ok) {
                Some(bucket) => debug!(key = %key, bucket = bucket.as_str(), "Prefetch refreshed entry"),
                None => debug!(key = %key, "Prefetch answer not cacheable, keeping current entry"),
            },
            Err(e) => {
                CacheMetrics::incr(&cache.metrics().prefetch_failures);
                warn!(key = %key, error = %e, "Prefetch failed");
            }
        }
    }
}
