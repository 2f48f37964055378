use dnscache_application::ports::CacheMetricsSnapshot;
use dnscache_application::DnsRequest;
use dnscache_domain::{CacheBucket, CacheConfig, ResponseCategory};
use hickory_proto::op::Message;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::classify::ResponseClassifier;
use super::clock::Clock;
use super::entry::CacheEntry;
use super::key::CacheKey;
use super::metrics::CacheMetrics;
use super::response::ResponseBuilder;
use super::store::{EntryStore, Store};
use super::ttl::TtlPolicy;

/// A served hit: the reply plus the entry it came from.
pub struct CacheHit {
    pub response: Message,
    pub entry: Arc<CacheEntry>,
}

/// Both buckets plus the policy that decides what goes into them.
///
/// Shared between the request path and the prefetch workers.
pub struct ResponseCache {
    positive: Store,
    negative: Store,
    ttl_policy: TtlPolicy,
    clock: Arc<dyn Clock>,
    metrics: CacheMetrics,
}

impl ResponseCache {
    pub fn new(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_stores(
            config,
            clock,
            Store::new(
                CacheBucket::Positive,
                config.positive_capacity,
                config.store_shards,
            ),
            Store::new(
                CacheBucket::Negative,
                config.negative_capacity,
                config.store_shards,
            ),
        )
    }

    /// Builds the cache over caller-supplied bounded containers.
    pub fn with_backends(
        config: &CacheConfig,
        clock: Arc<dyn Clock>,
        positive: Arc<EntryStore>,
        negative: Arc<EntryStore>,
    ) -> Self {
        Self::with_stores(
            config,
            clock,
            Store::with_backend(CacheBucket::Positive, positive),
            Store::with_backend(CacheBucket::Negative, negative),
        )
    }

    fn with_stores(
        config: &CacheConfig,
        clock: Arc<dyn Clock>,
        positive: Store,
        negative: Store,
    ) -> Self {
        info!(
            positive_capacity = positive.capacity(),
            negative_capacity = negative.capacity(),
            positive_min_ttl = config.positive_min_ttl,
            positive_max_ttl = config.positive_max_ttl,
            negative_min_ttl = config.negative_min_ttl,
            negative_max_ttl = config.negative_max_ttl,
            "Initializing DNS response cache"
        );

        Self {
            positive,
            negative,
            ttl_policy: TtlPolicy::from_config(config),
            clock,
            metrics: CacheMetrics::default(),
        }
    }

    #[inline]
    pub fn now_secs(&self) -> u64 {
        self.clock.now_secs()
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub fn store(&self, bucket: CacheBucket) -> &Store {
        match bucket {
            CacheBucket::Positive => &self.positive,
            CacheBucket::Negative => &self.negative,
        }
    }

    /// Looks the key up in the positive bucket, then the negative one, and
    /// builds a reply for `request`. A stale entry counts as a miss.
    pub fn lookup(&self, key: &CacheKey, request: &DnsRequest) -> Option<CacheHit> {
        let now = self.now_secs();

        let entry = self.positive.get(key).or_else(|| self.negative.get(key));
        let Some(entry) = entry else {
            CacheMetrics::incr(&self.metrics.misses);
            debug!(key = %key, "Cache MISS");
            return None;
        };

        match ResponseBuilder::build(&entry, request, now) {
            Some(response) => {
                CacheMetrics::incr(&self.metrics.hits);
                entry.record_hit();
                debug!(
                    key = %key,
                    category = entry.category().as_str(),
                    remaining_ttl = entry.remaining_ttl(now),
                    "Cache HIT"
                );
                Some(CacheHit { response, entry })
            }
            None => {
                CacheMetrics::incr(&self.metrics.stale_hits);
                CacheMetrics::incr(&self.metrics.misses);
                debug!(key = %key, "Cache entry stale");
                None
            }
        }
    }

    /// Classifies `response` and stores it if policy allows. Returns the
    /// bucket it went into.
    ///
    /// A response whose first question is not the one `key` stands for is
    /// never stored.
    pub fn insert(
        &self,
        key: &CacheKey,
        response: &Message,
        dnssec_ok: bool,
    ) -> Option<CacheBucket> {
        if !response.queries().first().is_some_and(|q| key.matches(q)) {
            CacheMetrics::incr(&self.metrics.uncacheable);
            warn!(
                key = %key,
                question = ?response.queries().first().map(|q| q.name().to_ascii()),
                "Response does not answer the cached question, not caching"
            );
            return None;
        }

        let now = self.now_secs();
        let category = ResponseClassifier::classify(response);
        let decision = self
            .ttl_policy
            .effective_ttl(response, category, dnssec_ok, now);

        let bucket = match category.bucket() {
            Some(bucket) if decision.cacheable => bucket,
            _ => {
                CacheMetrics::incr(&self.metrics.uncacheable);
                debug!(
                    key = %key,
                    category = category.as_str(),
                    dnssec_ok,
                    "Response not cacheable"
                );
                return None;
            }
        };

        let entry = Arc::new(CacheEntry::from_response(
            response,
            category,
            dnssec_ok,
            decision.ttl,
            now,
        ));
        self.store(bucket).put(key.clone(), entry);
        self.store(bucket.other()).remove(key);

        match category {
            ResponseCategory::NameError => CacheMetrics::incr(&self.metrics.negative_inserts),
            _ => CacheMetrics::incr(&self.metrics.positive_inserts),
        }
        Some(bucket)
    }

    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> CacheMetricsSnapshot {
        let m = &self.metrics;
        CacheMetricsSnapshot {
            positive_entries: self.positive.len(),
            negative_entries: self.negative.len(),
            hits: CacheMetrics::read(&m.hits),
            misses: CacheMetrics::read(&m.misses),
            stale_hits: CacheMetrics::read(&m.stale_hits),
            positive_inserts: CacheMetrics::read(&m.positive_inserts),
            negative_inserts: CacheMetrics::read(&m.negative_inserts),
            uncacheable: CacheMetrics::read(&m.uncacheable),
            bypassed: CacheMetrics::read(&m.bypassed),
            positive_evictions: self.positive.evicted(),
            negative_evictions: self.negative.evicted(),
            prefetches: CacheMetrics::read(&m.prefetches),
            prefetch_failures: CacheMetrics::read(&m.prefetch_failures),
            prefetch_dropped: CacheMetrics::read(&m.prefetch_dropped),
            hit_rate: m.hit_rate(),
        }
    }
}
