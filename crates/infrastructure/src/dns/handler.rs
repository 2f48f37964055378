use async_trait::async_trait;
use dnscache_application::ports::{CacheMetricsSnapshot, DnsCachePort, DnsForwarder};
use dnscache_application::DnsRequest;
use dnscache_domain::{CacheConfig, DomainError};
use hickory_proto::op::Message;
use std::sync::Arc;
use tracing::debug;

use super::cache::{CacheKey, CacheMetrics, Clock, EntryStore, ResponseCache, SystemClock};
use super::prefetch::Prefetcher;

/// Caching stage in front of a downstream forwarder.
///
/// Hits are answered locally. Misses are forwarded, and the downstream
/// answer is returned unchanged after being offered to the cache. Queries
/// outside the configured zones go straight through.
pub struct CacheHandler {
    next: Arc<dyn DnsForwarder>,
    cache: Arc<ResponseCache>,
    prefetcher: Option<Prefetcher>,
    config: CacheConfig,
}

impl CacheHandler {
    /// # Panics
    ///
    /// With prefetching enabled the refresh workers are spawned here, so this
    /// panics when called outside a tokio runtime.
    pub fn new(next: Arc<dyn DnsForwarder>, config: CacheConfig) -> Self {
        Self::with_clock(next, config, Arc::new(SystemClock))
    }

    /// Same runtime requirement as [`CacheHandler::new`].
    pub fn with_clock(
        next: Arc<dyn DnsForwarder>,
        config: CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = Arc::new(ResponseCache::new(&config, clock));
        Self::assemble(next, config, cache)
    }

    /// Uses caller-supplied bounded containers for the two buckets. Same
    /// runtime requirement as [`CacheHandler::new`].
    pub fn with_backends(
        next: Arc<dyn DnsForwarder>,
        config: CacheConfig,
        clock: Arc<dyn Clock>,
        positive: Arc<EntryStore>,
        negative: Arc<EntryStore>,
    ) -> Self {
        let cache = Arc::new(ResponseCache::with_backends(
            &config, clock, positive, negative,
        ));
        Self::assemble(next, config, cache)
    }

    fn assemble(next: Arc<dyn DnsForwarder>, config: CacheConfig, cache: Arc<ResponseCache>) -> Self {
        let prefetcher = config
            .prefetch_enabled()
            .then(|| Prefetcher::new(Arc::clone(&cache), Arc::clone(&next), &config));

        Self {
            next,
            cache,
            prefetcher,
            config,
        }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn prefetcher(&self) -> Option<&Prefetcher> {
        self.prefetcher.as_ref()
    }

    /// Cache key for `request` when it is eligible for caching at all.
    fn cacheable_key(&self, request: &DnsRequest) -> Option<CacheKey> {
        let key = CacheKey::from_request(request)?;
        if !self.config.matches_zone(key.name()) {
            return None;
        }
        Some(key)
    }

    /// Answers from the cache only. Scheduling a prefetch is the one side
    /// effect beyond counters.
    pub fn lookup(&self, request: &DnsRequest) -> Option<Message> {
        let key = self.cacheable_key(request)?;
        self.lookup_key(&key, request)
    }

    fn lookup_key(&self, key: &CacheKey, request: &DnsRequest) -> Option<Message> {
        let hit = self.cache.lookup(key, request)?;
        if let Some(prefetcher) = &self.prefetcher {
            prefetcher.on_hit(key, &hit.entry, request);
        }
        Some(hit.response)
    }

    pub async fn handle(&self, request: &DnsRequest) -> Result<Message, DomainError> {
        let Some(key) = self.cacheable_key(request) else {
            CacheMetrics::incr(&self.cache.metrics().bypassed);
            debug!(id = request.id(), "Query outside cached zones, passing through");
            return self.next.forward(request).await;
        };

        if let Some(response) = self.lookup_key(&key, request) {
            return Ok(response);
        }

        let response = self.next.forward(request).await?;
        self.cache.insert(&key, &response, request.dnssec_ok);
        Ok(response)
    }
}

#[async_trait]
impl DnsForwarder for CacheHandler {
    async fn forward(&self, request: &DnsRequest) -> Result<Message, DomainError> {
        self.handle(request).await
    }

    fn try_cache(&self, request: &DnsRequest) -> Option<Message> {
        self.lookup(request)
    }
}

impl DnsCachePort for CacheHandler {
    fn cache_size(&self) -> usize {
        self.cache.len()
    }

    fn cache_metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.cache.snapshot()
    }
}
