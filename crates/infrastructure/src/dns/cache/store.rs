use dnscache_application::ports::BoundedStore;
use dnscache_domain::CacheBucket;
use std::sync::Arc;
use tracing::debug;

use super::entry::CacheEntry;
use super::key::CacheKey;
use super::lru_store::ShardedLruStore;

pub type EntryStore = dyn BoundedStore<CacheKey, Arc<CacheEntry>>;

/// One cache bucket. Last write wins; staleness is the reader's concern.
pub struct Store {
    bucket: CacheBucket,
    inner: Arc<EntryStore>,
}

impl Store {
    pub fn new(bucket: CacheBucket, capacity: usize, shard_amount: usize) -> Self {
        Self::with_backend(
            bucket,
            Arc::new(ShardedLruStore::new(capacity, shard_amount)),
        )
    }

    pub fn with_backend(bucket: CacheBucket, inner: Arc<EntryStore>) -> Self {
        Self { bucket, inner }
    }

    pub fn bucket(&self) -> CacheBucket {
        self.bucket
    }

    pub fn put(&self, key: CacheKey, entry: Arc<CacheEntry>) {
        debug!(
            bucket = self.bucket.as_str(),
            key = %key,
            ttl = entry.ttl(),
            "Cache insert"
        );
        self.inner.add(key, entry);
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        self.inner.get(key)
    }

    pub fn remove(&self, key: &CacheKey) -> bool {
        self.inner.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn evicted(&self) -> u64 {
        self.inner.evicted()
    }
}
