use dnscache_application::ports::BoundedStore;
use lru::LruCache;
use rustc_hash::FxBuildHasher;
use std::hash::{BuildHasher, Hash};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Mutex, MutexGuard};

// Below this many entries per shard, splitting the capacity only distorts
// the LRU order.
const MIN_ENTRIES_PER_SHARD: usize = 64;

type Shard<K, V> = Mutex<LruCache<K, V, FxBuildHasher>>;

/// Least-recently-used container split into independently locked shards.
///
/// Total capacity is exact: the per-shard capacities sum to the requested
/// capacity. Recency is tracked per shard.
pub struct ShardedLruStore<K, V> {
    shards: Box<[Shard<K, V>]>,
    capacity: usize,
    evicted: AtomicU64,
}

impl<K, V> ShardedLruStore<K, V>
where
    K: Hash + Eq + Clone,
{
    pub fn new(capacity: usize, shard_amount: usize) -> Self {
        let capacity = capacity.max(1);
        let shard_count = shard_amount
            .min(capacity / MIN_ENTRIES_PER_SHARD)
            .max(1);

        let base = capacity / shard_count;
        let remainder = capacity % shard_count;
        let shards = (0..shard_count)
            .map(|i| {
                let shard_capacity = base + usize::from(i < remainder);
                Mutex::new(LruCache::with_hasher(
                    NonZeroUsize::new(shard_capacity).unwrap_or(NonZeroUsize::MIN),
                    FxBuildHasher,
                ))
            })
            .collect();

        Self {
            shards,
            capacity,
            evicted: AtomicU64::new(0),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    #[inline]
    fn shard(&self, key: &K) -> MutexGuard<'_, LruCache<K, V, FxBuildHasher>> {
        let index = (FxBuildHasher.hash_one(key) as usize) % self.shards.len();
        self.shards[index]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<K, V> BoundedStore<K, V> for ShardedLruStore<K, V>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
{
    fn add(&self, key: K, value: V) {
        let mut shard = self.shard(&key);
        if let Some((pushed_out, _)) = shard.push(key.clone(), value) {
            if pushed_out != key {
                self.evicted.fetch_add(1, AtomicOrdering::Relaxed);
            }
        }
    }

    fn get(&self, key: &K) -> Option<V> {
        self.shard(key).get(key).cloned()
    }

    fn remove(&self, key: &K) -> Option<V> {
        self.shard(key).pop(key)
    }

    fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len())
            .sum()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn evicted(&self) -> u64 {
        self.evicted.load(AtomicOrdering::Relaxed)
    }
}
