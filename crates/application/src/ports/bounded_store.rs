/// A capacity-bounded key/value container.
///
/// Adding beyond capacity evicts some entry chosen by the implementation.
/// Implementations are internally synchronised.
pub trait BoundedStore<K, V>: Send + Sync {
    /// Insert or replace. Replacing an existing key never counts as an eviction.
    fn add(&self, key: K, value: V);

    fn get(&self, key: &K) -> Option<V>;

    fn remove(&self, key: &K) -> Option<V>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    /// Entries pushed out by capacity pressure since creation.
    fn evicted(&self) -> u64;
}
