use std::hash::Hash;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// A process-wide get-or-create map.
///
/// Concurrent misses for the same key may race to compute the value, but
/// only the first insertion wins; losing computations are discarded and the
/// losers observe the winner's value. Values are therefore required to be
/// cheap to clone (typically handles over `Arc`s).
pub struct ConcurrentCache<K, V> {
    map: RwLock<FxHashMap<K, V>>,
}

impl<K, V> ConcurrentCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty cache.
    pub fn new() -> Self {
        Self { map: RwLock::new(FxHashMap::default()) }
    }

    /// The number of cached entries.
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }

    /// Retrieve the value for `key`, creating it with `create` on a miss.
    pub fn get_or_create(&self, key: K, create: impl FnOnce() -> V) -> V {
        if let Some(value) = self.map.read().get(&key) {
            return value.clone();
        }

        // Compute outside the lock; creation can be expensive.
        let value = create();
        self.map.write().entry(key).or_insert(value).clone()
    }

    /// Like [`get_or_create`](Self::get_or_create), but the creation can
    /// fail. Errors are not cached.
    pub fn get_or_try_create<E>(
        &self,
        key: K,
        create: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.map.read().get(&key) {
            return Ok(value.clone());
        }

        let value = create()?;
        Ok(self.map.write().entry(key).or_insert(value).clone())
    }
}

impl<K, V> Default for ConcurrentCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
