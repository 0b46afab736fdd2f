use lru::LruCache;
use std::num::NonZeroUsize;

/// Bounded LRU cache. A zero capacity is treated as one entry.
///
/// Every invalidation bumps a generation counter. A reader that fetched a value
/// outside the lock hands back the generation it saw at its miss, and the value
/// is only cached if nothing was invalidated in between.
pub struct Cache<K, V> {
    inner: LruCache<K, V>,
    generation: u64,
}

impl<K: std::hash::Hash + Eq, V> Cache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Cache {
            inner: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            generation: 0,
        }
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.inner.get(key)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.inner.put(key, value);
    }

    /// Caches a value read at `generation`. Returns false, caching nothing, when
    /// an invalidation happened since.
    pub fn insert_if_current(&mut self, key: K, value: V, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.inner.put(key, value);
        true
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.generation += 1;
        self.inner.pop(key)
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.inner.clear();
    }
}
